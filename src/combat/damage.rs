//! Damage calculation
//!
//! Projectile configuration and the distance/pierce multipliers applied to
//! base damage. Zero or negative radii and distances disable the feature
//! instead of dividing by zero.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::status::StatusKind;
use crate::progression::{SkillManager, SkillTarget};

/// Pierce hits never drop below this fraction of damage
pub const MIN_PIERCE_MULTIPLIER: f32 = 0.1;

/// How a projectile distributes its damage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DamageMode {
    /// Damage the first valid target hit
    SingleTarget,
    /// Damage every valid target around the impact point, scaled by distance
    AreaOfEffect { radius: f32 },
    /// Pass through up to `max_targets`, losing damage with every pierce
    Piercing {
        max_targets: u32,
        damage_loss_per_pierce: f32,
    },
}

/// Linear damage falloff past a travel distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Falloff {
    /// Travel distance at which falloff starts
    pub distance: f32,
    /// Damage multiplier reached after one more `distance` of travel
    pub min_multiplier: f32,
}

/// Chance to apply a status effect on hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusApplication {
    pub kind: StatusKind,
    /// Probability in [0, 1]
    pub chance: f32,
    /// Seconds
    pub duration: f32,
}

/// Everything a projectile needs to know to deal damage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileConfig {
    pub base_damage: i32,
    pub mode: DamageMode,
    #[serde(default)]
    pub is_spell: bool,
    #[serde(default)]
    pub falloff: Option<Falloff>,
    /// Only entities with this tag take damage
    pub target_tag: String,
    /// Bit mask of collision layers that can be damaged
    pub layer_mask: u32,
    /// Impulse strength pushed onto hit targets (0 disables knockback)
    #[serde(default)]
    pub knockback_force: f32,
    #[serde(default)]
    pub status: Option<StatusApplication>,
}

impl ProjectileConfig {
    pub fn new(base_damage: i32, mode: DamageMode, target_tag: &str) -> Self {
        Self {
            base_damage,
            mode,
            is_spell: false,
            falloff: None,
            target_tag: target_tag.to_string(),
            layer_mask: u32::MAX,
            knockback_force: 0.0,
            status: None,
        }
    }

    /// Bake the caster's skill bonuses into this projectile: the damage
    /// pipeline (including the critical roll) and the AOE radius multiplier.
    pub fn with_skill_bonuses<T: SkillTarget>(
        mut self,
        skills: &SkillManager<T>,
        rng: &mut impl Rng,
    ) -> Self {
        self.base_damage =
            skills.calculate_damage_with_bonuses(self.base_damage, self.is_spell, rng);
        if let DamageMode::AreaOfEffect { radius } = &mut self.mode {
            *radius *= skills.get_aoe_multiplier();
        }
        self
    }
}

/// Damage multiplier after traveling `traveled` units.
///
/// Interpolates from 1.0 to `min_multiplier` over one extra falloff distance
/// and stays at `min_multiplier` beyond that.
pub fn falloff_multiplier(traveled: f32, falloff: Option<&Falloff>) -> f32 {
    let Some(falloff) = falloff else {
        return 1.0;
    };
    if falloff.distance <= 0.0 || traveled <= falloff.distance {
        return 1.0;
    }
    let t = ((traveled - falloff.distance) / falloff.distance).clamp(0.0, 1.0);
    1.0 + (falloff.min_multiplier - 1.0) * t
}

/// `clamp01(1 - distance / radius)`; a non-positive radius yields 0
pub fn aoe_multiplier(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    (1.0 - distance / radius).clamp(0.0, 1.0)
}

/// Multiplier for the hit after `pierce_count` earlier pierces
pub fn pierce_multiplier(pierce_count: u32, damage_loss_per_pierce: f32) -> f32 {
    (1.0 - damage_loss_per_pierce * pierce_count as f32).max(MIN_PIERCE_MULTIPLIER)
}

/// Apply a multiplier to base damage, rounding to the nearest point
pub fn scale_damage(base_damage: i32, multiplier: f32) -> i32 {
    (base_damage as f32 * multiplier).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::CharacterStats;
    use crate::progression::{default_catalog, ProgressionConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    #[test]
    fn test_no_falloff_configured() {
        assert_eq!(falloff_multiplier(1_000.0, None), 1.0);
    }

    #[test]
    fn test_falloff_interpolates_and_clamps() {
        let falloff = Falloff {
            distance: 10.0,
            min_multiplier: 0.5,
        };
        assert_eq!(falloff_multiplier(5.0, Some(&falloff)), 1.0);
        assert_eq!(falloff_multiplier(10.0, Some(&falloff)), 1.0);
        assert!((falloff_multiplier(15.0, Some(&falloff)) - 0.75).abs() < 1e-6);
        assert_eq!(falloff_multiplier(20.0, Some(&falloff)), 0.5);
        assert_eq!(falloff_multiplier(500.0, Some(&falloff)), 0.5);
    }

    #[test]
    fn test_zero_falloff_distance_disables_falloff() {
        let falloff = Falloff {
            distance: 0.0,
            min_multiplier: 0.1,
        };
        assert_eq!(falloff_multiplier(50.0, Some(&falloff)), 1.0);
    }

    #[test]
    fn test_aoe_multiplier() {
        assert_eq!(aoe_multiplier(0.0, 4.0), 1.0);
        assert_eq!(aoe_multiplier(2.0, 4.0), 0.5);
        assert_eq!(aoe_multiplier(4.0, 4.0), 0.0);
        assert_eq!(aoe_multiplier(6.0, 4.0), 0.0);
        assert_eq!(aoe_multiplier(1.0, 0.0), 0.0);
        assert_eq!(aoe_multiplier(1.0, -3.0), 0.0);
    }

    #[test]
    fn test_pierce_multiplier_floor() {
        assert_eq!(pierce_multiplier(0, 0.25), 1.0);
        assert_eq!(pierce_multiplier(2, 0.25), 0.5);
        assert_eq!(pierce_multiplier(4, 0.25), MIN_PIERCE_MULTIPLIER);
        assert_eq!(pierce_multiplier(u32::MAX, 0.25), MIN_PIERCE_MULTIPLIER);
    }

    #[test]
    fn test_scale_damage_rounds() {
        assert_eq!(scale_damage(25, 0.5), 13); // 12.5 rounds away from zero
        assert_eq!(scale_damage(10, 0.0), 0);
    }

    #[test]
    fn test_with_skill_bonuses() {
        let mut skills = SkillManager::new(
            Arc::new(default_catalog()),
            ProgressionConfig::default(),
            CharacterStats::default(),
        );
        assert!(skills.unlock_skill("power_strike"));

        let mut rng = StdRng::seed_from_u64(1);
        let config = ProjectileConfig::new(20, DamageMode::AreaOfEffect { radius: 3.0 }, "Enemy")
            .with_skill_bonuses(&skills, &mut rng);

        assert_eq!(config.base_damage, 25);
        assert_eq!(config.mode, DamageMode::AreaOfEffect { radius: 3.0 });
    }

    #[test]
    fn test_with_skill_bonuses_widens_aoe_radius() {
        let mut skills = SkillManager::new(
            Arc::new(default_catalog()),
            ProgressionConfig::default(),
            CharacterStats::default(),
        );
        skills.add_experience(5_000);
        for id in ["power_strike", "berserker_fury", "whirlwind"] {
            assert!(skills.unlock_skill(id), "{}", id);
        }

        let mut rng = StdRng::seed_from_u64(1);
        let config = ProjectileConfig::new(20, DamageMode::AreaOfEffect { radius: 3.0 }, "Enemy")
            .with_skill_bonuses(&skills, &mut rng);

        assert_eq!(config.base_damage, 28);
        let DamageMode::AreaOfEffect { radius } = config.mode else {
            panic!("mode changed: {:?}", config.mode);
        };
        assert!((radius - 3.0 * 1.15).abs() < 1e-5);
    }
}
