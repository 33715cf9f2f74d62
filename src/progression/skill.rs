//! Skill definitions and per-actor skill state
//!
//! A [`SkillDefinition`] is immutable catalog data shared between actors.
//! A [`Skill`] pairs a definition with the level one actor has reached.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::effect::{EffectType, SkillEffect};
use super::state::ProgressionState;
use crate::combat::Damageable;

/// Skill tree branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillCategory {
    Combat,
    Defense,
    Magic,
    Utility,
    Passive,
}

impl SkillCategory {
    pub fn name(&self) -> &'static str {
        match self {
            SkillCategory::Combat => "Combat",
            SkillCategory::Defense => "Defense",
            SkillCategory::Magic => "Magic",
            SkillCategory::Utility => "Utility",
            SkillCategory::Passive => "Passive",
        }
    }
}

/// Skill tier, roughly how deep into the tree the skill sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillTier {
    Basic,
    Advanced,
    Expert,
    Master,
    Ultimate,
}

impl SkillTier {
    pub fn name(&self) -> &'static str {
        match self {
            SkillTier::Basic => "Basic",
            SkillTier::Advanced => "Advanced",
            SkillTier::Expert => "Expert",
            SkillTier::Master => "Master",
            SkillTier::Ultimate => "Ultimate",
        }
    }
}

/// Unlock gating for a skill
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub minimum_level: u32,
    pub required_skill_points: u32,
    /// Ids of skills that must already be unlocked; unknown ids never count as satisfied
    #[serde(default)]
    pub prerequisite_skill_ids: Vec<String>,
}

impl SkillRequirement {
    pub fn new(minimum_level: u32, required_skill_points: u32) -> Self {
        Self {
            minimum_level,
            required_skill_points,
            prerequisite_skill_ids: Vec::new(),
        }
    }

    /// Add a prerequisite (kept in insertion order, duplicates ignored)
    pub fn requires(mut self, skill_id: &str) -> Self {
        if !self.prerequisite_skill_ids.iter().any(|id| id == skill_id) {
            self.prerequisite_skill_ids.push(skill_id.to_string());
        }
        self
    }
}

/// Skills that mutate their target directly when applied or removed.
/// Everything else is read passively through bonus aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActiveHook {
    #[default]
    None,
    /// Raises max health by the flat `HealthBoost` value
    Vitality,
    /// Multiplies attack speed by `1 + AttackSpeedBoost%/100`
    Swiftness,
}

/// The character a skill's active hook mutates
pub trait SkillTarget: Damageable {
    /// Attacks per second
    fn attack_speed(&self) -> f32;

    fn set_attack_speed(&mut self, value: f32);
}

/// Immutable description of a skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: SkillCategory,
    pub tier: SkillTier,
    pub max_level: u32,
    pub requirements: SkillRequirement,
    pub effects: Vec<SkillEffect>,
    #[serde(default)]
    pub hook: ActiveHook,
}

/// One actor's view of a skill: the shared definition plus the level reached
#[derive(Debug, Clone)]
pub struct Skill {
    definition: Arc<SkillDefinition>,
    current_level: u32,
}

impl Skill {
    /// A locked skill (level 0)
    pub fn new(definition: Arc<SkillDefinition>) -> Self {
        Self {
            definition,
            current_level: 0,
        }
    }

    pub fn definition(&self) -> &SkillDefinition {
        &self.definition
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn max_level(&self) -> u32 {
        self.definition.max_level
    }

    pub fn is_unlocked(&self) -> bool {
        self.current_level > 0
    }

    pub fn is_max_level(&self) -> bool {
        self.current_level >= self.definition.max_level
    }

    /// Level, skill point and prerequisite checks against a player's progression
    pub fn can_unlock(&self, state: &ProgressionState) -> bool {
        let req = &self.definition.requirements;
        state.level >= req.minimum_level
            && state.skill_points >= req.required_skill_points
            && req
                .prerequisite_skill_ids
                .iter()
                .all(|id| state.unlocked_skill_ids.contains(id))
    }

    /// Locked -> level 1. Does nothing on an unlocked skill.
    pub fn unlock(&mut self) {
        if self.current_level == 0 {
            self.current_level = 1;
        }
    }

    pub fn can_level_up(&self, state: &ProgressionState) -> bool {
        self.is_unlocked() && !self.is_max_level() && state.skill_points >= self.level_up_cost()
    }

    /// Skill points needed for the next level; rises every two levels
    pub fn level_up_cost(&self) -> u32 {
        1 + self.current_level / 2
    }

    /// +1 level, never past the maximum
    pub fn level_up(&mut self) {
        if !self.is_max_level() {
            self.current_level += 1;
        }
    }

    /// Direct restore from save data, bypassing unlock and level-up rules
    pub(crate) fn restore_level(&mut self, level: u32) {
        self.current_level = level.min(self.definition.max_level);
    }

    /// Value of the first effect of this type at the current level.
    /// Locked skills contribute nothing.
    pub fn effect_value(&self, effect_type: EffectType) -> f32 {
        if !self.is_unlocked() {
            return 0.0;
        }
        self.definition
            .effects
            .iter()
            .find(|e| e.effect_type == effect_type)
            .map(|e| e.value_at(self.current_level))
            .unwrap_or(0.0)
    }

    /// Value of the first effect matching both type and percentage flag
    pub fn bonus(&self, effect_type: EffectType, is_percentage: bool) -> f32 {
        if !self.is_unlocked() {
            return 0.0;
        }
        self.definition
            .effects
            .iter()
            .find(|e| e.matches(effect_type, is_percentage))
            .map(|e| e.value_at(self.current_level))
            .unwrap_or(0.0)
    }

    /// Run the active hook with the value for the current level
    pub fn apply_effects<T: SkillTarget + ?Sized>(&self, target: &mut T) {
        match self.definition.hook {
            ActiveHook::None => {}
            ActiveHook::Vitality => {
                let amount = self.bonus(EffectType::HealthBoost, false).round() as i32;
                if amount != 0 {
                    let max = target.max_health();
                    target.set_max_health(max + amount, false);
                }
            }
            ActiveHook::Swiftness => {
                let factor = self.attack_speed_factor();
                let speed = target.attack_speed();
                target.set_attack_speed(speed * factor);
            }
        }
    }

    /// Undo [`Skill::apply_effects`]. Must run before the level changes,
    /// otherwise the wrong amount is taken back.
    pub fn remove_effects<T: SkillTarget + ?Sized>(&self, target: &mut T) {
        match self.definition.hook {
            ActiveHook::None => {}
            ActiveHook::Vitality => {
                let amount = self.bonus(EffectType::HealthBoost, false).round() as i32;
                if amount != 0 {
                    let max = target.max_health();
                    target.set_max_health(max - amount, false);
                }
            }
            ActiveHook::Swiftness => {
                let factor = self.attack_speed_factor();
                let speed = target.attack_speed();
                target.set_attack_speed(speed / factor);
            }
        }
    }

    fn attack_speed_factor(&self) -> f32 {
        let factor = 1.0 + self.bonus(EffectType::AttackSpeedBoost, true) / 100.0;
        if factor > 0.0 {
            factor
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::CharacterStats;

    fn definition(hook: ActiveHook, effects: Vec<SkillEffect>) -> Arc<SkillDefinition> {
        Arc::new(SkillDefinition {
            id: "test".to_string(),
            name: "Test".to_string(),
            description: String::new(),
            category: SkillCategory::Combat,
            tier: SkillTier::Basic,
            max_level: 5,
            requirements: SkillRequirement::new(2, 1).requires("root"),
            effects,
            hook,
        })
    }

    fn plain_skill() -> Skill {
        Skill::new(definition(
            ActiveHook::None,
            vec![SkillEffect::flat(EffectType::DamageBoost, 5.0, 2.0)],
        ))
    }

    #[test]
    fn test_level_up_cost_steps_every_two_levels() {
        let mut skill = plain_skill();
        let mut previous = 0;
        for level in 0..=5 {
            skill.restore_level(level);
            let cost = skill.level_up_cost();
            assert_eq!(cost, 1 + level / 2);
            assert!(cost >= previous);
            previous = cost;
        }
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let mut skill = plain_skill();
        skill.unlock();
        skill.unlock();
        assert_eq!(skill.current_level(), 1);
    }

    #[test]
    fn test_level_up_caps_at_max() {
        let mut skill = plain_skill();
        skill.unlock();
        for _ in 0..20 {
            skill.level_up();
        }
        assert_eq!(skill.current_level(), 5);
        assert!(skill.is_max_level());
    }

    #[test]
    fn test_can_unlock_requires_prerequisites() {
        let skill = plain_skill();
        let mut state = ProgressionState::new(10, 100);
        state.level = 5;
        assert!(!skill.can_unlock(&state));

        state.unlocked_skill_ids.insert("root".to_string());
        assert!(skill.can_unlock(&state));

        state.skill_points = 0;
        assert!(!skill.can_unlock(&state));
    }

    #[test]
    fn test_can_unlock_requires_level() {
        let skill = plain_skill();
        let mut state = ProgressionState::new(10, 100);
        state.unlocked_skill_ids.insert("root".to_string());
        assert!(!skill.can_unlock(&state));
    }

    #[test]
    fn test_can_level_up() {
        let mut skill = plain_skill();
        let state = ProgressionState::new(1, 100);
        assert!(!skill.can_level_up(&state), "locked skills cannot level");

        skill.unlock();
        assert!(skill.can_level_up(&state));

        skill.restore_level(2);
        assert!(!skill.can_level_up(&state), "level 2 costs 2 points");
    }

    #[test]
    fn test_effect_value_first_match_wins() {
        let mut skill = Skill::new(definition(
            ActiveHook::None,
            vec![
                SkillEffect::flat(EffectType::DamageBoost, 5.0, 1.0),
                SkillEffect::flat(EffectType::DamageBoost, 50.0, 1.0),
            ],
        ));
        assert_eq!(skill.effect_value(EffectType::DamageBoost), 0.0);
        skill.unlock();
        assert_eq!(skill.effect_value(EffectType::DamageBoost), 5.0);
        assert_eq!(skill.effect_value(EffectType::LifeSteal), 0.0);
    }

    #[test]
    fn test_bonus_respects_percentage_flag() {
        let mut skill = Skill::new(definition(
            ActiveHook::None,
            vec![
                SkillEffect::flat(EffectType::DamageBoost, 5.0, 1.0),
                SkillEffect::percent(EffectType::DamageBoost, 10.0, 5.0),
            ],
        ));
        skill.unlock();
        skill.level_up();
        assert_eq!(skill.bonus(EffectType::DamageBoost, false), 6.0);
        assert_eq!(skill.bonus(EffectType::DamageBoost, true), 15.0);
    }

    #[test]
    fn test_vitality_apply_and_remove_use_current_level() {
        let mut skill = Skill::new(definition(
            ActiveHook::Vitality,
            vec![SkillEffect::flat(EffectType::HealthBoost, 20.0, 10.0)],
        ));
        let mut stats = CharacterStats::new(100, 1.0);

        skill.unlock();
        skill.apply_effects(&mut stats);
        assert_eq!(stats.max_health(), 120);

        skill.remove_effects(&mut stats);
        skill.level_up();
        skill.apply_effects(&mut stats);
        assert_eq!(stats.max_health(), 130);
    }

    #[test]
    fn test_swiftness_round_trips_attack_speed() {
        let mut skill = Skill::new(definition(
            ActiveHook::Swiftness,
            vec![SkillEffect::percent(EffectType::AttackSpeedBoost, 25.0, 0.0)],
        ));
        let mut stats = CharacterStats::new(100, 2.0);
        skill.unlock();

        skill.apply_effects(&mut stats);
        assert!((stats.attack_speed() - 2.5).abs() < 1e-5);

        skill.remove_effects(&mut stats);
        assert!((stats.attack_speed() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_locked_skill_hooks_do_nothing() {
        let skill = Skill::new(definition(
            ActiveHook::Vitality,
            vec![SkillEffect::flat(EffectType::HealthBoost, 20.0, 10.0)],
        ));
        let mut stats = CharacterStats::new(100, 1.0);
        skill.apply_effects(&mut stats);
        assert_eq!(stats.max_health(), 100);
    }
}
