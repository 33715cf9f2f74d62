//! Skill effects
//!
//! Typed, leveled numeric modifiers carried by skills.

use serde::{Deserialize, Serialize};

/// Category of gameplay bonus a skill effect grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EffectType {
    DamageBoost,
    AttackSpeedBoost,
    HealthBoost,
    DefenseBoost,
    SpellPowerBoost,
    CooldownReduction,
    CriticalChance,
    LifeSteal,
    MovementSpeed,
    ManaRegeneration,
    ComboExtension,
    AreaOfEffect,
    PierceChance,
    ElementalDamage,
    StatusResistance,
}

impl EffectType {
    pub fn name(&self) -> &'static str {
        match self {
            EffectType::DamageBoost => "Damage",
            EffectType::AttackSpeedBoost => "Attack Speed",
            EffectType::HealthBoost => "Health",
            EffectType::DefenseBoost => "Defense",
            EffectType::SpellPowerBoost => "Spell Power",
            EffectType::CooldownReduction => "Cooldown Reduction",
            EffectType::CriticalChance => "Critical Chance",
            EffectType::LifeSteal => "Life Steal",
            EffectType::MovementSpeed => "Movement Speed",
            EffectType::ManaRegeneration => "Mana Regeneration",
            EffectType::ComboExtension => "Combo Extension",
            EffectType::AreaOfEffect => "Area of Effect",
            EffectType::PierceChance => "Pierce Chance",
            EffectType::ElementalDamage => "Elemental Damage",
            EffectType::StatusResistance => "Status Resistance",
        }
    }
}

/// A single numeric modifier owned by a skill definition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillEffect {
    pub effect_type: EffectType,
    /// Value at skill level 1
    pub base_value: f32,
    /// Added for every level above 1
    pub value_per_level: f32,
    /// Percentage modifiers are summed separately from flat ones
    pub is_percentage: bool,
}

impl SkillEffect {
    pub fn flat(effect_type: EffectType, base_value: f32, value_per_level: f32) -> Self {
        Self {
            effect_type,
            base_value,
            value_per_level,
            is_percentage: false,
        }
    }

    pub fn percent(effect_type: EffectType, base_value: f32, value_per_level: f32) -> Self {
        Self {
            effect_type,
            base_value,
            value_per_level,
            is_percentage: true,
        }
    }

    /// Effect value at the given skill level (levels below 1 are treated as 1)
    pub fn value_at(&self, level: u32) -> f32 {
        let steps = level.max(1) - 1;
        self.base_value + self.value_per_level * steps as f32
    }

    /// Whether this effect is the (type, percentage) pair being asked for
    pub fn matches(&self, effect_type: EffectType, is_percentage: bool) -> bool {
        self.effect_type == effect_type && self.is_percentage == is_percentage
    }

    /// Short human readable line, e.g. "+15% Spell Power"
    pub fn describe(&self, level: u32) -> String {
        let value = self.value_at(level);
        if self.is_percentage {
            format!("{:+}% {}", value, self.effect_type.name())
        } else {
            format!("{:+} {}", value, self.effect_type.name())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_scales_linearly_with_level() {
        let effect = SkillEffect::percent(EffectType::SpellPowerBoost, 10.0, 5.0);
        assert_eq!(effect.value_at(1), 10.0);
        assert_eq!(effect.value_at(2), 15.0);
        assert_eq!(effect.value_at(5), 30.0);
    }

    #[test]
    fn test_level_zero_reads_as_level_one() {
        let effect = SkillEffect::flat(EffectType::DamageBoost, 5.0, 2.0);
        assert_eq!(effect.value_at(0), 5.0);
    }

    #[test]
    fn test_matches_requires_same_percentage_flag() {
        let effect = SkillEffect::flat(EffectType::DamageBoost, 5.0, 2.0);
        assert!(effect.matches(EffectType::DamageBoost, false));
        assert!(!effect.matches(EffectType::DamageBoost, true));
        assert!(!effect.matches(EffectType::DefenseBoost, false));
    }

    #[test]
    fn test_describe() {
        let effect = SkillEffect::percent(EffectType::CriticalChance, 5.0, 2.5);
        assert_eq!(effect.describe(3), "+10% Critical Chance");
    }
}
