//! Skill catalog
//!
//! The fixed registry of every skill definition, plus the built-in skill table.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use super::effect::{EffectType, SkillEffect};
use super::skill::{ActiveHook, SkillCategory, SkillDefinition, SkillRequirement, SkillTier};

/// Id of the skill whose cooldown reduction doubles as an experience bonus
pub const XP_BONUS_SKILL_ID: &str = "quick_learner";

/// Rejected skill definitions
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("Skill '{skill_id}' declares {effect_type:?} (percentage: {is_percentage}) more than once")]
    DuplicateEffect {
        skill_id: String,
        effect_type: EffectType,
        is_percentage: bool,
    },

    #[error("Skill '{0}' must have a max level of at least 1")]
    InvalidMaxLevel(String),

    #[error("Skill definition has an empty id")]
    EmptyId,
}

/// Registry of skill definitions keyed by id, in registration order
#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    definitions: HashMap<String, Arc<SkillDefinition>>,
    order: Vec<String>,
}

impl SkillCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list, rejecting the whole list on the first invalid entry
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = SkillDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.register(definition)?;
        }
        catalog.warn_on_dangling_prerequisites();
        Ok(catalog)
    }

    /// Register a definition. Returns `Ok(false)` if the id is already taken;
    /// the first registration wins.
    pub fn register(&mut self, definition: SkillDefinition) -> Result<bool, CatalogError> {
        validate_definition(&definition)?;

        if self.definitions.contains_key(&definition.id) {
            log::warn!("Skill '{}' registered twice; keeping the first", definition.id);
            return Ok(false);
        }

        self.order.push(definition.id.clone());
        self.definitions
            .insert(definition.id.clone(), Arc::new(definition));
        Ok(true)
    }

    pub fn get(&self, skill_id: &str) -> Option<&Arc<SkillDefinition>> {
        self.definitions.get(skill_id)
    }

    pub fn contains(&self, skill_id: &str) -> bool {
        self.definitions.contains_key(skill_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Definitions in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<SkillDefinition>> {
        self.order.iter().filter_map(|id| self.definitions.get(id))
    }

    pub fn by_category(&self, category: SkillCategory) -> Vec<&Arc<SkillDefinition>> {
        self.iter().filter(|d| d.category == category).collect()
    }

    /// Prerequisites pointing at unknown skills are tolerated (they simply
    /// never count as satisfied) but worth a warning at startup.
    fn warn_on_dangling_prerequisites(&self) {
        for definition in self.iter() {
            for prereq in &definition.requirements.prerequisite_skill_ids {
                if !self.contains(prereq) {
                    log::warn!(
                        "Skill '{}' requires unknown skill '{}'; it can never be unlocked",
                        definition.id,
                        prereq
                    );
                }
            }
        }
    }
}

fn validate_definition(definition: &SkillDefinition) -> Result<(), CatalogError> {
    if definition.id.is_empty() {
        return Err(CatalogError::EmptyId);
    }
    if definition.max_level == 0 {
        return Err(CatalogError::InvalidMaxLevel(definition.id.clone()));
    }
    for (i, effect) in definition.effects.iter().enumerate() {
        let duplicate = definition.effects[..i]
            .iter()
            .any(|earlier| earlier.matches(effect.effect_type, effect.is_percentage));
        if duplicate {
            return Err(CatalogError::DuplicateEffect {
                skill_id: definition.id.clone(),
                effect_type: effect.effect_type,
                is_percentage: effect.is_percentage,
            });
        }
    }
    Ok(())
}

// =============================================================================
// Combat Skills
// =============================================================================

pub fn skill_power_strike() -> SkillDefinition {
    SkillDefinition {
        id: "power_strike".to_string(),
        name: "Power Strike".to_string(),
        description: "Hit harder with every blow.".to_string(),
        category: SkillCategory::Combat,
        tier: SkillTier::Basic,
        max_level: 5,
        requirements: SkillRequirement::new(1, 1),
        effects: vec![SkillEffect::flat(EffectType::DamageBoost, 5.0, 2.5)],
        hook: ActiveHook::None,
    }
}

pub fn skill_keen_eye() -> SkillDefinition {
    SkillDefinition {
        id: "keen_eye".to_string(),
        name: "Keen Eye".to_string(),
        description: "Find the gaps in your foe's armor.".to_string(),
        category: SkillCategory::Combat,
        tier: SkillTier::Basic,
        max_level: 5,
        requirements: SkillRequirement::new(2, 1),
        effects: vec![SkillEffect::percent(EffectType::CriticalChance, 5.0, 2.5)],
        hook: ActiveHook::None,
    }
}

pub fn skill_berserker_fury() -> SkillDefinition {
    SkillDefinition {
        id: "berserker_fury".to_string(),
        name: "Berserker Fury".to_string(),
        description: "Channel rage into raw damage.".to_string(),
        category: SkillCategory::Combat,
        tier: SkillTier::Advanced,
        max_level: 5,
        requirements: SkillRequirement::new(5, 2).requires("power_strike"),
        effects: vec![SkillEffect::percent(EffectType::DamageBoost, 10.0, 5.0)],
        hook: ActiveHook::None,
    }
}

pub fn skill_combo_master() -> SkillDefinition {
    SkillDefinition {
        id: "combo_master".to_string(),
        name: "Combo Master".to_string(),
        description: "Chain additional strikes into your combos.".to_string(),
        category: SkillCategory::Combat,
        tier: SkillTier::Advanced,
        max_level: 3,
        requirements: SkillRequirement::new(4, 2).requires("power_strike"),
        effects: vec![SkillEffect::flat(EffectType::ComboExtension, 1.0, 1.0)],
        hook: ActiveHook::None,
    }
}

pub fn skill_whirlwind() -> SkillDefinition {
    SkillDefinition {
        id: "whirlwind".to_string(),
        name: "Whirlwind".to_string(),
        description: "Your attacks sweep a wider area.".to_string(),
        category: SkillCategory::Combat,
        tier: SkillTier::Expert,
        max_level: 5,
        requirements: SkillRequirement::new(8, 3).requires("berserker_fury"),
        effects: vec![SkillEffect::percent(EffectType::AreaOfEffect, 15.0, 5.0)],
        hook: ActiveHook::None,
    }
}

// =============================================================================
// Magic Skills
// =============================================================================

pub fn skill_arcane_power() -> SkillDefinition {
    SkillDefinition {
        id: "arcane_power".to_string(),
        name: "Arcane Power".to_string(),
        description: "Amplify the force of your spells.".to_string(),
        category: SkillCategory::Magic,
        tier: SkillTier::Basic,
        max_level: 5,
        requirements: SkillRequirement::new(1, 1),
        effects: vec![SkillEffect::percent(EffectType::SpellPowerBoost, 10.0, 5.0)],
        hook: ActiveHook::None,
    }
}

pub fn skill_mana_flow() -> SkillDefinition {
    SkillDefinition {
        id: "mana_flow".to_string(),
        name: "Mana Flow".to_string(),
        description: "Mana returns to you faster.".to_string(),
        category: SkillCategory::Magic,
        tier: SkillTier::Basic,
        max_level: 5,
        requirements: SkillRequirement::new(2, 1),
        effects: vec![SkillEffect::percent(EffectType::ManaRegeneration, 10.0, 5.0)],
        hook: ActiveHook::None,
    }
}

pub fn skill_elemental_mastery() -> SkillDefinition {
    SkillDefinition {
        id: "elemental_mastery".to_string(),
        name: "Elemental Mastery".to_string(),
        description: "Fire, frost and storm bend to your will.".to_string(),
        category: SkillCategory::Magic,
        tier: SkillTier::Advanced,
        max_level: 5,
        requirements: SkillRequirement::new(5, 2).requires("arcane_power"),
        effects: vec![SkillEffect::percent(EffectType::ElementalDamage, 10.0, 5.0)],
        hook: ActiveHook::None,
    }
}

pub fn skill_piercing_bolts() -> SkillDefinition {
    SkillDefinition {
        id: "piercing_bolts".to_string(),
        name: "Piercing Bolts".to_string(),
        description: "Projectiles may pass through their first target.".to_string(),
        category: SkillCategory::Magic,
        tier: SkillTier::Expert,
        max_level: 5,
        requirements: SkillRequirement::new(8, 3).requires("elemental_mastery"),
        effects: vec![SkillEffect::percent(EffectType::PierceChance, 10.0, 5.0)],
        hook: ActiveHook::None,
    }
}

// =============================================================================
// Defense Skills
// =============================================================================

pub fn skill_vitality() -> SkillDefinition {
    SkillDefinition {
        id: "vitality".to_string(),
        name: "Vitality".to_string(),
        description: "Increase maximum health.".to_string(),
        category: SkillCategory::Defense,
        tier: SkillTier::Basic,
        max_level: 5,
        requirements: SkillRequirement::new(1, 1),
        effects: vec![SkillEffect::flat(EffectType::HealthBoost, 20.0, 10.0)],
        hook: ActiveHook::Vitality,
    }
}

pub fn skill_iron_skin() -> SkillDefinition {
    SkillDefinition {
        id: "iron_skin".to_string(),
        name: "Iron Skin".to_string(),
        description: "Shrug off a share of incoming damage.".to_string(),
        category: SkillCategory::Defense,
        tier: SkillTier::Basic,
        max_level: 5,
        requirements: SkillRequirement::new(2, 1),
        effects: vec![SkillEffect::percent(EffectType::DefenseBoost, 5.0, 2.5)],
        hook: ActiveHook::None,
    }
}

pub fn skill_vampiric_touch() -> SkillDefinition {
    SkillDefinition {
        id: "vampiric_touch".to_string(),
        name: "Vampiric Touch".to_string(),
        description: "Heal for a portion of the damage you deal.".to_string(),
        category: SkillCategory::Defense,
        tier: SkillTier::Advanced,
        max_level: 5,
        requirements: SkillRequirement::new(6, 2).requires("vitality"),
        effects: vec![SkillEffect::percent(EffectType::LifeSteal, 3.0, 1.0)],
        hook: ActiveHook::None,
    }
}

pub fn skill_resilience() -> SkillDefinition {
    SkillDefinition {
        id: "resilience".to_string(),
        name: "Resilience".to_string(),
        description: "Resist poisons, burns and stuns.".to_string(),
        category: SkillCategory::Defense,
        tier: SkillTier::Expert,
        max_level: 5,
        requirements: SkillRequirement::new(10, 3).requires("iron_skin"),
        effects: vec![SkillEffect::percent(EffectType::StatusResistance, 10.0, 5.0)],
        hook: ActiveHook::None,
    }
}

// =============================================================================
// Utility Skills
// =============================================================================

pub fn skill_quick_learner() -> SkillDefinition {
    SkillDefinition {
        id: XP_BONUS_SKILL_ID.to_string(),
        name: "Quick Learner".to_string(),
        description: "Faster hands, faster recovery, faster learning.".to_string(),
        category: SkillCategory::Utility,
        tier: SkillTier::Basic,
        max_level: 5,
        requirements: SkillRequirement::new(1, 1),
        effects: vec![
            SkillEffect::percent(EffectType::AttackSpeedBoost, 5.0, 2.5),
            SkillEffect::percent(EffectType::CooldownReduction, 10.0, 5.0),
        ],
        hook: ActiveHook::Swiftness,
    }
}

pub fn skill_fleet_footed() -> SkillDefinition {
    SkillDefinition {
        id: "fleet_footed".to_string(),
        name: "Fleet Footed".to_string(),
        description: "Move faster.".to_string(),
        category: SkillCategory::Utility,
        tier: SkillTier::Basic,
        max_level: 5,
        requirements: SkillRequirement::new(3, 1),
        effects: vec![SkillEffect::percent(EffectType::MovementSpeed, 5.0, 2.5)],
        hook: ActiveHook::None,
    }
}

pub fn skill_focused_mind() -> SkillDefinition {
    SkillDefinition {
        id: "focused_mind".to_string(),
        name: "Focused Mind".to_string(),
        description: "Abilities come off cooldown sooner.".to_string(),
        category: SkillCategory::Utility,
        tier: SkillTier::Advanced,
        max_level: 5,
        requirements: SkillRequirement::new(6, 2).requires(XP_BONUS_SKILL_ID),
        effects: vec![SkillEffect::percent(EffectType::CooldownReduction, 5.0, 2.5)],
        hook: ActiveHook::None,
    }
}

// =============================================================================
// Skill Collections
// =============================================================================

/// Every built-in skill definition, grouped by branch
pub fn builtin_skills() -> Vec<SkillDefinition> {
    vec![
        skill_power_strike(),
        skill_keen_eye(),
        skill_berserker_fury(),
        skill_combo_master(),
        skill_whirlwind(),
        skill_arcane_power(),
        skill_mana_flow(),
        skill_elemental_mastery(),
        skill_piercing_bolts(),
        skill_vitality(),
        skill_iron_skin(),
        skill_vampiric_touch(),
        skill_resilience(),
        skill_quick_learner(),
        skill_fleet_footed(),
        skill_focused_mind(),
    ]
}

/// The built-in catalog
pub fn default_catalog() -> SkillCatalog {
    let mut catalog = SkillCatalog::new();
    for definition in builtin_skills() {
        if let Err(e) = catalog.register(definition) {
            log::error!("Built-in skill rejected: {}", e);
        }
    }
    catalog
}
