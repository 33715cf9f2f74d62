//! Progression systems

pub mod effect;
pub mod skill;
pub mod catalog;
pub mod state;
pub mod xp;
pub mod events;
pub mod manager;

pub use effect::{EffectType, SkillEffect};
pub use skill::{
    ActiveHook, Skill, SkillCategory, SkillDefinition, SkillRequirement, SkillTarget, SkillTier,
};
pub use catalog::{builtin_skills, default_catalog, CatalogError, SkillCatalog, XP_BONUS_SKILL_ID};
pub use state::ProgressionState;
pub use events::{EventBus, ProgressionEvent};
pub use manager::{DamageRoll, ProgressionConfig, SkillManager};
