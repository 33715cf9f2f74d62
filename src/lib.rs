//! Visions Foretold - skill progression and damage resolution
//!
//! Skills, experience and skill points for the player, and the rules that
//! turn a projectile hit into damage on the things it touched.

pub mod ecs;
pub mod combat;
pub mod progression;
pub mod data;
pub mod save;

// Re-export commonly used types
pub use combat::{Damageable, DamageMode, Health, Projectile, ProjectileConfig};
pub use data::DataManager;
pub use ecs::CharacterStats;
pub use progression::{EffectType, ProgressionEvent, ProgressionState, SkillCatalog, SkillManager};
pub use save::SaveStore;
