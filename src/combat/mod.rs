//! Combat system

pub mod health;
pub mod damage;
pub mod status;
pub mod projectile;

pub use health::{Damageable, Health};
pub use damage::{
    aoe_multiplier, falloff_multiplier, pierce_multiplier, scale_damage, DamageMode, Falloff,
    ProjectileConfig, StatusApplication, MIN_PIERCE_MULTIPLIER,
};
pub use status::{StatusEffect, StatusEffects, StatusKind};
pub use projectile::{HitReport, ImpactResult, Projectile};
