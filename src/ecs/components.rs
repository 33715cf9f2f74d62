//! ECS Components
//!
//! Components carried by entities that projectiles can hit.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::combat::{Damageable, Health};
use crate::progression::SkillTarget;

// ============================================================================
// Position & Movement
// ============================================================================

/// Center of an entity in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position(pub Vec3);

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    pub fn distance(&self, point: Vec3) -> f32 {
        self.0.distance(point)
    }
}

/// Accumulated velocity; knockback impulses are added here
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec3);

// ============================================================================
// Identity & Filtering
// ============================================================================

/// Display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

/// Collision layer index (0-31), matched against a projectile's layer mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layer(pub u32);

impl Layer {
    pub fn in_mask(&self, mask: u32) -> bool {
        self.0 < 32 && mask & (1 << self.0) != 0
    }
}

/// Gameplay tag, e.g. "Enemy" or "Player"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(pub String);

impl Tag {
    pub fn new(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

// ============================================================================
// Character
// ============================================================================

/// The stats a player's skills act on directly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub health: Health,
    /// Attacks per second
    pub attack_speed: f32,
}

impl CharacterStats {
    pub fn new(max_health: i32, attack_speed: f32) -> Self {
        Self {
            health: Health::new(max_health),
            attack_speed,
        }
    }
}

impl Default for CharacterStats {
    fn default() -> Self {
        Self::new(100, 1.0)
    }
}

impl Damageable for CharacterStats {
    fn take_damage(&mut self, amount: i32) -> i32 {
        self.health.take_damage(amount)
    }

    fn heal(&mut self, amount: i32) -> i32 {
        self.health.heal(amount)
    }

    fn current_health(&self) -> i32 {
        self.health.current
    }

    fn max_health(&self) -> i32 {
        self.health.max
    }

    fn set_max_health(&mut self, value: i32, heal_to_full: bool) {
        self.health.set_max_health(value, heal_to_full);
    }
}

impl SkillTarget for CharacterStats {
    fn attack_speed(&self) -> f32 {
        self.attack_speed
    }

    fn set_attack_speed(&mut self, value: f32) {
        self.attack_speed = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_mask() {
        assert!(Layer(0).in_mask(0b1));
        assert!(Layer(3).in_mask(0b1000));
        assert!(!Layer(3).in_mask(0b0111));
        assert!(!Layer(40).in_mask(u32::MAX));
    }

    #[test]
    fn test_position_distance() {
        let pos = Position::new(3.0, 4.0, 0.0);
        assert_eq!(pos.distance(Vec3::ZERO), 5.0);
    }
}
