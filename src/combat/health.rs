//! Health collaborator
//!
//! Anything that can be damaged or healed implements [`Damageable`].

use serde::{Deserialize, Serialize};

/// Health-like capability consumed by projectiles and the vitality skill
pub trait Damageable {
    /// Apply damage, returning the amount actually removed
    fn take_damage(&mut self, amount: i32) -> i32;

    /// Restore health, returning the amount actually restored
    fn heal(&mut self, amount: i32) -> i32;

    fn current_health(&self) -> i32;

    fn max_health(&self) -> i32;

    /// Change maximum health; current health is clamped to the new maximum
    fn set_max_health(&mut self, value: i32, heal_to_full: bool);

    fn is_dead(&self) -> bool {
        self.current_health() <= 0
    }
}

/// Hit points component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    pub fn percentage(&self) -> f32 {
        self.current as f32 / self.max as f32
    }
}

impl Damageable for Health {
    fn take_damage(&mut self, amount: i32) -> i32 {
        let actual = amount.max(0).min(self.current.max(0));
        self.current -= actual;
        actual
    }

    fn heal(&mut self, amount: i32) -> i32 {
        let actual = amount.max(0).min(self.max - self.current);
        self.current += actual;
        actual
    }

    fn current_health(&self) -> i32 {
        self.current
    }

    fn max_health(&self) -> i32 {
        self.max
    }

    fn set_max_health(&mut self, value: i32, heal_to_full: bool) {
        self.max = value.max(1);
        if heal_to_full {
            self.current = self.max;
        } else {
            self.current = self.current.min(self.max);
        }
    }
}
