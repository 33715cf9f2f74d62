//! Status effects system
//!
//! Timed conditions projectiles can leave on their targets.

use serde::{Deserialize, Serialize};

/// Kinds of status a hit can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Poison,
    Burn,
    Bleed,
    Slow,
    Stun,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Seconds remaining
    pub duration: f32,
}

/// Active status effects on an entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    pub effects: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a status, or refresh its duration if already active
    pub fn add_effect(&mut self, kind: StatusKind, duration: f32) {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.duration = existing.duration.max(duration);
        } else {
            self.effects.push(StatusEffect { kind, duration });
        }
    }

    pub fn has_effect(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Advance all durations and drop expired effects.
    /// Returns the kinds that expired this tick.
    pub fn tick(&mut self, delta_secs: f32) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        self.effects.retain_mut(|effect| {
            effect.duration -= delta_secs;
            if effect.duration <= 0.0 {
                expired.push(effect.kind);
                false
            } else {
                true
            }
        });
        expired
    }
}
