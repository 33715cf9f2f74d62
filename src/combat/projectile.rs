//! Projectile impact resolution
//!
//! Resolves a projectile's hits against the entities in a `hecs::World`.
//! Movement and collision detection belong to the engine; this module is told
//! what was hit and where, and decides who takes how much damage.

use std::collections::HashSet;

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;

use super::damage::{
    aoe_multiplier, falloff_multiplier, pierce_multiplier, scale_damage, DamageMode,
    ProjectileConfig,
};
use super::health::{Damageable, Health};
use super::status::{StatusEffects, StatusKind};
use crate::ecs::{Layer, Position, Tag, Velocity};

/// One target taking damage from a projectile
#[derive(Debug, Clone, PartialEq)]
pub struct HitReport {
    pub target: Entity,
    /// Damage actually removed from the target's health
    pub damage: i32,
    /// This hit brought the target to zero health
    pub killed: bool,
    pub knockback: Vec3,
    pub status_applied: Option<StatusKind>,
}

/// Result of one collision callback
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImpactResult {
    pub hits: Vec<HitReport>,
    /// True exactly once: on the impact that ended the projectile
    pub destroyed: bool,
}

/// A projectile in flight
#[derive(Debug, Clone)]
pub struct Projectile {
    config: ProjectileConfig,
    origin: Vec3,
    position: Vec3,
    has_hit: bool,
    pierce_count: u32,
    pierced: HashSet<Entity>,
}

impl Projectile {
    pub fn new(config: ProjectileConfig, origin: Vec3) -> Self {
        Self {
            config,
            origin,
            position: origin,
            has_hit: false,
            pierce_count: 0,
            pierced: HashSet::new(),
        }
    }

    pub fn config(&self) -> &ProjectileConfig {
        &self.config
    }

    /// Update the position after the engine moved the projectile
    pub fn move_to(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn distance_traveled(&self) -> f32 {
        self.origin.distance(self.position)
    }

    pub fn is_destroyed(&self) -> bool {
        self.has_hit
    }

    pub fn pierce_count(&self) -> u32 {
        self.pierce_count
    }

    /// Whether `entity` is on a masked layer, carries the target tag and has health
    pub fn is_valid_target(&self, world: &World, entity: Entity) -> bool {
        let on_layer = world
            .get::<&Layer>(entity)
            .map(|layer| layer.in_mask(self.config.layer_mask))
            .unwrap_or(false);
        let tagged = world
            .get::<&Tag>(entity)
            .map(|tag| tag.0 == self.config.target_tag)
            .unwrap_or(false);
        on_layer && tagged && world.get::<&Health>(entity).is_ok()
    }

    /// The projectile touched `entity` at `impact_point`
    pub fn on_hit(
        &mut self,
        world: &mut World,
        entity: Entity,
        impact_point: Vec3,
        rng: &mut impl Rng,
    ) -> ImpactResult {
        if self.has_hit {
            return ImpactResult::default();
        }

        let falloff = falloff_multiplier(self.distance_traveled(), self.config.falloff.as_ref());
        let valid = self.is_valid_target(world, entity);

        match self.config.mode {
            DamageMode::AreaOfEffect { radius } if radius > 0.0 => {
                let hits = self.explode(world, impact_point, radius, falloff, rng);
                self.finish(hits)
            }
            DamageMode::Piercing {
                max_targets,
                damage_loss_per_pierce,
            } => {
                if !valid {
                    return self.finish(Vec::new());
                }
                if !self.pierced.insert(entity) {
                    return ImpactResult::default();
                }

                let multiplier =
                    falloff * pierce_multiplier(self.pierce_count, damage_loss_per_pierce);
                let hits = self
                    .strike(world, entity, impact_point, multiplier, rng)
                    .into_iter()
                    .collect();
                self.pierce_count += 1;

                if self.pierce_count >= max_targets.max(1) {
                    self.finish(hits)
                } else {
                    ImpactResult {
                        hits,
                        destroyed: false,
                    }
                }
            }
            // Single target, or an AOE whose radius disables the splash
            _ => {
                let hits = if valid {
                    self.strike(world, entity, impact_point, falloff, rng).into_iter().collect()
                } else {
                    Vec::new()
                };
                self.finish(hits)
            }
        }
    }

    /// The projectile hit level geometry or anything else without health
    pub fn on_obstacle(&mut self) -> ImpactResult {
        if self.has_hit {
            return ImpactResult::default();
        }
        self.finish(Vec::new())
    }

    fn finish(&mut self, hits: Vec<HitReport>) -> ImpactResult {
        let destroyed = !self.has_hit;
        self.has_hit = true;
        ImpactResult { hits, destroyed }
    }

    fn explode(
        &self,
        world: &mut World,
        impact_point: Vec3,
        radius: f32,
        falloff: f32,
        rng: &mut impl Rng,
    ) -> Vec<HitReport> {
        let in_range: Vec<(Entity, f32)> = world
            .query::<(&Position, &Health)>()
            .iter()
            .map(|(entity, (pos, _))| (entity, aoe_multiplier(pos.distance(impact_point), radius)))
            .filter(|&(_, scale)| scale > 0.0)
            .collect();

        let mut hits = Vec::new();
        for (entity, scale) in in_range {
            if !self.is_valid_target(world, entity) {
                continue;
            }
            if let Some(hit) = self.strike(world, entity, impact_point, falloff * scale, rng) {
                hits.push(hit);
            }
        }
        hits
    }

    /// Damage one target and run the per-hit side effects
    fn strike(
        &self,
        world: &mut World,
        entity: Entity,
        impact_point: Vec3,
        multiplier: f32,
        rng: &mut impl Rng,
    ) -> Option<HitReport> {
        let amount = scale_damage(self.config.base_damage, multiplier);

        let (damage, killed) = {
            let mut health = world.get::<&mut Health>(entity).ok()?;
            let was_alive = !health.is_dead();
            let dealt = health.take_damage(amount);
            (dealt, was_alive && health.is_dead())
        };

        let knockback = self.knockback(world, entity, impact_point);
        let status_applied = self.roll_status(world, entity, rng);

        log::debug!(
            "Projectile hit {:?} for {} damage{}",
            entity,
            damage,
            if killed { " (killed)" } else { "" }
        );

        Some(HitReport {
            target: entity,
            damage,
            killed,
            knockback,
            status_applied,
        })
    }

    fn knockback(&self, world: &mut World, entity: Entity, impact_point: Vec3) -> Vec3 {
        if self.config.knockback_force <= 0.0 {
            return Vec3::ZERO;
        }
        let Ok(center) = world.get::<&Position>(entity).map(|pos| pos.0) else {
            return Vec3::ZERO;
        };

        let impulse = (center - impact_point).normalize_or_zero() * self.config.knockback_force;
        if let Ok(mut velocity) = world.get::<&mut Velocity>(entity) {
            velocity.0 += impulse;
            return impulse;
        }
        if world.insert_one(entity, Velocity(impulse)).is_err() {
            return Vec3::ZERO;
        }
        impulse
    }

    fn roll_status(
        &self,
        world: &mut World,
        entity: Entity,
        rng: &mut impl Rng,
    ) -> Option<StatusKind> {
        let status = self.config.status?;
        if rng.gen::<f32>() >= status.chance {
            return None;
        }

        if let Ok(mut effects) = world.get::<&mut StatusEffects>(entity) {
            effects.add_effect(status.kind, status.duration);
            return Some(status.kind);
        }
        let mut effects = StatusEffects::new();
        effects.add_effect(status.kind, status.duration);
        world.insert_one(entity, effects).ok()?;
        Some(status.kind)
    }
}
