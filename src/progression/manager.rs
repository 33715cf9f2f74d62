//! Skill manager
//!
//! Owns one player's progression: unlock and level-up transactions,
//! experience intake, bonus aggregation and save/load.

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::{SkillCatalog, XP_BONUS_SKILL_ID};
use super::effect::EffectType;
use super::events::{EventBus, ProgressionEvent};
use super::skill::{Skill, SkillCategory, SkillTarget};
use super::state::ProgressionState;
use super::xp::{apply_xp_bonus, xp_to_next_level};
use crate::ecs::CharacterStats;

/// Tunables for leveling and skill point income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// XP needed to go from level 1 to level 2
    pub base_experience: u32,
    /// Growth factor of the XP requirement per level
    pub experience_scaling: f32,
    pub skill_points_per_level: u32,
    pub starting_skill_points: u32,
    /// Skill whose cooldown reduction also boosts XP gains
    pub xp_bonus_skill_id: String,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            base_experience: 100,
            experience_scaling: 1.2,
            skill_points_per_level: 1,
            starting_skill_points: 1,
            xp_bonus_skill_id: XP_BONUS_SKILL_ID.to_string(),
        }
    }
}

impl ProgressionConfig {
    pub fn xp_to_next_level(&self, level: u32) -> u32 {
        xp_to_next_level(level, self.base_experience, self.experience_scaling)
    }

    /// Progression for a brand new character
    pub fn new_game_state(&self) -> ProgressionState {
        ProgressionState::new(self.starting_skill_points, self.xp_to_next_level(1))
    }
}

/// Outcome of one damage roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRoll {
    pub amount: i32,
    pub is_crit: bool,
}

/// Orchestrates the skill catalog and one player's progression state.
///
/// The catalog is shared read-only; skill levels live in this manager, so
/// several actors can share one catalog without stepping on each other.
#[derive(Debug)]
pub struct SkillManager<T: SkillTarget = CharacterStats> {
    catalog: Arc<SkillCatalog>,
    skills: HashMap<String, Skill>,
    state: ProgressionState,
    config: ProgressionConfig,
    target: T,
    events: EventBus,
}

impl<T: SkillTarget> SkillManager<T> {
    /// Start a new game for `target`
    pub fn new(catalog: Arc<SkillCatalog>, config: ProgressionConfig, target: T) -> Self {
        let skills = catalog
            .iter()
            .map(|definition| (definition.id.clone(), Skill::new(Arc::clone(definition))))
            .collect();
        let state = config.new_game_state();

        log::info!(
            "Skill manager ready: {} skills, {} starting skill points",
            catalog.len(),
            state.skill_points
        );

        Self {
            catalog,
            skills,
            state,
            config,
            target,
            events: EventBus::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&ProgressionEvent) + 'static,
    {
        self.events.subscribe(subscriber);
    }

    /// Events emitted since the last call while no subscriber was attached
    pub fn drain_events(&mut self) -> Vec<ProgressionEvent> {
        self.events.drain()
    }

    pub fn skill(&self, skill_id: &str) -> Option<&Skill> {
        self.skills.get(skill_id)
    }

    pub fn is_unlocked(&self, skill_id: &str) -> bool {
        self.skills.get(skill_id).is_some_and(Skill::is_unlocked)
    }

    /// All skills in catalog order
    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.catalog
            .iter()
            .filter_map(|definition| self.skills.get(&definition.id))
    }

    pub fn unlocked_skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills().filter(|s| s.is_unlocked())
    }

    pub fn skills_in_category(&self, category: SkillCategory) -> Vec<&Skill> {
        self.skills()
            .filter(|s| s.definition().category == category)
            .collect()
    }

    /// Locked skills the player could unlock right now
    pub fn available_skills(&self) -> Vec<&Skill> {
        self.skills()
            .filter(|s| !s.is_unlocked() && s.can_unlock(&self.state))
            .collect()
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Spend skill points to unlock a skill. Fails without side effects if the
    /// id is unknown, the skill is already unlocked or requirements are unmet.
    pub fn unlock_skill(&mut self, skill_id: &str) -> bool {
        let Some(skill) = self.skills.get_mut(skill_id) else {
            log::debug!("Unlock failed: unknown skill '{}'", skill_id);
            return false;
        };
        if skill.is_unlocked() || !skill.can_unlock(&self.state) {
            return false;
        }

        let cost = skill.definition().requirements.required_skill_points;
        self.state.skill_points -= cost;
        skill.unlock();
        self.state.unlocked_skill_ids.insert(skill_id.to_string());
        self.state
            .skill_levels
            .insert(skill_id.to_string(), skill.current_level());
        skill.apply_effects(&mut self.target);

        log::info!("Unlocked skill '{}' for {} points", skill.name(), cost);

        let level = skill.current_level();
        self.events.emit(ProgressionEvent::SkillUnlocked {
            skill_id: skill_id.to_string(),
            level,
        });
        self.events.emit(ProgressionEvent::SkillPointsChanged {
            current: self.state.skill_points,
        });
        true
    }

    /// Spend skill points to raise an unlocked skill by one level
    pub fn level_up_skill(&mut self, skill_id: &str) -> bool {
        let Some(skill) = self.skills.get_mut(skill_id) else {
            log::debug!("Level up failed: unknown skill '{}'", skill_id);
            return false;
        };
        if !skill.can_level_up(&self.state) {
            return false;
        }

        // Remove with the old level's values before anything changes
        skill.remove_effects(&mut self.target);

        let cost = skill.level_up_cost();
        self.state.skill_points -= cost;
        skill.level_up();
        self.state
            .skill_levels
            .insert(skill_id.to_string(), skill.current_level());
        skill.apply_effects(&mut self.target);

        let level = skill.current_level();
        log::info!("'{}' reached level {} for {} points", skill.name(), level, cost);

        self.events.emit(ProgressionEvent::SkillLeveledUp {
            skill_id: skill_id.to_string(),
            level,
        });
        self.events.emit(ProgressionEvent::SkillPointsChanged {
            current: self.state.skill_points,
        });
        true
    }

    /// Grant experience, leveling up as many times as the total allows
    pub fn add_experience(&mut self, amount: u32) {
        let amount = match self.skills.get(&self.config.xp_bonus_skill_id) {
            Some(skill) if skill.is_unlocked() => {
                apply_xp_bonus(amount, skill.effect_value(EffectType::CooldownReduction))
            }
            _ => amount,
        };

        self.state.experience = self.state.experience.saturating_add(amount);
        self.events
            .emit(ProgressionEvent::ExperienceGained { amount });

        if self.state.experience_to_next_level == 0 {
            self.state.experience_to_next_level = self.config.xp_to_next_level(self.state.level);
        }

        while self.state.experience >= self.state.experience_to_next_level {
            self.state.experience -= self.state.experience_to_next_level;
            self.state.level += 1;
            self.state.skill_points += self.config.skill_points_per_level;
            self.state.experience_to_next_level = self.config.xp_to_next_level(self.state.level);

            log::info!("Reached level {}", self.state.level);

            self.events.emit(ProgressionEvent::LevelUp {
                new_level: self.state.level,
            });
            self.events.emit(ProgressionEvent::SkillPointsChanged {
                current: self.state.skill_points,
            });
        }
    }

    /// Relock every skill and refund all points spent on them
    pub fn reset_skills(&mut self) -> u32 {
        let mut refund = 0;
        for skill in self.skills.values_mut().filter(|s| s.is_unlocked()) {
            skill.remove_effects(&mut self.target);
            refund += skill.definition().requirements.required_skill_points;
            for level in 1..skill.current_level() {
                refund += 1 + level / 2;
            }
            skill.restore_level(0);
        }

        self.state.skill_points += refund;
        self.state.unlocked_skill_ids.clear();
        self.state.skill_levels.clear();

        log::info!("Skills reset, {} points refunded", refund);
        self.events.emit(ProgressionEvent::SkillPointsChanged {
            current: self.state.skill_points,
        });
        refund
    }

    // =========================================================================
    // Bonus Aggregation
    // =========================================================================

    /// Sum of the first matching effect of every unlocked skill at its current level
    pub fn get_total_bonus(&self, effect_type: EffectType, is_percentage: bool) -> f32 {
        self.unlocked_skills()
            .map(|skill| skill.bonus(effect_type, is_percentage))
            .sum()
    }

    /// Base damage through the skill bonus pipeline, with a critical roll.
    /// Percentage multipliers compound in sequence.
    pub fn roll_damage(&self, base_damage: i32, is_spell: bool, rng: &mut impl Rng) -> DamageRoll {
        let mut damage = base_damage as f32 + self.get_total_bonus(EffectType::DamageBoost, false);
        damage *= 1.0 + self.get_total_bonus(EffectType::DamageBoost, true) / 100.0;

        if is_spell {
            damage *= 1.0 + self.get_total_bonus(EffectType::SpellPowerBoost, true) / 100.0;
            damage *= 1.0 + self.get_total_bonus(EffectType::ElementalDamage, true) / 100.0;
        }

        let roll: f32 = rng.gen_range(0.0..100.0);
        let is_crit = roll < self.get_total_bonus(EffectType::CriticalChance, true);
        if is_crit {
            damage *= 2.0;
        }

        DamageRoll {
            amount: damage.round() as i32,
            is_crit,
        }
    }

    pub fn calculate_damage_with_bonuses(
        &self,
        base_damage: i32,
        is_spell: bool,
        rng: &mut impl Rng,
    ) -> i32 {
        self.roll_damage(base_damage, is_spell, rng).amount
    }

    pub fn calculate_cooldown_with_reduction(&self, base_cooldown: f32) -> f32 {
        base_cooldown * (1.0 - self.get_total_bonus(EffectType::CooldownReduction, true) / 100.0)
    }

    /// Multiplier on attack rate
    pub fn get_attack_speed_modifier(&self) -> f32 {
        1.0 + self.get_total_bonus(EffectType::AttackSpeedBoost, true) / 100.0
    }

    /// Fraction added to base movement speed
    pub fn get_movement_speed_bonus(&self) -> f32 {
        self.get_total_bonus(EffectType::MovementSpeed, true) / 100.0
    }

    /// Fraction of incoming damage ignored
    pub fn get_damage_reduction(&self) -> f32 {
        self.get_total_bonus(EffectType::DefenseBoost, true) / 100.0
    }

    /// Percent of damage dealt returned as healing
    pub fn get_life_steal_percentage(&self) -> f32 {
        self.get_total_bonus(EffectType::LifeSteal, true)
    }

    /// Multiplier on area-of-effect radius
    pub fn get_aoe_multiplier(&self) -> f32 {
        1.0 + self.get_total_bonus(EffectType::AreaOfEffect, true) / 100.0
    }

    /// Incoming damage after defense; reduction is capped at 100%
    pub fn mitigate_incoming_damage(&self, amount: i32) -> i32 {
        let reduction = self.get_damage_reduction().clamp(0.0, 1.0);
        ((amount as f32) * (1.0 - reduction)).round().max(0.0) as i32
    }

    /// Healing earned from dealing `damage_dealt`
    pub fn life_steal_heal(&self, damage_dealt: i32) -> i32 {
        let heal = damage_dealt.max(0) as f32 * self.get_life_steal_percentage() / 100.0;
        heal.round() as i32
    }

    // =========================================================================
    // Save / Load
    // =========================================================================

    /// Snapshot of the progression for saving
    pub fn get_skill_save_data(&self) -> ProgressionState {
        self.state.clone()
    }

    /// Replace the progression wholesale and restore every skill level from it.
    /// Unknown skill ids in the data are kept but skipped. Levels past a skill's
    /// max are clamped, and the unlocked set is rebuilt from the restored levels.
    pub fn load_skill_data(&mut self, state: ProgressionState) {
        for skill in self.skills.values_mut() {
            if skill.is_unlocked() {
                skill.remove_effects(&mut self.target);
            }
            skill.restore_level(0);
        }

        self.state = state;
        if self.state.experience_to_next_level == 0 {
            self.state.experience_to_next_level = self.config.xp_to_next_level(self.state.level);
        }

        let saved_levels: Vec<(String, u32)> = self
            .state
            .skill_levels
            .iter()
            .map(|(id, &level)| (id.clone(), level))
            .collect();
        for (skill_id, level) in saved_levels {
            let Some(skill) = self.skills.get_mut(&skill_id) else {
                log::warn!("Save data references unknown skill '{}', skipping", skill_id);
                continue;
            };
            skill.restore_level(level);
            if skill.current_level() != level {
                log::warn!(
                    "Saved level {} for '{}' clamped to {}",
                    level,
                    skill_id,
                    skill.current_level()
                );
            }

            if skill.is_unlocked() {
                skill.apply_effects(&mut self.target);
                self.state
                    .skill_levels
                    .insert(skill_id.clone(), skill.current_level());
                self.state.unlocked_skill_ids.insert(skill_id);
            } else {
                self.state.skill_levels.remove(&skill_id);
                self.state.unlocked_skill_ids.remove(&skill_id);
            }
        }

        // Known skills listed as unlocked without a saved level stay locked
        let skills = &self.skills;
        self.state
            .unlocked_skill_ids
            .retain(|id| skills.get(id).map_or(true, Skill::is_unlocked));

        log::info!(
            "Loaded progression: level {}, {} skills unlocked",
            self.state.level,
            self.state.unlocked_skill_ids.len()
        );
    }
}
