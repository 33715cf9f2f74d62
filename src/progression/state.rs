//! Per-player progression save data
//!
//! The field names serialize in camelCase; the save UI and other tooling
//! read this exact shape.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Mutable progression of one player: level, XP, skill points and skill levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionState {
    pub skill_points: u32,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next_level: u32,
    pub unlocked_skill_ids: BTreeSet<String>,
    pub skill_levels: BTreeMap<String, u32>,
}

impl ProgressionState {
    /// Fresh state for a new game
    pub fn new(skill_points: u32, experience_to_next_level: u32) -> Self {
        Self {
            skill_points,
            level: 1,
            experience: 0,
            experience_to_next_level: experience_to_next_level.max(1),
            unlocked_skill_ids: BTreeSet::new(),
            skill_levels: BTreeMap::new(),
        }
    }

    pub fn is_unlocked(&self, skill_id: &str) -> bool {
        self.unlocked_skill_ids.contains(skill_id)
    }

    /// Persisted level of a skill (0 if never unlocked)
    pub fn skill_level(&self, skill_id: &str) -> u32 {
        self.skill_levels.get(skill_id).copied().unwrap_or(0)
    }

    /// Progress toward the next level in [0, 1]
    pub fn level_progress(&self) -> f32 {
        if self.experience_to_next_level == 0 {
            return 0.0;
        }
        (self.experience as f32 / self.experience_to_next_level as f32).min(1.0)
    }
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::new(0, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_field_names() {
        let mut state = ProgressionState::new(3, 100);
        state.unlocked_skill_ids.insert("power_strike".to_string());
        state.skill_levels.insert("power_strike".to_string(), 2);

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["skillPoints"], 3);
        assert_eq!(json["level"], 1);
        assert_eq!(json["experience"], 0);
        assert_eq!(json["experienceToNextLevel"], 100);
        assert_eq!(json["unlockedSkillIds"][0], "power_strike");
        assert_eq!(json["skillLevels"]["power_strike"], 2);
    }

    #[test]
    fn test_reads_flat_save_struct() {
        let json = r#"{
            "skillPoints": 4,
            "level": 7,
            "experience": 55,
            "experienceToNextLevel": 298,
            "unlockedSkillIds": ["vitality", "iron_skin"],
            "skillLevels": { "vitality": 3, "iron_skin": 1 }
        }"#;
        let state: ProgressionState = serde_json::from_str(json).unwrap();
        assert_eq!(state.level, 7);
        assert!(state.is_unlocked("iron_skin"));
        assert_eq!(state.skill_level("vitality"), 3);
        assert_eq!(state.skill_level("missing"), 0);
    }

    #[test]
    fn test_level_progress() {
        let mut state = ProgressionState::new(0, 200);
        state.experience = 50;
        assert_eq!(state.level_progress(), 0.25);
    }
}
