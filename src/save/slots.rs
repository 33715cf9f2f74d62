//! Progression save slots
//!
//! Handles saving and loading progression to/from disk.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::progression::{ProgressionState, SkillManager, SkillTarget};

/// Save file version for compatibility checking
const SAVE_VERSION: u32 = 1;

/// Number of save slots
pub const SAVE_SLOTS: u8 = 3;

/// On-disk save file: a version envelope around the progression state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub progression: ProgressionState,
}

/// Brief summary of a save for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSummary {
    pub level: u32,
    pub skill_points: u32,
    pub unlocked_skills: usize,
}

/// Save error types
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("No save slot {0}")]
    InvalidSlot(u8),
}

/// Get the default save directory path
pub fn save_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "visionsforetold", "VisionsForetold") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("saves");
        path
    } else {
        // Fallback to current directory
        PathBuf::from("./saves")
    }
}

/// Save slots rooted at one directory
#[derive(Debug, Clone)]
pub struct SaveStore {
    root: PathBuf,
}

impl Default for SaveStore {
    fn default() -> Self {
        Self::new(save_directory())
    }
}

impl SaveStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the path for a specific save slot
    pub fn slot_path(&self, slot: u8) -> PathBuf {
        self.root.join(format!("save_{}.json", slot))
    }

    /// Check if a save exists in the given slot
    pub fn exists(&self, slot: u8) -> bool {
        slot < SAVE_SLOTS && self.slot_path(slot).exists()
    }

    /// Write a progression snapshot to a slot
    pub fn save(&self, slot: u8, progression: &ProgressionState) -> Result<(), SaveError> {
        check_slot(slot)?;
        fs::create_dir_all(&self.root).map_err(|e| SaveError::IoError(e.to_string()))?;

        let data = SaveData {
            version: SAVE_VERSION,
            progression: progression.clone(),
        };
        let json = serde_json::to_string_pretty(&data)
            .map_err(|e| SaveError::ParseError(e.to_string()))?;
        fs::write(self.slot_path(slot), json).map_err(|e| SaveError::IoError(e.to_string()))?;

        log::info!("Progression saved to slot {}", slot);
        Ok(())
    }

    /// Read a progression snapshot from a slot
    pub fn load(&self, slot: u8) -> Result<ProgressionState, SaveError> {
        let save = self.read(slot)?;
        if save.version != SAVE_VERSION {
            return Err(SaveError::VersionMismatch {
                expected: SAVE_VERSION,
                found: save.version,
            });
        }

        log::info!("Progression loaded from slot {}", slot);
        Ok(save.progression)
    }

    /// Save a skill manager's progression
    pub fn save_manager<T: SkillTarget>(
        &self,
        slot: u8,
        manager: &SkillManager<T>,
    ) -> Result<(), SaveError> {
        self.save(slot, &manager.get_skill_save_data())
    }

    /// Load a slot into a skill manager, replacing its progression
    pub fn load_into<T: SkillTarget>(
        &self,
        slot: u8,
        manager: &mut SkillManager<T>,
    ) -> Result<(), SaveError> {
        let progression = self.load(slot)?;
        manager.load_skill_data(progression);
        Ok(())
    }

    /// Load just the summary from a save file
    pub fn summary(&self, slot: u8) -> Result<SaveSummary, SaveError> {
        let save = self.read(slot)?;
        Ok(SaveSummary {
            level: save.progression.level,
            skill_points: save.progression.skill_points,
            unlocked_skills: save.progression.unlocked_skill_ids.len(),
        })
    }

    /// List all save slots with their summaries
    pub fn list(&self) -> Vec<(u8, Option<SaveSummary>)> {
        (0..SAVE_SLOTS)
            .map(|slot| {
                let summary = if self.exists(slot) {
                    self.summary(slot).ok()
                } else {
                    None
                };
                (slot, summary)
            })
            .collect()
    }

    /// Delete a save slot
    pub fn delete(&self, slot: u8) -> Result<(), SaveError> {
        check_slot(slot)?;
        let path = self.slot_path(slot);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| SaveError::IoError(e.to_string()))?;
            log::info!("Deleted save slot {}", slot);
        }
        Ok(())
    }

    fn read(&self, slot: u8) -> Result<SaveData, SaveError> {
        check_slot(slot)?;
        let data = fs::read_to_string(self.slot_path(slot))
            .map_err(|e| SaveError::IoError(e.to_string()))?;
        serde_json::from_str(&data).map_err(|e| SaveError::ParseError(e.to_string()))
    }
}

fn check_slot(slot: u8) -> Result<(), SaveError> {
    if slot < SAVE_SLOTS {
        Ok(())
    } else {
        Err(SaveError::InvalidSlot(slot))
    }
}
