//! RON data loader
//!
//! Loads game data from external RON files, with fallback to hardcoded defaults.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::combat::{DamageMode, Falloff, ProjectileConfig, StatusApplication, StatusKind};
use crate::progression::{
    builtin_skills, CatalogError, ProgressionConfig, SkillCatalog, SkillDefinition,
};

/// Errors that can occur when loading data files
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    #[error("Invalid skill catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Named projectile presets
pub type ProjectilePresets = BTreeMap<String, ProjectileConfig>;

/// Manages all external game data
#[derive(Debug, Clone)]
pub struct DataManager {
    /// Skill definitions, shared by every skill manager
    pub catalog: Arc<SkillCatalog>,
    /// Leveling tunables
    pub progression: ProgressionConfig,
    /// Projectile presets by name
    pub projectiles: ProjectilePresets,
}

impl Default for DataManager {
    fn default() -> Self {
        Self {
            catalog: Arc::new(builtin_catalog()),
            progression: ProgressionConfig::default(),
            projectiles: default_projectiles(),
        }
    }
}

impl DataManager {
    /// Load from the `assets/data` directory, falling back per file
    pub fn new() -> Self {
        Self::load_from_dir(Path::new("assets/data"))
    }

    /// Load every data file under `base_path`; missing or broken files use defaults
    pub fn load_from_dir(base_path: &Path) -> Self {
        Self {
            catalog: Arc::new(Self::load_skills(base_path)),
            progression: Self::load_progression(base_path),
            projectiles: Self::load_projectiles(base_path),
        }
    }

    pub fn projectile(&self, name: &str) -> Option<&ProjectileConfig> {
        self.projectiles.get(name)
    }

    fn load_skills(base_path: &Path) -> SkillCatalog {
        let path = base_path.join("skills.ron");
        let loaded = read_ron::<Vec<SkillDefinition>>(&path)
            .and_then(|definitions| Ok(SkillCatalog::from_definitions(definitions)?));
        match loaded {
            Ok(catalog) => {
                log::info!("Loaded {} skills from {}", catalog.len(), path.display());
                catalog
            }
            Err(DataLoadError::FileNotFound(_)) => builtin_catalog(),
            Err(e) => {
                log::warn!("{}. Using built-in skills.", e);
                builtin_catalog()
            }
        }
    }

    fn load_progression(base_path: &Path) -> ProgressionConfig {
        let path = base_path.join("progression.ron");
        match read_ron(&path) {
            Ok(config) => config,
            Err(DataLoadError::FileNotFound(_)) => ProgressionConfig::default(),
            Err(e) => {
                log::warn!("{}. Using default progression.", e);
                ProgressionConfig::default()
            }
        }
    }

    fn load_projectiles(base_path: &Path) -> ProjectilePresets {
        let path = base_path.join("projectiles.ron");
        match read_ron(&path) {
            Ok(presets) => presets,
            Err(DataLoadError::FileNotFound(_)) => default_projectiles(),
            Err(e) => {
                log::warn!("{}. Using default projectiles.", e);
                default_projectiles()
            }
        }
    }
}

/// Read and parse one RON file
pub fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;
    ron::from_str(&content).map_err(|e| DataLoadError::ParseError {
        path: path.display().to_string(),
        details: e.to_string(),
    })
}

fn builtin_catalog() -> SkillCatalog {
    SkillCatalog::from_definitions(builtin_skills()).unwrap_or_else(|e| {
        log::error!("Built-in skills are invalid: {}", e);
        SkillCatalog::new()
    })
}

/// Hardcoded projectile presets
pub fn default_projectiles() -> ProjectilePresets {
    let mut presets = ProjectilePresets::new();

    let mut arrow = ProjectileConfig::new(12, DamageMode::SingleTarget, "Enemy");
    arrow.falloff = Some(Falloff {
        distance: 20.0,
        min_multiplier: 0.5,
    });
    arrow.knockback_force = 2.0;
    presets.insert("arrow".to_string(), arrow);

    let mut fireball = ProjectileConfig::new(25, DamageMode::AreaOfEffect { radius: 3.0 }, "Enemy");
    fireball.is_spell = true;
    fireball.knockback_force = 6.0;
    fireball.status = Some(StatusApplication {
        kind: StatusKind::Burn,
        chance: 0.35,
        duration: 4.0,
    });
    presets.insert("fireball".to_string(), fireball);

    let mut lance = ProjectileConfig::new(
        18,
        DamageMode::Piercing {
            max_targets: 4,
            damage_loss_per_pierce: 0.2,
        },
        "Enemy",
    );
    lance.is_spell = true;
    presets.insert("arcane_lance".to_string(), lance);

    presets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_directory_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataManager::load_from_dir(&dir.path().join("nowhere"));
        assert_eq!(data.catalog.len(), builtin_skills().len());
        assert_eq!(data.progression, ProgressionConfig::default());
        assert!(data.projectile("fireball").is_some());
    }

    #[test]
    fn test_progression_config_from_ron() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("progression.ron"),
            "(base_experience: 250, experience_scaling: 1.5, skill_points_per_level: 2)",
        )
        .unwrap();

        let data = DataManager::load_from_dir(dir.path());
        assert_eq!(data.progression.base_experience, 250);
        assert_eq!(data.progression.skill_points_per_level, 2);
        // Omitted fields keep their defaults
        assert_eq!(data.progression.starting_skill_points, 1);
    }

    #[test]
    fn test_skills_from_ron() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("skills.ron"),
            r#"[
                (
                    id: "stone_fist",
                    name: "Stone Fist",
                    description: "Punch harder.",
                    category: Combat,
                    tier: Basic,
                    max_level: 3,
                    requirements: (minimum_level: 1, required_skill_points: 1),
                    effects: [
                        (effect_type: DamageBoost, base_value: 3.0, value_per_level: 1.0, is_percentage: false),
                    ],
                ),
            ]"#,
        )
        .unwrap();

        let data = DataManager::load_from_dir(dir.path());
        assert_eq!(data.catalog.len(), 1);
        assert_eq!(data.catalog.get("stone_fist").unwrap().max_level, 3);
    }

    #[test]
    fn test_invalid_skills_fall_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("skills.ron"), "[ (id: ").unwrap();

        let data = DataManager::load_from_dir(dir.path());
        assert_eq!(data.catalog.len(), builtin_skills().len());
    }

    #[test]
    fn test_read_ron_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_ron::<ProgressionConfig>(&dir.path().join("absent.ron"));
        assert!(matches!(result, Err(DataLoadError::FileNotFound(_))));
    }
}
