//! Data loading and external game content
//!
//! This module handles loading game data from external RON files,
//! allowing for data-driven content and easy modding.

pub mod loader;

pub use loader::{default_projectiles, read_ron, DataLoadError, DataManager, ProjectilePresets};
