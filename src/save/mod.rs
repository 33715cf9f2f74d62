//! Save/load system
//!
//! Persists progression to numbered JSON save slots.

pub mod slots;

pub use slots::{save_directory, SaveData, SaveError, SaveStore, SaveSummary, SAVE_SLOTS};
