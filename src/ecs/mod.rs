//! Entity Component System module
//!
//! Components for the entities projectiles resolve against.

pub mod components;

pub use components::*;
