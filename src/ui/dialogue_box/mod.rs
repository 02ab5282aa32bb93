//! Modal dialogue box for talking to NPCs.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::DialogueBoxPlugin;
