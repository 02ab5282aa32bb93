//! NPC module: identities, roam state machine, and the scripted chatter layer.
pub mod chatter;
pub mod components;
pub mod config;
pub mod conversations;
pub mod plugin;
pub mod systems;

pub use plugin::NpcPlugin;
