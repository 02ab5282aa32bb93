//! Player avatar: movement, camera follow, and nearby-NPC detection.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::PlayerPlugin;
