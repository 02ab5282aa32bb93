pub mod components;
pub mod map;
pub mod plugin;
pub mod systems;

pub use plugin::WorldPlugin;
