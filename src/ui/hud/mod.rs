//! HUD overlays: inventory line, mission tracker, interaction hint, and the
//! victory banner.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::HudPlugin;
