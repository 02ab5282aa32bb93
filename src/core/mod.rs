pub mod plugin;

pub use plugin::{CorePlugin, SimulationClock};
