//! Emberhollow: a 2D village exploration game where NPC dialogue is served by a
//! remote chat backend over a WebSocket.
//!
//! The crate is organised as one Bevy plugin per concern; `tests/headless.rs`
//! drives the same plugins without a window.

pub mod core;
pub mod dialogue;
pub mod npc;
pub mod player;
pub mod ui;
pub mod world;

pub use crate::core::CorePlugin;
pub use dialogue::DialoguePlugin;
pub use npc::NpcPlugin;
pub use player::PlayerPlugin;
pub use ui::UiPlugin;
pub use world::WorldPlugin;
