//! World-space speech bubbles above chatting NPCs.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::SpeechBubblePlugin;
