//! Player-NPC dialogue: the chat backend connection and the session state
//! machine that gates the rest of the game while a conversation is open.
pub mod errors;
pub mod events;
pub mod plugin;
pub mod session;
pub mod socket;
pub mod types;

pub use plugin::DialoguePlugin;
