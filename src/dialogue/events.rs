//! Messages exchanged between the dialogue session and the UI layer.
use bevy::prelude::*;

use crate::npc::components::NpcId;

/// A dialogue session opened with an NPC.
#[derive(Message, Debug, Clone)]
pub struct DialogueOpened {
    pub npc: Entity,
    pub npc_id: NpcId,
    pub npc_name: String,
    /// Input placeholder shown until the player types.
    pub prompt: String,
}

/// The current dialogue session closed.
#[derive(Message, Debug, Clone)]
pub struct DialogueClosed;

/// The player confirmed a line in the dialogue box.
#[derive(Message, Debug, Clone)]
pub struct PlayerLineSubmitted {
    pub text: String,
}

/// A backend reply for the active session.
#[derive(Message, Debug, Clone)]
pub struct NpcReplied {
    pub npc_name: String,
    pub text: String,
}

/// Game state the backend attached to a reply.
#[derive(Message, Debug, Clone)]
pub struct GameEffects {
    pub inventory: Option<Vec<String>>,
    pub missions_completed: Vec<String>,
    pub game_complete: bool,
}

/// Backend NPC memory was reset.
#[derive(Message, Debug, Clone)]
pub struct MemoryReset;
