//! Wire types exchanged with the chat backend.
use serde::{Deserialize, Serialize};

/// Monotonic id correlating a sent chat line with its backend reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChatRequestId(u64);

impl ChatRequestId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Outbound chat frame.
#[derive(Debug, Clone, Serialize)]
pub struct ChatPayload {
    pub npc_id: String,
    pub message: String,
}

/// One inbound frame. The backend interleaves progress frames before the
/// terminal one; a frame is terminal exactly when `response` is present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireFrame {
    #[serde(default)]
    pub streaming: Option<bool>,
    #[serde(default)]
    pub chunk: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub inventory: Option<Vec<String>>,
    #[serde(default)]
    pub missions_completed: Option<Vec<String>>,
    #[serde(default)]
    pub game_actions: Option<GameActions>,
}

impl WireFrame {
    pub fn is_terminal(&self) -> bool {
        self.response.is_some()
    }
}

/// Side effects the backend attaches to a terminal frame.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameActions {
    #[serde(default)]
    pub missions_completed: Vec<String>,
    #[serde(default)]
    pub game_complete: bool,
}

/// A completed backend reply, assembled from the terminal frame.
#[derive(Debug, Clone, Default)]
pub struct NpcReply {
    pub text: String,
    pub inventory: Option<Vec<String>>,
    pub missions_completed: Vec<String>,
    pub game_complete: bool,
}

impl NpcReply {
    /// Folds the two places mission completions can appear into one list,
    /// keeping first-seen order without duplicates.
    pub fn from_terminal_frame(frame: WireFrame) -> Self {
        let mut missions: Vec<String> = frame.missions_completed.unwrap_or_default();
        let mut game_complete = false;
        if let Some(actions) = frame.game_actions {
            for mission in actions.missions_completed {
                if !missions.contains(&mission) {
                    missions.push(mission);
                }
            }
            game_complete = actions.game_complete;
        }

        Self {
            text: frame.response.unwrap_or_default(),
            inventory: frame.inventory,
            missions_completed: missions,
            game_complete,
        }
    }
}
