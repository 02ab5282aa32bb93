//! Dialogue session state machine.
//!
//! `DialogueSession` is the single authority on whether a conversation is
//! open. Player movement and the NPC chatter scheduler both consult it
//! instead of tracking their own flags, and a reply is only accepted while
//! the session is still waiting on that exact request id, so a reply that
//! lands after ESC is discarded rather than resurrecting a closed panel.
use bevy::log::{debug, info, warn};
use bevy::prelude::*;

use crate::{
    dialogue::{
        events::{
            DialogueClosed, DialogueOpened, GameEffects, MemoryReset, NpcReplied,
            PlayerLineSubmitted,
        },
        socket::ChatSocket,
        types::ChatRequestId,
    },
    npc::components::{Hostile, NpcId},
    player::components::PlayerInteractionState,
};

/// Line shown when the backend fails or returns nothing.
pub const FALLBACK_REPLY: &str = "*seems lost in thought...*";

const DRAGON_PROMPT: &str = "the dragon glares at you... type your challenge!";
const DEFAULT_PROMPT: &str = "Say something...";

/// Where the active session is in its request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// The input line is live.
    AwaitingInput,
    /// A line is at the backend; input is locked until the reply lands.
    Loading { request: ChatRequestId },
}

#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub npc: Entity,
    pub npc_id: NpcId,
    pub npc_name: String,
    pub phase: SessionPhase,
}

/// Resource holding the (at most one) open conversation with the player.
#[derive(Resource, Debug, Default)]
pub struct DialogueSession {
    active: Option<ActiveSession>,
    next_request: u64,
}

impl DialogueSession {
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self.active,
            Some(ActiveSession {
                phase: SessionPhase::Loading { .. },
                ..
            })
        )
    }

    pub fn open(&mut self, npc: Entity, npc_id: NpcId, npc_name: String) {
        self.active = Some(ActiveSession {
            npc,
            npc_id,
            npc_name,
            phase: SessionPhase::AwaitingInput,
        });
    }

    /// Closing drops the pending request id too, so a late reply can never
    /// match again.
    pub fn close(&mut self) {
        self.active = None;
    }

    /// Allocates a request id and locks input. Returns `None` if no session
    /// is open or one is already in flight.
    pub fn begin_request(&mut self) -> Option<ChatRequestId> {
        let session = self.active.as_mut()?;
        if !matches!(session.phase, SessionPhase::AwaitingInput) {
            return None;
        }
        self.next_request += 1;
        let request = ChatRequestId::new(self.next_request);
        session.phase = SessionPhase::Loading { request };
        Some(request)
    }

    /// Whether a reply tagged with `id` answers the in-flight request.
    pub fn accepts(&self, id: ChatRequestId) -> bool {
        matches!(
            self.active,
            Some(ActiveSession {
                phase: SessionPhase::Loading { request },
                ..
            }) if request == id
        )
    }

    pub fn finish_request(&mut self) {
        if let Some(session) = self.active.as_mut() {
            session.phase = SessionPhase::AwaitingInput;
        }
    }
}

/// Opens a session on Space (near an NPC) and closes it on ESC.
pub fn handle_session_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    interaction: Res<PlayerInteractionState>,
    hostiles: Query<(), With<Hostile>>,
    mut session: ResMut<DialogueSession>,
    mut opened: MessageWriter<DialogueOpened>,
    mut closed: MessageWriter<DialogueClosed>,
) {
    // ESC closes unconditionally, even mid-load.
    if keyboard.just_pressed(KeyCode::Escape) && session.is_open() {
        session.close();
        closed.write(DialogueClosed);
        return;
    }

    if !keyboard.just_pressed(KeyCode::Space) || session.is_open() {
        return;
    }
    let Some(nearby) = interaction.nearby_npc.as_ref() else {
        return;
    };

    let prompt = if hostiles.get(nearby.entity).is_ok() {
        DRAGON_PROMPT
    } else {
        DEFAULT_PROMPT
    };

    session.open(nearby.entity, nearby.npc_id, nearby.name.clone());
    info!("Dialogue opened with {}", nearby.name);
    opened.write(DialogueOpened {
        npc: nearby.entity,
        npc_id: nearby.npc_id,
        npc_name: nearby.name.clone(),
        prompt: prompt.to_string(),
    });
}

/// Forwards confirmed player lines to the backend.
pub fn submit_player_lines(
    mut lines: MessageReader<PlayerLineSubmitted>,
    mut session: ResMut<DialogueSession>,
    socket: Res<ChatSocket>,
) {
    for line in lines.read() {
        let text = line.text.trim();
        if text.is_empty() {
            continue;
        }
        let Some(npc_id) = session.active().map(|s| s.npc_id) else {
            continue;
        };
        let Some(request) = session.begin_request() else {
            debug!("Line dropped; a request is already in flight");
            continue;
        };
        socket.send_chat(request, npc_id.as_str(), text.to_string());
    }
}

/// Delivers backend replies to the UI, discarding any that no longer match
/// the in-flight request.
pub fn poll_chat_replies(
    socket: Res<ChatSocket>,
    mut session: ResMut<DialogueSession>,
    mut replies: MessageWriter<NpcReplied>,
    mut effects: MessageWriter<GameEffects>,
) {
    while let Some((request_id, result)) = socket.try_recv() {
        if !session.accepts(request_id) {
            debug!("Discarding stale reply for request #{}", request_id.value());
            continue;
        }
        session.finish_request();
        let npc_name = session
            .active()
            .map(|s| s.npc_name.clone())
            .unwrap_or_default();

        match result {
            Ok(reply) => {
                let text = if reply.text.trim().is_empty() {
                    FALLBACK_REPLY.to_string()
                } else {
                    reply.text
                };
                replies.write(NpcReplied { npc_name, text });

                if reply.inventory.is_some()
                    || !reply.missions_completed.is_empty()
                    || reply.game_complete
                {
                    effects.write(GameEffects {
                        inventory: reply.inventory,
                        missions_completed: reply.missions_completed,
                        game_complete: reply.game_complete,
                    });
                }
            }
            Err(err) => {
                warn!("Chat request #{} failed: {}", request_id.value(), err);
                replies.write(NpcReplied {
                    npc_name,
                    text: FALLBACK_REPLY.to_string(),
                });
            }
        }
    }
}

/// F5 asks the backend to wipe NPC memory. Local progress stays until the
/// backend acknowledges, so a failed reset leaves the HUD intact.
pub fn handle_reset_key(keyboard: Res<ButtonInput<KeyCode>>, socket: Res<ChatSocket>) {
    if keyboard.just_pressed(KeyCode::F5) {
        socket.request_reset();
    }
}

/// Broadcasts [`MemoryReset`] once the backend confirms the wipe.
pub fn poll_reset_acks(socket: Res<ChatSocket>, mut reset: MessageWriter<MemoryReset>) {
    while socket.try_recv_reset_ack() {
        info!("NPC memory reset confirmed");
        reset.write(MemoryReset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_session() -> DialogueSession {
        let mut session = DialogueSession::default();
        session.open(Entity::PLACEHOLDER, NpcId::WIZARD, "Zephyr the Wise".into());
        session
    }

    #[test]
    fn request_ids_are_monotonic_across_sessions() {
        let mut session = open_session();
        let first = session.begin_request().unwrap();
        session.finish_request();
        let second = session.begin_request().unwrap();
        assert!(second > first);

        session.close();
        session.open(Entity::PLACEHOLDER, NpcId::GUARD, "Captain Aldric".into());
        let third = session.begin_request().unwrap();
        assert!(third > second);
    }

    #[test]
    fn only_one_request_in_flight() {
        let mut session = open_session();
        assert!(session.begin_request().is_some());
        assert!(session.begin_request().is_none());
        session.finish_request();
        assert!(session.begin_request().is_some());
    }

    #[test]
    fn closing_discards_the_pending_request() {
        let mut session = open_session();
        let request = session.begin_request().unwrap();
        assert!(session.accepts(request));

        session.close();
        assert!(!session.is_open());
        assert!(!session.accepts(request));

        // Reopening must not resurrect the old id either.
        session.open(Entity::PLACEHOLDER, NpcId::WIZARD, "Zephyr the Wise".into());
        assert!(!session.accepts(request));
    }

    #[test]
    fn begin_request_requires_an_open_session() {
        let mut session = DialogueSession::default();
        assert!(session.begin_request().is_none());
    }
}
