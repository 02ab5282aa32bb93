//! Proximity-triggered NPC-to-NPC chatter.
//!
//! A repeating timer sweeps all sociable NPC pairs; the first pair that
//! passes every precondition starts the single system-wide conversation.
use bevy::prelude::*;

use crate::{
    core::SimulationClock,
    dialogue::session::DialogueSession,
    npc::{
        components::{Identity, NpcId, Roamer, Sociable},
        config::NpcConfig,
        conversations::ConversationScript,
    },
};

/// A line spoken aloud in the world; the speech-bubble UI renders these.
#[derive(Message, Debug, Clone)]
pub struct NpcSpeech {
    pub speaker: Entity,
    pub speaker_name: String,
    pub text: String,
}

/// Snapshot of one NPC for the pair-selection pass.
#[derive(Debug, Clone)]
pub struct ChatCandidate {
    pub entity: Entity,
    pub id: NpcId,
    pub position: Vec2,
    pub chatting: bool,
    pub cooldown_ready: bool,
}

/// Precondition chain for one unordered pair, checked in order: neither party
/// chatting, both cooldowns elapsed, close enough, and a scripted pair exists.
pub fn chat_pair_allowed(
    a: &ChatCandidate,
    b: &ChatCandidate,
    script: &ConversationScript,
    max_distance: f32,
) -> bool {
    if a.chatting || b.chatting {
        return false;
    }
    if !a.cooldown_ready || !b.cooldown_ready {
        return false;
    }
    if a.position.distance(b.position) > max_distance {
        return false;
    }
    script.has_pair(a.id, b.id)
}

/// First pair (in candidate order) that may start a conversation.
pub fn select_chat_pair<'a>(
    candidates: &'a [ChatCandidate],
    script: &ConversationScript,
    max_distance: f32,
) -> Option<(&'a ChatCandidate, &'a ChatCandidate)> {
    for i in 0..candidates.len() {
        for j in i + 1..candidates.len() {
            if chat_pair_allowed(&candidates[i], &candidates[j], script, max_distance) {
                return Some((&candidates[i], &candidates[j]));
            }
        }
    }
    None
}

/// The single in-flight NPC-NPC conversation, if any.
#[derive(Debug)]
pub struct ActiveConversation {
    pub opener: Entity,
    pub responder: Entity,
    pub responder_name: String,
    pub reply: String,
    reply_delay: Timer,
    release_delay: Timer,
    reply_shown: bool,
}

/// Resource driving the chatter scheduler.
#[derive(Resource, Debug)]
pub struct NpcChatter {
    check_timer: Timer,
    active: Option<ActiveConversation>,
}

impl NpcChatter {
    pub fn new(interval_seconds: f32) -> Self {
        Self {
            check_timer: Timer::from_seconds(interval_seconds, TimerMode::Repeating),
            active: None,
        }
    }

    pub fn conversation_active(&self) -> bool {
        self.active.is_some()
    }
}

impl Default for NpcChatter {
    fn default() -> Self {
        Self::new(6.0)
    }
}

/// Ticks chat cooldowns and, on each scheduler interval, tries to start one
/// conversation. Suppressed entirely while the player is in a dialogue
/// session or another conversation is still running.
#[allow(clippy::type_complexity)]
pub fn run_chat_scheduler(
    clock: Res<SimulationClock>,
    config: Res<NpcConfig>,
    session: Res<DialogueSession>,
    mut chatter: ResMut<NpcChatter>,
    mut script: ResMut<ConversationScript>,
    mut npcs: Query<(Entity, &Identity, &Transform, &mut Sociable, &mut Sprite)>,
    mut speech: MessageWriter<NpcSpeech>,
) {
    let delta = clock.scaled_delta();

    for (_, _, _, mut sociable, _) in npcs.iter_mut() {
        sociable.tick(delta.as_secs_f32());
    }

    if !chatter.check_timer.tick(delta).just_finished() {
        return;
    }
    if session.is_open() || chatter.conversation_active() {
        return;
    }

    let candidates: Vec<ChatCandidate> = npcs
        .iter()
        .map(|(entity, identity, transform, sociable, _)| ChatCandidate {
            entity,
            id: identity.id,
            position: transform.translation.truncate(),
            chatting: sociable.is_chatting(),
            cooldown_ready: sociable.cooldown_ready(),
        })
        .collect();

    let Some((first, second)) = select_chat_pair(&candidates, &script, config.chatter.max_distance)
    else {
        return;
    };

    let Some((opener_id, _, exchange)) = script.take_exchange(first.id, second.id) else {
        // Scripted pair exists but has no lines; treat as a non-match.
        return;
    };

    let (opener, responder) = if first.id == opener_id {
        (first.clone(), second.clone())
    } else {
        (second.clone(), first.clone())
    };

    let mut responder_name = String::new();
    let mut opener_name = String::new();
    for (entity, identity, _, mut sociable, mut sprite) in npcs.iter_mut() {
        let (is_opener, other) = if entity == opener.entity {
            (true, &responder)
        } else if entity == responder.entity {
            (false, &opener)
        } else {
            continue;
        };

        sociable.begin_chat(config.chatter.cooldown_seconds);
        // Face the conversation partner.
        sprite.flip_x = other.position.x < if is_opener {
            opener.position.x
        } else {
            responder.position.x
        };

        if is_opener {
            opener_name = identity.display_name.clone();
        } else {
            responder_name = identity.display_name.clone();
        }
    }

    info!(
        "NPC chatter: {} opens a conversation with {}",
        opener.id, responder.id
    );

    speech.write(NpcSpeech {
        speaker: opener.entity,
        speaker_name: opener_name,
        text: exchange.opener,
    });

    chatter.active = Some(ActiveConversation {
        opener: opener.entity,
        responder: responder.entity,
        responder_name,
        reply: exchange.reply,
        reply_delay: Timer::from_seconds(config.chatter.reply_delay_seconds, TimerMode::Once),
        release_delay: Timer::from_seconds(config.chatter.release_delay_seconds, TimerMode::Once),
        reply_shown: false,
    });
}

/// Advances the active conversation: shows the reply after the fixed delay,
/// then releases both parties after the further release delay.
pub fn advance_active_conversation(
    clock: Res<SimulationClock>,
    mut chatter: ResMut<NpcChatter>,
    mut npcs: Query<&mut Sociable, With<Roamer>>,
    mut speech: MessageWriter<NpcSpeech>,
) {
    let delta = clock.scaled_delta();

    let Some(active) = chatter.active.as_mut() else {
        return;
    };

    if !active.reply_shown {
        if active.reply_delay.tick(delta).just_finished() {
            speech.write(NpcSpeech {
                speaker: active.responder,
                speaker_name: active.responder_name.clone(),
                text: active.reply.clone(),
            });
            active.reply_shown = true;
        }
        return;
    }

    if active.release_delay.tick(delta).just_finished() {
        for entity in [active.opener, active.responder] {
            if let Ok(mut sociable) = npcs.get_mut(entity) {
                sociable.end_chat();
            }
        }
        chatter.active = None;
    }
}
