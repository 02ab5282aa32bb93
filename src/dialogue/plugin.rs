use bevy::prelude::*;

use crate::dialogue::{
    events::{
        DialogueClosed, DialogueOpened, GameEffects, MemoryReset, NpcReplied, PlayerLineSubmitted,
    },
    session::{
        handle_reset_key, handle_session_keys, poll_chat_replies, poll_reset_acks,
        submit_player_lines, DialogueSession,
    },
    socket::ChatSocket,
};

/// Chat backend connection plus the player dialogue session.
pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ChatSocket::spawn())
            .init_resource::<DialogueSession>()
            .add_message::<DialogueOpened>()
            .add_message::<DialogueClosed>()
            .add_message::<PlayerLineSubmitted>()
            .add_message::<NpcReplied>()
            .add_message::<GameEffects>()
            .add_message::<MemoryReset>()
            .add_systems(
                Update,
                (
                    handle_session_keys,
                    submit_player_lines.after(handle_session_keys),
                    poll_chat_replies.after(submit_player_lines),
                    handle_reset_key,
                    poll_reset_acks.after(handle_reset_key),
                ),
            );
    }
}
