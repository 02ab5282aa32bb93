use bevy::prelude::*;

use super::{
    components::SpeechBubbleTracker,
    systems::{spawn_speech_bubbles, update_speech_bubbles},
};

pub struct SpeechBubblePlugin;

impl Plugin for SpeechBubblePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpeechBubbleTracker>().add_systems(
            Update,
            (spawn_speech_bubbles, update_speech_bubbles.after(spawn_speech_bubbles)),
        );
    }
}
