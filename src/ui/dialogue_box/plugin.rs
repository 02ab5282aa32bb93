use bevy::prelude::*;

use super::{
    components::{DialogueBoxTracker, DialogueInput},
    systems::{capture_text_input, close_dialogue_box, open_dialogue_box, sync_dialogue_box_text},
};

pub struct DialogueBoxPlugin;

impl Plugin for DialogueBoxPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogueBoxTracker>()
            .init_resource::<DialogueInput>()
            .add_systems(
                Update,
                (
                    open_dialogue_box,
                    close_dialogue_box,
                    capture_text_input,
                    sync_dialogue_box_text.after(capture_text_input),
                ),
            );
    }
}
