//! Screen-space UI: the modal dialogue box, the HUD overlays, and the
//! world-space speech bubbles for NPC chatter.
pub mod dialogue_box;
pub mod hud;
pub mod speech_bubble;

use bevy::prelude::*;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            dialogue_box::DialogueBoxPlugin,
            hud::HudPlugin,
            speech_bubble::SpeechBubblePlugin,
        ));
    }
}
