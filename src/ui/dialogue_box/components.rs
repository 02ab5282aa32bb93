//! Dialogue box components and input buffer.
use bevy::prelude::*;

/// Root node of the dialogue box panel.
#[derive(Component, Debug)]
pub struct DialogueBoxRoot;

/// Text entity showing the NPC's latest reply (or the loading ellipsis).
#[derive(Component, Debug)]
pub struct DialogueBoxBody;

/// Text entity showing the player's in-progress line.
#[derive(Component, Debug)]
pub struct DialogueBoxInputLine;

/// The currently spawned panel, if any.
#[derive(Resource, Debug, Default)]
pub struct DialogueBoxTracker {
    pub root: Option<Entity>,
}

/// The line being typed plus the placeholder shown while it is empty.
#[derive(Resource, Debug, Default)]
pub struct DialogueInput {
    pub buffer: String,
    pub prompt: String,
}

impl DialogueInput {
    pub fn reset(&mut self, prompt: String) {
        self.buffer.clear();
        self.prompt = prompt;
    }
}
