//! Speech bubble components and tracking.
use std::collections::HashMap;
use std::time::Duration;

use bevy::prelude::*;

/// A floating line of text pinned above a speaker for a limited time.
#[derive(Component, Debug)]
pub struct SpeechBubble {
    speaker: Entity,
    lifetime: Timer,
}

impl SpeechBubble {
    pub fn new(speaker: Entity, lifetime_seconds: f32) -> Self {
        Self {
            speaker,
            lifetime: Timer::from_seconds(lifetime_seconds, TimerMode::Once),
        }
    }

    pub fn speaker(&self) -> Entity {
        self.speaker
    }

    pub fn tick(&mut self, delta: Duration) {
        self.lifetime.tick(delta);
    }

    pub fn is_finished(&self) -> bool {
        self.lifetime.is_finished()
    }

    /// Fully visible until the final `fade_seconds`, then linear fade to zero.
    pub fn fade_alpha(&self, fade_seconds: f32) -> f32 {
        let remaining = self.lifetime.remaining_secs();
        if remaining < fade_seconds {
            (remaining / fade_seconds).max(0.0)
        } else {
            1.0
        }
    }
}

/// At most one bubble per speaker.
#[derive(Resource, Debug, Default)]
pub struct SpeechBubbleTracker {
    pub by_speaker: HashMap<Entity, Entity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fades_only_in_the_final_window() {
        let mut bubble = SpeechBubble::new(Entity::PLACEHOLDER, 3.0);
        assert_eq!(bubble.fade_alpha(0.5), 1.0);

        bubble.tick(Duration::from_secs_f32(2.75));
        let alpha = bubble.fade_alpha(0.5);
        assert!(alpha > 0.0 && alpha < 1.0);

        bubble.tick(Duration::from_secs_f32(0.5));
        assert!(bubble.is_finished());
        assert_eq!(bubble.fade_alpha(0.5), 0.0);
    }
}
