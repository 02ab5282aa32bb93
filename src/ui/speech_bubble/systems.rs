//! Spawning and updating speech bubbles for NPC chatter.
use bevy::prelude::*;

use crate::{
    core::SimulationClock,
    npc::{chatter::NpcSpeech, config::NpcConfig},
};

use super::components::{SpeechBubble, SpeechBubbleTracker};

const TEXT_COLOR: Color = Color::WHITE;
const BUBBLE_OFFSET_Y: f32 = 58.0;
const BUBBLE_DEPTH: f32 = 50.0;
const FADE_SECONDS: f32 = 0.8;
const FONT_SIZE: f32 = 14.0;

/// Spawns a bubble for each `NpcSpeech`, replacing any bubble the speaker
/// already has.
pub fn spawn_speech_bubbles(
    mut commands: Commands,
    mut tracker: ResMut<SpeechBubbleTracker>,
    config: Res<NpcConfig>,
    mut speech: MessageReader<NpcSpeech>,
    transforms: Query<&Transform>,
) {
    for line in speech.read() {
        let Ok(speaker_transform) = transforms.get(line.speaker) else {
            warn!("Speech from despawned entity dropped ({})", line.speaker_name);
            continue;
        };

        if let Some(old) = tracker.by_speaker.remove(&line.speaker) {
            commands.entity(old).despawn();
        }

        let position = speaker_transform.translation.truncate() + Vec2::new(0.0, BUBBLE_OFFSET_Y);
        let bubble = commands
            .spawn((
                Text2d::new(line.text.clone()),
                TextFont {
                    font_size: FONT_SIZE,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                Transform::from_translation(position.extend(BUBBLE_DEPTH)),
                SpeechBubble::new(line.speaker, config.chatter.bubble_seconds),
                Name::new(format!("Bubble: {}", line.speaker_name)),
            ))
            .id();
        tracker.by_speaker.insert(line.speaker, bubble);
    }
}

/// Follows the speaker, fades near end of life, despawns when expired or the
/// speaker is gone.
pub fn update_speech_bubbles(
    mut commands: Commands,
    clock: Res<SimulationClock>,
    mut tracker: ResMut<SpeechBubbleTracker>,
    speakers: Query<&Transform, Without<SpeechBubble>>,
    mut bubbles: Query<(Entity, &mut SpeechBubble, &mut Transform, &mut TextColor)>,
) {
    let delta = clock.scaled_delta();

    for (entity, mut bubble, mut transform, mut color) in bubbles.iter_mut() {
        bubble.tick(delta);

        let speaker = speakers.get(bubble.speaker());
        if bubble.is_finished() || speaker.is_err() {
            tracker.by_speaker.remove(&bubble.speaker());
            commands.entity(entity).despawn();
            continue;
        }

        if let Ok(speaker_transform) = speaker {
            transform.translation.x = speaker_transform.translation.x;
            transform.translation.y = speaker_transform.translation.y + BUBBLE_OFFSET_Y;
        }

        color.0 = TEXT_COLOR.with_alpha(bubble.fade_alpha(FADE_SECONDS));
    }
}
