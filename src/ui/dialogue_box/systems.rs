//! Dialogue box lifecycle and keyboard-captured text entry.
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;

use crate::dialogue::{
    events::{DialogueClosed, DialogueOpened, NpcReplied, PlayerLineSubmitted},
    session::DialogueSession,
};

use super::components::{
    DialogueBoxBody, DialogueBoxInputLine, DialogueBoxRoot, DialogueBoxTracker, DialogueInput,
};

const BACKGROUND_COLOR: Color = Color::srgba(0.08, 0.08, 0.1, 0.92);
const BORDER_COLOR: Color = Color::srgb(0.3, 0.3, 0.32);
const NAME_COLOR: Color = Color::srgb(1.0, 0.9, 0.4);
const TEXT_COLOR: Color = Color::WHITE;
const PROMPT_COLOR: Color = Color::srgb(0.55, 0.55, 0.6);
const LOADING_ELLIPSIS: &str = "...";
const MAX_LINE_CHARS: usize = 200;

/// Spawns the panel when a session opens, replacing any stale one.
pub fn open_dialogue_box(
    mut commands: Commands,
    mut tracker: ResMut<DialogueBoxTracker>,
    mut input: ResMut<DialogueInput>,
    mut opened: MessageReader<DialogueOpened>,
) {
    for event in opened.read() {
        if let Some(old) = tracker.root.take() {
            commands.entity(old).despawn();
        }
        input.reset(event.prompt.clone());

        let root = commands
            .spawn((
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(24.0),
                    left: Val::Percent(12.0),
                    right: Val::Percent(12.0),
                    padding: UiRect::all(Val::Px(14.0)),
                    border: UiRect::all(Val::Px(2.0)),
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(8.0),
                    ..default()
                },
                BackgroundColor(BACKGROUND_COLOR),
                BorderColor::from(BORDER_COLOR),
                ZIndex(200),
                DialogueBoxRoot,
                Name::new("Dialogue Box"),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text::new(event.npc_name.clone()),
                    TextFont {
                        font_size: 18.0,
                        ..default()
                    },
                    TextColor(NAME_COLOR),
                ));
                parent.spawn((
                    Text::new(""),
                    TextFont {
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(TEXT_COLOR),
                    DialogueBoxBody,
                ));
                parent.spawn((
                    Text::new(event.prompt.clone()),
                    TextFont {
                        font_size: 15.0,
                        ..default()
                    },
                    TextColor(PROMPT_COLOR),
                    DialogueBoxInputLine,
                ));
            })
            .id();
        tracker.root = Some(root);
    }
}

/// Tears the panel down when the session closes.
pub fn close_dialogue_box(
    mut commands: Commands,
    mut tracker: ResMut<DialogueBoxTracker>,
    mut input: ResMut<DialogueInput>,
    mut closed: MessageReader<DialogueClosed>,
) {
    for _ in closed.read() {
        if let Some(root) = tracker.root.take() {
            commands.entity(root).despawn();
        }
        input.buffer.clear();
    }
}

/// Routes raw key presses into the input buffer while the session accepts
/// input. Enter submits the line; everything typed mid-load is ignored.
pub fn capture_text_input(
    session: Res<DialogueSession>,
    mut keys: MessageReader<KeyboardInput>,
    mut input: ResMut<DialogueInput>,
    mut submitted: MessageWriter<PlayerLineSubmitted>,
) {
    if !session.is_open() || session.is_loading() {
        keys.clear();
        return;
    }

    for key in keys.read() {
        if key.state != ButtonState::Pressed {
            continue;
        }
        match &key.logical_key {
            Key::Enter => {
                let text = input.buffer.trim().to_string();
                if !text.is_empty() {
                    submitted.write(PlayerLineSubmitted { text });
                }
                input.buffer.clear();
            }
            Key::Backspace => {
                input.buffer.pop();
            }
            Key::Space => {
                // The Space that opened the panel also lands here.
                if !input.buffer.is_empty() && input.buffer.len() < MAX_LINE_CHARS {
                    input.buffer.push(' ');
                }
            }
            Key::Character(text) => {
                for ch in text.chars().filter(|ch| !ch.is_control()) {
                    if input.buffer.len() < MAX_LINE_CHARS {
                        input.buffer.push(ch);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Keeps the body and input line in sync with the session.
#[allow(clippy::type_complexity)]
pub fn sync_dialogue_box_text(
    session: Res<DialogueSession>,
    input: Res<DialogueInput>,
    mut replies: MessageReader<NpcReplied>,
    mut body: Query<&mut Text, (With<DialogueBoxBody>, Without<DialogueBoxInputLine>)>,
    mut input_line: Query<
        (&mut Text, &mut TextColor),
        (With<DialogueBoxInputLine>, Without<DialogueBoxBody>),
    >,
) {
    if let Ok(mut text) = body.single_mut() {
        if let Some(reply) = replies.read().last() {
            text.0 = reply.text.clone();
        } else if session.is_loading() {
            text.0 = LOADING_ELLIPSIS.to_string();
        }
    }

    if let Ok((mut text, mut color)) = input_line.single_mut() {
        if input.buffer.is_empty() {
            text.0 = input.prompt.clone();
            color.0 = PROMPT_COLOR;
        } else {
            text.0 = format!("> {}_", input.buffer);
            color.0 = TEXT_COLOR;
        }
    }
}
