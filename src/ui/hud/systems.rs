//! HUD systems: progress overlays, the talk hint, the dragon defeat
//! animation, and the delayed victory banner.
use bevy::prelude::*;

use crate::{
    dialogue::{
        events::{GameEffects, MemoryReset},
        session::DialogueSession,
    },
    npc::components::{Hostile, Identity, NpcId, NpcLabel},
    player::components::PlayerInteractionState,
};

use super::components::{
    mission_display_name, DragonDefeat, HintText, HudState, InventoryText, MissionText,
    VictoryBanner, VictoryCountdown,
};

const HUD_TEXT_COLOR: Color = Color::WHITE;
const HINT_COLOR: Color = Color::srgb(0.85, 0.85, 0.6);
const DEFEATED_LABEL_COLOR: Color = Color::srgb(0.53, 0.53, 0.53);
const VICTORY_DELAY_SECONDS: f32 = 2.0;
const DRAGON_DEFEAT_SECONDS: f32 = 2.0;
const DRAGON_END_SCALE: f32 = 0.3;
const DRAGON_END_ALPHA: f32 = 0.4;
const VICTORY_TITLE: &str = "VICTORY!";
const VICTORY_BODY: &str =
    "All missions complete! The dragon is slain and the village is saved! You are the greatest hero!";

pub fn setup_hud(mut commands: Commands) {
    commands.spawn((
        Text::new("Inventory: (empty)"),
        TextFont {
            font_size: 15.0,
            ..default()
        },
        TextColor(HUD_TEXT_COLOR),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        ZIndex(150),
        InventoryText,
        Name::new("Inventory HUD"),
    ));

    commands.spawn((
        Text::new("Missions:"),
        TextFont {
            font_size: 15.0,
            ..default()
        },
        TextColor(HUD_TEXT_COLOR),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(34.0),
            left: Val::Px(10.0),
            ..default()
        },
        ZIndex(150),
        MissionText,
        Name::new("Mission HUD"),
    ));

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 15.0,
            ..default()
        },
        TextColor(HINT_COLOR),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(8.0),
            left: Val::Px(10.0),
            ..default()
        },
        ZIndex(150),
        HintText,
        Name::new("Hint HUD"),
    ));
}

/// Folds backend game effects into HUD state and kicks off the dragon
/// defeat animation and victory countdown.
pub fn apply_game_effects(
    mut commands: Commands,
    mut effects: MessageReader<GameEffects>,
    mut hud: ResMut<HudState>,
    mut victory: ResMut<VictoryCountdown>,
    dragons: Query<(Entity, &Identity), With<Hostile>>,
) {
    for effect in effects.read() {
        if let Some(inventory) = &effect.inventory {
            hud.inventory = inventory.clone();
        }
        hud.record_missions(&effect.missions_completed);

        let dragon_slain = effect
            .missions_completed
            .iter()
            .any(|mission| mission == "dragon_quest");
        if dragon_slain && !hud.dragon_defeated {
            hud.dragon_defeated = true;
            if let Some((entity, _)) = dragons
                .iter()
                .find(|(_, identity)| identity.id == NpcId::DRAGON)
            {
                commands
                    .entity(entity)
                    .insert(DragonDefeat::new(DRAGON_DEFEAT_SECONDS));
            }
            info!("The dragon has been defeated");
        }

        if effect.game_complete && !hud.game_complete {
            hud.game_complete = true;
            victory.timer = Some(Timer::from_seconds(VICTORY_DELAY_SECONDS, TimerMode::Once));
        }
    }
}

/// F5 reset wipes the local progress displays.
pub fn handle_memory_reset(mut resets: MessageReader<MemoryReset>, mut hud: ResMut<HudState>) {
    for _ in resets.read() {
        hud.clear();
    }
}

/// Rewrites the progress overlays whenever HUD state changes.
#[allow(clippy::type_complexity)]
pub fn update_hud_texts(
    hud: Res<HudState>,
    mut inventory_text: Query<&mut Text, (With<InventoryText>, Without<MissionText>)>,
    mut mission_text: Query<&mut Text, (With<MissionText>, Without<InventoryText>)>,
) {
    if !hud.is_changed() {
        return;
    }

    if let Ok(mut text) = inventory_text.single_mut() {
        let items = if hud.inventory.is_empty() {
            "(empty)".to_string()
        } else {
            hud.inventory.join(", ")
        };
        text.0 = format!("Inventory: {}", items);
    }

    if let Ok(mut text) = mission_text.single_mut() {
        let mut tracker = String::from("Missions:");
        for mission in &hud.missions {
            tracker.push_str("\n [x] ");
            tracker.push_str(mission_display_name(mission));
        }
        text.0 = tracker;
    }
}

/// Shows the context-sensitive key hint under the viewport.
pub fn update_hint_text(
    session: Res<DialogueSession>,
    interaction: Res<PlayerInteractionState>,
    mut hints: Query<&mut Text, With<HintText>>,
) {
    let Ok(mut text) = hints.single_mut() else {
        return;
    };

    text.0 = if session.is_open() {
        "ENTER to send, ESC to close".to_string()
    } else if let Some(nearby) = &interaction.nearby_npc {
        format!("Press SPACE to talk to {}", nearby.name)
    } else {
        String::new()
    };
}

/// Shrinks and fades the dragon over the defeat window, then grays out its
/// label.
pub fn animate_dragon_defeat(
    time: Res<Time>,
    mut dragons: Query<(&mut DragonDefeat, &mut Transform, &mut Sprite, &Children)>,
    mut labels: Query<(&mut Text2d, &mut TextColor), With<NpcLabel>>,
) {
    for (mut defeat, mut transform, mut sprite, children) in dragons.iter_mut() {
        if defeat.timer.is_finished() {
            continue;
        }
        defeat.timer.tick(time.delta());

        let t = defeat.timer.fraction();
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        let scale = 1.3 + (DRAGON_END_SCALE - 1.3) * eased;
        transform.scale = Vec3::splat(scale);
        let alpha = 1.0 + (DRAGON_END_ALPHA - 1.0) * eased;
        sprite.color = sprite.color.with_alpha(alpha);

        if defeat.timer.just_finished() {
            for child in children.iter() {
                if let Ok((mut label, mut color)) = labels.get_mut(child) {
                    label.0 = "Ignis (Defeated)".to_string();
                    color.0 = DEFEATED_LABEL_COLOR;
                }
            }
        }
    }
}

/// Spawns the banner once the countdown runs out.
pub fn tick_victory_banner(
    mut commands: Commands,
    time: Res<Time>,
    mut victory: ResMut<VictoryCountdown>,
    banners: Query<(), With<VictoryBanner>>,
) {
    let Some(timer) = victory.timer.as_mut() else {
        return;
    };
    if !timer.tick(time.delta()).just_finished() || !banners.is_empty() {
        return;
    }
    victory.timer = None;

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Percent(30.0),
                left: Val::Percent(20.0),
                right: Val::Percent(20.0),
                padding: UiRect::all(Val::Px(24.0)),
                border: UiRect::all(Val::Px(3.0)),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                row_gap: Val::Px(12.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.1, 0.08, 0.02, 0.95)),
            BorderColor::from(Color::srgb(1.0, 0.85, 0.3)),
            ZIndex(300),
            VictoryBanner,
            Name::new("Victory Banner"),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(VICTORY_TITLE),
                TextFont {
                    font_size: 34.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.9, 0.4)),
            ));
            parent.spawn((
                Text::new(VICTORY_BODY),
                TextFont {
                    font_size: 17.0,
                    ..default()
                },
                TextColor(HUD_TEXT_COLOR),
            ));
        });
}
