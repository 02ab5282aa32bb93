//! NPC spawning and the roam state machine.
use bevy::prelude::*;
use rand::Rng;

use crate::{
    core::SimulationClock,
    npc::{
        components::{Home, Hostile, Identity, NpcId, NpcLabel, Roamer, RoamState, Sociable},
        config::NpcConfig,
    },
    world::map::CollisionMap,
};

const NPC_SPRITE_SIZE: f32 = 44.0;
const NPC_DEPTH: f32 = 20.0;
const LABEL_OFFSET_Y: f32 = 38.0;

/// Outcome of one roam decision draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoamChoice {
    Walk(Vec2),
    Pause,
}

/// Maps a uniform draw over `0..6` to a roam action: four walk outcomes
/// (one per cardinal direction) and two pauses.
pub fn roam_choice(roll: u32) -> RoamChoice {
    match roll {
        0 => RoamChoice::Walk(Vec2::Y),
        1 => RoamChoice::Walk(Vec2::NEG_Y),
        2 => RoamChoice::Walk(Vec2::NEG_X),
        3 => RoamChoice::Walk(Vec2::X),
        _ => RoamChoice::Pause,
    }
}

/// Spawns the village roster plus the dragon at the map's upper edge.
pub fn spawn_village_npcs(mut commands: Commands, collisions: Res<CollisionMap>) {
    let roster = [
        (NpcId::WIZARD, "Zephyr the Wise", Color::srgb_u8(120, 90, 200), (6, 10)),
        (
            NpcId::BLACKSMITH,
            "Brunhild the Strong",
            Color::srgb_u8(180, 110, 60),
            (20, 10),
        ),
        (
            NpcId::HERBALIST,
            "Elara the Herbalist",
            Color::srgb_u8(90, 180, 110),
            (10, 13),
        ),
        (NpcId::GUARD, "Captain Aldric", Color::srgb_u8(150, 150, 170), (16, 13)),
    ];

    for (id, name, color, (tx, ty)) in roster {
        let position = collisions.tile_to_world(tx, ty);
        commands
            .spawn((
                Sprite::from_color(color, Vec2::splat(NPC_SPRITE_SIZE)),
                Transform::from_translation(position.extend(NPC_DEPTH)),
                Identity::new(id, name),
                Home { position },
                Roamer::idle_for(1.0),
                Sociable::ready(),
                Name::new(format!("{} ({})", name, id)),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text2d::new(name),
                    TextFont {
                        font_size: 12.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    Transform::from_xyz(0.0, LABEL_OFFSET_Y, 1.0),
                    NpcLabel,
                ));
            });
    }

    // Dragon: hostile, stationary, excluded from chatter (no Sociable/Roamer).
    let dragon_pos = collisions.tile_to_world(25, 3);
    commands
        .spawn((
            Sprite::from_color(Color::srgb_u8(190, 40, 40), Vec2::splat(NPC_SPRITE_SIZE)),
            Transform::from_translation(dragon_pos.extend(NPC_DEPTH)).with_scale(Vec3::splat(1.3)),
            Identity::new(NpcId::DRAGON, "Ignis the Dread"),
            Hostile,
            Name::new("Ignis the Dread (dragon)"),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text2d::new("Ignis the Dread"),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::srgb_u8(255, 68, 68)),
                Transform::from_xyz(0.0, LABEL_OFFSET_Y, 1.0),
                NpcLabel,
            ));
        });

    info!("Spawned {} villagers and the dragon", roster.len());
}

/// Re-evaluates each roamer whose state timer has elapsed. Straying past the
/// home radius always forces a walk back before the next random draw.
pub fn decide_roam_actions(
    clock: Res<SimulationClock>,
    config: Res<NpcConfig>,
    mut roamers: Query<(&Transform, &Home, &mut Roamer, Option<&Sociable>)>,
) {
    let delta = clock.scaled_delta();
    let mut rng = rand::thread_rng();

    for (transform, home, mut roamer, sociable) in roamers.iter_mut() {
        // Mid-conversation NPCs hold still and keep their timer frozen.
        if sociable.is_some_and(|s| s.is_chatting()) {
            continue;
        }

        let settled = match &mut roamer.state {
            RoamState::Idle { until } => until.tick(delta).just_finished(),
            RoamState::Walking { until, .. } | RoamState::ReturningHome { until } => {
                until.tick(delta).just_finished()
            }
        };
        if !settled {
            continue;
        }

        let position = transform.translation.truncate();
        let was_idle = matches!(roamer.state, RoamState::Idle { .. });

        // Walks and home-returns settle into a pause before the next draw.
        if !was_idle {
            let pause = rng.gen_range(config.roam.pause_seconds.0..=config.roam.pause_seconds.1);
            roamer.state = RoamState::Idle {
                until: Timer::from_seconds(pause, TimerMode::Once),
            };
            continue;
        }

        if position.distance(home.position) > config.roam.home_radius {
            roamer.state = RoamState::ReturningHome {
                until: Timer::from_seconds(config.roam.return_seconds, TimerMode::Once),
            };
            continue;
        }

        match roam_choice(rng.gen_range(0..6)) {
            RoamChoice::Walk(direction) => {
                let duration =
                    rng.gen_range(config.roam.walk_seconds.0..=config.roam.walk_seconds.1);
                roamer.state = RoamState::Walking {
                    velocity: direction * config.roam.speed,
                    until: Timer::from_seconds(duration, TimerMode::Once),
                };
            }
            RoamChoice::Pause => {
                let pause =
                    rng.gen_range(config.roam.pause_seconds.0..=config.roam.pause_seconds.1);
                roamer.state = RoamState::Idle {
                    until: Timer::from_seconds(pause, TimerMode::Once),
                };
            }
        }
    }
}

/// Applies roam velocities with axis-separated collision so NPCs slide along
/// walls; returning-home walks the live bearing toward the home point.
pub fn apply_roam_movement(
    clock: Res<SimulationClock>,
    config: Res<NpcConfig>,
    collisions: Res<CollisionMap>,
    mut roamers: Query<(
        &mut Transform,
        &Home,
        &Roamer,
        &mut Sprite,
        Option<&Sociable>,
    )>,
) {
    let dt = clock.scaled_delta_secs();

    for (mut transform, home, roamer, mut sprite, sociable) in roamers.iter_mut() {
        if sociable.is_some_and(|s| s.is_chatting()) {
            continue;
        }

        let position = transform.translation.truncate();
        let velocity = match &roamer.state {
            RoamState::Idle { .. } => continue,
            RoamState::Walking { velocity, .. } => *velocity,
            RoamState::ReturningHome { .. } => {
                (home.position - position).normalize_or_zero() * config.roam.speed
            }
        };

        if velocity == Vec2::ZERO {
            continue;
        }

        let step = velocity * dt;
        let mut next = position;
        if !collisions.is_blocked(Vec2::new(position.x + step.x, position.y)) {
            next.x += step.x;
        }
        if !collisions.is_blocked(Vec2::new(next.x, position.y + step.y)) {
            next.y += step.y;
        }
        next = collisions.clamp_to_bounds(next);

        if velocity.x.abs() > f32::EPSILON {
            sprite.flip_x = velocity.x < 0.0;
        }

        transform.translation.x = next.x;
        transform.translation.y = next.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_weights_are_four_walks_two_pauses() {
        let mut walks = 0;
        let mut pauses = 0;
        for roll in 0..6 {
            match roam_choice(roll) {
                RoamChoice::Walk(direction) => {
                    walks += 1;
                    assert!((direction.length() - 1.0).abs() < f32::EPSILON);
                }
                RoamChoice::Pause => pauses += 1,
            }
        }
        assert_eq!(walks, 4);
        assert_eq!(pauses, 2);
    }

    #[test]
    fn walk_directions_are_the_four_cardinals() {
        let directions: Vec<Vec2> = (0..4)
            .map(|roll| match roam_choice(roll) {
                RoamChoice::Walk(direction) => direction,
                RoamChoice::Pause => panic!("rolls 0..4 must walk"),
            })
            .collect();

        for expected in [Vec2::Y, Vec2::NEG_Y, Vec2::NEG_X, Vec2::X] {
            assert!(directions.contains(&expected));
        }
    }
}
