//! Player spawning, movement, and NPC proximity detection.
use bevy::prelude::*;

use crate::{
    core::SimulationClock,
    dialogue::session::DialogueSession,
    npc::components::Identity,
    player::components::{NearbyNpcInfo, Player, PlayerInteractionState},
    world::{components::MainCamera, map::CollisionMap},
};

/// Maximum distance (in world units) at which the talk prompt appears.
const INTERACTION_RANGE: f32 = 80.0;

const PLAYER_SPRITE_SIZE: f32 = 44.0;
const PLAYER_DEPTH: f32 = 25.0;
const PLAYER_SPAWN_TILE: (i32, i32) = (14, 12);

const CAMERA_LERP_RATE: f32 = 6.0;

/// Spawns the player avatar at the village square.
pub fn spawn_player(mut commands: Commands, collisions: Res<CollisionMap>) {
    let position = collisions.tile_to_world(PLAYER_SPAWN_TILE.0, PLAYER_SPAWN_TILE.1);
    commands.spawn((
        Sprite::from_color(Color::srgb_u8(240, 220, 130), Vec2::splat(PLAYER_SPRITE_SIZE)),
        Transform::from_translation(position.extend(PLAYER_DEPTH)),
        Player,
        crate::player::components::PlayerMovement::default(),
        Name::new("Player"),
    ));
}

/// Applies WASD/arrow movement with axis-separated collision. Movement is
/// frozen entirely while a dialogue session is open.
pub fn move_player(
    clock: Res<SimulationClock>,
    session: Res<DialogueSession>,
    keyboard: Res<ButtonInput<KeyCode>>,
    collisions: Res<CollisionMap>,
    mut players: Query<
        (
            &mut Transform,
            &mut Sprite,
            &crate::player::components::PlayerMovement,
        ),
        With<Player>,
    >,
) {
    if session.is_open() {
        return;
    }

    let Ok((mut transform, mut sprite, movement)) = players.single_mut() else {
        return;
    };

    let mut direction = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        direction.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        direction.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        direction.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        direction.x += 1.0;
    }

    if direction == Vec2::ZERO {
        return;
    }

    let step = direction.normalize() * movement.speed * clock.scaled_delta_secs();
    let position = transform.translation.truncate();

    let mut next = position;
    if !collisions.is_blocked(Vec2::new(position.x + step.x, position.y)) {
        next.x += step.x;
    }
    if !collisions.is_blocked(Vec2::new(next.x, position.y + step.y)) {
        next.y += step.y;
    }
    next = collisions.clamp_to_bounds(next);

    if direction.x.abs() > f32::EPSILON {
        sprite.flip_x = direction.x < 0.0;
    }

    transform.translation.x = next.x;
    transform.translation.y = next.y;
}

/// Tracks the nearest NPC within interaction range for the talk prompt.
pub fn detect_nearby_npcs(
    players: Query<&Transform, With<Player>>,
    npcs: Query<(Entity, &Transform, &Identity)>,
    mut interaction: ResMut<PlayerInteractionState>,
) {
    let Ok(player_transform) = players.single() else {
        interaction.nearby_npc = None;
        return;
    };
    let player_pos = player_transform.translation.truncate();

    let mut nearest: Option<NearbyNpcInfo> = None;
    for (entity, npc_transform, identity) in npcs.iter() {
        let distance = player_pos.distance(npc_transform.translation.truncate());
        if distance > INTERACTION_RANGE {
            continue;
        }
        if nearest.as_ref().is_none_or(|best| distance < best.distance) {
            nearest = Some(NearbyNpcInfo {
                entity,
                npc_id: identity.id,
                name: identity.display_name.clone(),
                distance,
            });
        }
    }

    interaction.nearby_npc = nearest;
}

/// Glides the camera toward the player, clamped to the map edges.
pub fn camera_follow_player(
    time: Res<Time>,
    collisions: Res<CollisionMap>,
    players: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    mut cameras: Query<&mut Transform, With<MainCamera>>,
) {
    let Ok(player_transform) = players.single() else {
        return;
    };
    let Ok(mut camera_transform) = cameras.single_mut() else {
        return;
    };

    let target = collisions.clamp_to_bounds(player_transform.translation.truncate());
    let t = (CAMERA_LERP_RATE * time.delta_secs()).min(1.0);
    let current = camera_transform.translation.truncate();
    let next = current.lerp(target, t);
    camera_transform.translation.x = next.x;
    camera_transform.translation.y = next.y;
}
