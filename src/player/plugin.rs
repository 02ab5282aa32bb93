use bevy::prelude::*;

use crate::{
    player::{
        components::PlayerInteractionState,
        systems::{camera_follow_player, detect_nearby_npcs, move_player, spawn_player},
    },
    world::systems::spawn_village_map,
};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInteractionState>()
            .add_systems(Startup, spawn_player.after(spawn_village_map))
            .add_systems(
                Update,
                (
                    move_player,
                    detect_nearby_npcs.after(move_player),
                    camera_follow_player.after(move_player),
                ),
            );
    }
}
