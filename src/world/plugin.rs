//! World plugin wiring map and camera setup.
use bevy::prelude::*;

use crate::world::systems::spawn_village_map;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_village_map);
    }
}
