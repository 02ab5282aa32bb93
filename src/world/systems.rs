//! Systems for the world module: camera and map spawning.
use bevy::prelude::*;

use crate::world::{
    components::{MainCamera, MapTile},
    map::{CollisionMap, MapData},
};

const MAP_PATH: &str = "assets/village_map.json";

/// Placeholder palette: tile ids map to flat colors until real art lands.
fn tile_color(id: u32) -> Color {
    match id {
        0..=9 => Color::srgb_u8(96, 148, 86),    // grass
        10..=39 => Color::srgb_u8(168, 152, 110), // paths / sand
        40..=99 => Color::srgb_u8(140, 104, 72),  // buildings
        100..=129 => Color::srgb_u8(52, 96, 54),  // trees
        _ => Color::srgb_u8(90, 90, 100),         // rocks / misc
    }
}

/// Spawns the 2D camera and renders the village map into tile sprites,
/// inserting the collision grid as a resource.
pub fn spawn_village_map(mut commands: Commands) {
    let map = MapData::load_or_fallback(MAP_PATH);
    let collisions = CollisionMap::from_map(&map);

    let center = Vec3::new(
        map.width_in_pixels() / 2.0,
        -map.height_in_pixels() / 2.0,
        0.0,
    );

    commands.spawn((
        Camera2d,
        Transform::from_translation(center.with_z(999.0)),
        MainCamera,
    ));

    let tile_size = map.tile_size as f32;
    let quad = Vec2::splat(tile_size);

    for (depth, layer) in map.layers_back_to_front().enumerate() {
        for tile in &layer.tiles {
            let position = collisions.tile_to_world(tile.x, tile.y);
            commands.spawn((
                Sprite::from_color(tile_color(tile.id.index()), quad),
                Transform::from_translation(position.extend(depth as f32)),
                MapTile,
            ));
        }
    }

    info!(
        "Village map spawned: {}x{} tiles, {} layers",
        map.map_width,
        map.map_height,
        map.layers.len()
    );

    commands.insert_resource(collisions);
}
