//! Tiny Swords map format: JSON tile layers plus the collision grid derived
//! from them.
//!
//! The map JSON uses `{id, x, y}` tile entries per layer, where `id` is the
//! sprite index in the original spritesheet. Layers are stored front-to-back,
//! so rendering walks them in reverse (background first). Tile `y` grows
//! downward in the file; world-space `y` grows upward, so conversions negate it.
use std::{collections::HashSet, fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

const DEFAULT_TILE_SIZE: u32 = 64;
const DEFAULT_MAP_WIDTH: u32 = 29;
const DEFAULT_MAP_HEIGHT: u32 = 16;

/// Top-level map description as found in `assets/village_map.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct MapData {
    #[serde(rename = "tileSize", default = "default_tile_size")]
    pub tile_size: u32,
    #[serde(rename = "mapWidth", default = "default_map_width")]
    pub map_width: u32,
    #[serde(rename = "mapHeight", default = "default_map_height")]
    pub map_height: u32,
    #[serde(default)]
    pub layers: Vec<MapLayer>,
}

fn default_tile_size() -> u32 {
    DEFAULT_TILE_SIZE
}

fn default_map_width() -> u32 {
    DEFAULT_MAP_WIDTH
}

fn default_map_height() -> u32 {
    DEFAULT_MAP_HEIGHT
}

/// One named layer of tiles; collider layers block movement.
#[derive(Debug, Clone, Deserialize)]
pub struct MapLayer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub collider: bool,
    #[serde(default)]
    pub tiles: Vec<TileRef>,
}

/// A single tile placement. The original editor writes `id` as a string in
/// some exports and a number in others, so both decode.
#[derive(Debug, Clone, Deserialize)]
pub struct TileRef {
    pub id: TileId,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TileId {
    Number(u32),
    Text(String),
}

impl TileId {
    /// Sprite frame index; malformed string ids decode to frame 0.
    pub fn index(&self) -> u32 {
        match self {
            TileId::Number(value) => *value,
            TileId::Text(text) => text.trim().parse().unwrap_or(0),
        }
    }
}

impl MapData {
    pub fn width_in_pixels(&self) -> f32 {
        (self.map_width * self.tile_size) as f32
    }

    pub fn height_in_pixels(&self) -> f32 {
        (self.map_height * self.tile_size) as f32
    }

    /// Layers in draw order: background (last in the file) first.
    pub fn layers_back_to_front(&self) -> impl Iterator<Item = &MapLayer> {
        self.layers.iter().rev()
    }

    /// Loads the map JSON, falling back to the built-in village on any error.
    /// A missing or corrupt map degrades the visuals but never aborts the game.
    pub fn load_or_fallback(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<MapData>(&raw) {
                Ok(map) => map,
                Err(err) => {
                    warn!(
                        "Failed to parse map {} ({}). Using built-in village layout.",
                        path.display(),
                        err
                    );
                    Self::fallback_village()
                }
            },
            Err(err) => {
                warn!(
                    "Failed to read map {} ({}). Using built-in village layout.",
                    path.display(),
                    err
                );
                Self::fallback_village()
            }
        }
    }

    /// Minimal hand-rolled village: grass everywhere, tree border, two house
    /// clusters. Keeps the NPC spawn tiles walkable.
    pub fn fallback_village() -> Self {
        let width = DEFAULT_MAP_WIDTH as i32;
        let height = DEFAULT_MAP_HEIGHT as i32;

        let mut grass = Vec::new();
        for y in 0..height {
            for x in 0..width {
                grass.push(TileRef {
                    id: TileId::Number(0),
                    x,
                    y,
                });
            }
        }

        let mut border = Vec::new();
        for x in 0..width {
            border.push(TileRef {
                id: TileId::Number(100),
                x,
                y: 0,
            });
            border.push(TileRef {
                id: TileId::Number(100),
                x,
                y: height - 1,
            });
        }
        for y in 1..height - 1 {
            border.push(TileRef {
                id: TileId::Number(100),
                x: 0,
                y,
            });
            border.push(TileRef {
                id: TileId::Number(100),
                x: width - 1,
                y,
            });
        }

        let mut houses = Vec::new();
        for (hx, hy) in [(4, 4), (5, 4), (4, 5), (5, 5), (22, 6), (23, 6), (22, 7)] {
            houses.push(TileRef {
                id: TileId::Number(40),
                x: hx,
                y: hy,
            });
        }

        // Front-to-back, matching the on-disk format.
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            map_width: DEFAULT_MAP_WIDTH,
            map_height: DEFAULT_MAP_HEIGHT,
            layers: vec![
                MapLayer {
                    name: Some("Houses".to_string()),
                    collider: true,
                    tiles: houses,
                },
                MapLayer {
                    name: Some("Trees".to_string()),
                    collider: true,
                    tiles: border,
                },
                MapLayer {
                    name: Some("Background".to_string()),
                    collider: false,
                    tiles: grass,
                },
            ],
        }
    }
}

/// Blocked-tile grid plus map geometry, consumed by player and NPC movement.
#[derive(Resource, Debug, Clone)]
pub struct CollisionMap {
    blocked: HashSet<(i32, i32)>,
    tile_size: f32,
    width: i32,
    height: i32,
}

impl CollisionMap {
    pub fn from_map(map: &MapData) -> Self {
        let mut blocked = HashSet::new();
        for layer in &map.layers {
            if !layer.collider {
                continue;
            }
            for tile in &layer.tiles {
                blocked.insert((tile.x, tile.y));
            }
        }

        Self {
            blocked,
            tile_size: map.tile_size as f32,
            width: map.map_width as i32,
            height: map.map_height as i32,
        }
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Centre of a tile in world space (world y grows up, tile y grows down).
    pub fn tile_to_world(&self, x: i32, y: i32) -> Vec2 {
        Vec2::new(
            x as f32 * self.tile_size + self.tile_size / 2.0,
            -(y as f32 * self.tile_size + self.tile_size / 2.0),
        )
    }

    pub fn world_to_tile(&self, position: Vec2) -> (i32, i32) {
        (
            (position.x / self.tile_size).floor() as i32,
            (-position.y / self.tile_size).floor() as i32,
        )
    }

    /// Whether a world position lands on a collider tile or outside the map.
    pub fn is_blocked(&self, position: Vec2) -> bool {
        let (tx, ty) = self.world_to_tile(position);
        if tx < 0 || ty < 0 || tx >= self.width || ty >= self.height {
            return true;
        }
        self.blocked.contains(&(tx, ty))
    }

    /// Clamps a world position to the map's pixel bounds.
    pub fn clamp_to_bounds(&self, position: Vec2) -> Vec2 {
        let max_x = self.width as f32 * self.tile_size;
        let max_y = self.height as f32 * self.tile_size;
        Vec2::new(
            position.x.clamp(0.0, max_x),
            position.y.clamp(-max_y, 0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_map() -> MapData {
        serde_json::from_str(
            r#"{
                "tileSize": 64,
                "mapWidth": 3,
                "mapHeight": 2,
                "layers": [
                    {
                        "name": "Walls",
                        "collider": true,
                        "tiles": [{"id": "130", "x": 1, "y": 0}]
                    },
                    {
                        "name": "Background",
                        "tiles": [
                            {"id": 0, "x": 0, "y": 0}, {"id": 0, "x": 1, "y": 0},
                            {"id": 0, "x": 2, "y": 0}, {"id": 0, "x": 0, "y": 1},
                            {"id": 0, "x": 1, "y": 1}, {"id": 0, "x": 2, "y": 1}
                        ]
                    }
                ]
            }"#,
        )
        .expect("tiny map should parse")
    }

    #[test]
    fn parses_string_and_numeric_tile_ids() {
        let map = tiny_map();
        assert_eq!(map.layers[0].tiles[0].id.index(), 130);
        assert_eq!(map.layers[1].tiles[0].id.index(), 0);
    }

    #[test]
    fn background_layer_renders_first() {
        let map = tiny_map();
        let first = map.layers_back_to_front().next().expect("has layers");
        assert_eq!(first.name.as_deref(), Some("Background"));
    }

    #[test]
    fn collision_map_blocks_collider_tiles_and_out_of_bounds() {
        let map = tiny_map();
        let collisions = CollisionMap::from_map(&map);

        let wall = collisions.tile_to_world(1, 0);
        let floor = collisions.tile_to_world(0, 1);
        assert!(collisions.is_blocked(wall));
        assert!(!collisions.is_blocked(floor));
        assert!(collisions.is_blocked(Vec2::new(-10.0, -10.0)));
        assert!(collisions.is_blocked(Vec2::new(10_000.0, -10.0)));
    }

    #[test]
    fn world_tile_round_trip() {
        let map = tiny_map();
        let collisions = CollisionMap::from_map(&map);
        let world = collisions.tile_to_world(2, 1);
        assert_eq!(collisions.world_to_tile(world), (2, 1));
    }

    #[test]
    fn fallback_village_keeps_spawn_tiles_walkable() {
        let map = MapData::fallback_village();
        let collisions = CollisionMap::from_map(&map);
        // NPC and player spawn tiles from the village roster.
        for (x, y) in [(6, 10), (20, 10), (10, 13), (16, 13), (25, 3), (14, 12)] {
            assert!(
                !collisions.is_blocked(collisions.tile_to_world(x, y)),
                "spawn tile ({x},{y}) must stay walkable"
            );
        }
    }
}
