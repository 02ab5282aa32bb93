//! Components used by the world module.
use bevy::prelude::*;

/// Marker component for the primary 2D camera that follows the player.
#[derive(Component, Default)]
pub struct MainCamera;

/// Marker component attached to every spawned map tile sprite.
#[derive(Component, Default)]
pub struct MapTile;
