//! Components and resources for the player avatar.
use bevy::prelude::*;

use crate::npc::components::NpcId;

/// Marker component identifying the player entity.
#[derive(Component, Debug)]
pub struct Player;

/// Movement tuning for the player avatar.
#[derive(Component, Debug)]
pub struct PlayerMovement {
    /// Walk speed in world units per second.
    pub speed: f32,
}

impl Default for PlayerMovement {
    fn default() -> Self {
        Self { speed: 220.0 }
    }
}

/// Resource tracking which NPC, if any, is close enough to talk to.
#[derive(Resource, Default, Debug)]
pub struct PlayerInteractionState {
    pub nearby_npc: Option<NearbyNpcInfo>,
}

/// Information about the nearest NPC in interaction range.
#[derive(Debug, Clone)]
pub struct NearbyNpcInfo {
    pub entity: Entity,
    pub npc_id: NpcId,
    pub name: String,
    pub distance: f32,
}
