use bevy::prelude::*;

use crate::{
    npc::{
        chatter::{advance_active_conversation, run_chat_scheduler, NpcChatter, NpcSpeech},
        config::NpcConfig,
        conversations::ConversationScript,
        systems::{apply_roam_movement, decide_roam_actions, spawn_village_npcs},
    },
    world::systems::spawn_village_map,
};

/// Villager roaming plus the scripted NPC-to-NPC chatter scheduler.
pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        let config = NpcConfig::load_or_default();
        let chatter = NpcChatter::new(config.chatter.interval_seconds);

        app.insert_resource(config)
            .insert_resource(ConversationScript::village_script())
            .insert_resource(chatter)
            .add_message::<NpcSpeech>()
            .add_systems(Startup, spawn_village_npcs.after(spawn_village_map))
            .add_systems(
                Update,
                (
                    decide_roam_actions,
                    apply_roam_movement.after(decide_roam_actions),
                    run_chat_scheduler,
                    advance_active_conversation.after(run_chat_scheduler),
                ),
            );
    }
}
