use bevy::prelude::*;

use super::{
    components::{HudState, VictoryCountdown},
    systems::{
        animate_dragon_defeat, apply_game_effects, handle_memory_reset, setup_hud,
        tick_victory_banner, update_hint_text, update_hud_texts,
    },
};

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HudState>()
            .init_resource::<VictoryCountdown>()
            .add_systems(Startup, setup_hud)
            .add_systems(
                Update,
                (
                    apply_game_effects,
                    handle_memory_reset.after(apply_game_effects),
                    update_hud_texts.after(handle_memory_reset),
                    update_hint_text,
                    animate_dragon_defeat,
                    tick_victory_banner,
                ),
            );
    }
}
