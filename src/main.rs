use std::path::Path;

use bevy::prelude::*;

use emberhollow::{CorePlugin, DialoguePlugin, NpcPlugin, PlayerPlugin, UiPlugin, WorldPlugin};

fn main() {
    load_backend_env();

    App::new()
        .add_plugins((
            DefaultPlugins,
            CorePlugin::default(),
            WorldPlugin,
            NpcPlugin,
            PlayerPlugin,
            DialoguePlugin,
            UiPlugin, // After DialoguePlugin to receive dialogue messages
        ))
        .run();
}

fn load_backend_env() {
    const ENV_FILE: &str = "backend.env";

    let path = Path::new(ENV_FILE);
    if !path.exists() {
        return;
    }

    if let Err(err) = dotenvy::from_filename(path) {
        eprintln!("Failed to load {}: {}", ENV_FILE, err);
    }
}
