use std::{fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

const CONFIG_PATH: &str = "config/npc.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawNpcConfig {
    #[serde(default)]
    roam: RawRoam,
    #[serde(default)]
    chatter: RawChatter,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawRoam {
    speed: f32,
    home_radius: f32,
    return_seconds: f32,
    walk_seconds_min: f32,
    walk_seconds_max: f32,
    pause_seconds_min: f32,
    pause_seconds_max: f32,
}

impl Default for RawRoam {
    fn default() -> Self {
        Self {
            speed: 60.0,
            home_radius: 160.0,
            return_seconds: 1.5,
            walk_seconds_min: 0.8,
            walk_seconds_max: 1.8,
            pause_seconds_min: 1.5,
            pause_seconds_max: 4.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawChatter {
    interval_seconds: f32,
    max_distance: f32,
    cooldown_seconds: f32,
    reply_delay_seconds: f32,
    release_delay_seconds: f32,
    bubble_seconds: f32,
}

impl Default for RawChatter {
    fn default() -> Self {
        Self {
            interval_seconds: 6.0,
            max_distance: 140.0,
            cooldown_seconds: 18.0,
            reply_delay_seconds: 2.5,
            release_delay_seconds: 6.0,
            bubble_seconds: 3.5,
        }
    }
}

/// Runtime tuning derived from `config/npc.toml`.
#[derive(Resource, Debug, Clone)]
pub struct NpcConfig {
    pub roam: RoamConfig,
    pub chatter: ChatterConfig,
}

#[derive(Debug, Clone)]
pub struct RoamConfig {
    pub speed: f32,
    pub home_radius: f32,
    pub return_seconds: f32,
    pub walk_seconds: (f32, f32),
    pub pause_seconds: (f32, f32),
}

#[derive(Debug, Clone)]
pub struct ChatterConfig {
    pub interval_seconds: f32,
    pub max_distance: f32,
    pub cooldown_seconds: f32,
    pub reply_delay_seconds: f32,
    pub release_delay_seconds: f32,
    pub bubble_seconds: f32,
}

impl NpcConfig {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<RawNpcConfig>(&raw) {
                Ok(parsed) => parsed.into(),
                Err(err) => {
                    warn!(
                        "Failed to parse {} ({}). Falling back to defaults.",
                        CONFIG_PATH, err
                    );
                    RawNpcConfig::default().into()
                }
            },
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawNpcConfig::default().into()
            }
        }
    }
}

impl Default for NpcConfig {
    fn default() -> Self {
        RawNpcConfig::default().into()
    }
}

impl From<RawNpcConfig> for NpcConfig {
    fn from(value: RawNpcConfig) -> Self {
        let walk_min = value.roam.walk_seconds_min.max(0.1);
        let walk_max = value.roam.walk_seconds_max.max(walk_min);
        let pause_min = value.roam.pause_seconds_min.max(0.1);
        let pause_max = value.roam.pause_seconds_max.max(pause_min);

        let roam = RoamConfig {
            speed: value.roam.speed.max(1.0),
            home_radius: value.roam.home_radius.max(1.0),
            return_seconds: value.roam.return_seconds.max(0.1),
            walk_seconds: (walk_min, walk_max),
            pause_seconds: (pause_min, pause_max),
        };

        let chatter = ChatterConfig {
            interval_seconds: value.chatter.interval_seconds.max(0.5),
            max_distance: value.chatter.max_distance.max(1.0),
            cooldown_seconds: value.chatter.cooldown_seconds.max(0.0),
            reply_delay_seconds: value.chatter.reply_delay_seconds.max(0.0),
            release_delay_seconds: value.chatter.release_delay_seconds.max(0.0),
            bubble_seconds: value.chatter.bubble_seconds.max(0.5),
        };

        Self { roam, chatter }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = NpcConfig::default();
        assert!(config.roam.speed > 0.0);
        assert!(config.roam.walk_seconds.0 <= config.roam.walk_seconds.1);
        assert!(config.chatter.interval_seconds > 0.0);
    }

    #[test]
    fn malformed_ranges_are_clamped() {
        let raw: RawNpcConfig = toml::from_str(
            r#"
                [roam]
                walk_seconds_min = 3.0
                walk_seconds_max = 1.0
                speed = -5.0
            "#,
        )
        .expect("toml should parse");
        let config = NpcConfig::from(raw);
        assert!(config.roam.walk_seconds.0 <= config.roam.walk_seconds.1);
        assert!(config.roam.speed >= 1.0);
    }
}
