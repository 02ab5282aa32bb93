//! HUD state and markers.
use bevy::prelude::*;

/// Mission ids the backend can report, mapped to player-facing names.
pub fn mission_display_name(id: &str) -> &str {
    match id {
        "riddle_quest" => "Wizard's Riddle",
        "forge_quest" => "Forge the Sword",
        "herb_quest" => "Herbalist's Riddle",
        "guard_quest" => "Guard's Blessing",
        "dragon_quest" => "Slay the Dragon",
        other => other,
    }
}

/// Accumulated game progress shown in the HUD.
#[derive(Resource, Debug, Default)]
pub struct HudState {
    pub inventory: Vec<String>,
    /// Completed mission ids in the order they were first reported.
    pub missions: Vec<String>,
    pub dragon_defeated: bool,
    pub game_complete: bool,
}

impl HudState {
    pub fn record_missions(&mut self, completed: &[String]) {
        for mission in completed {
            if !self.missions.contains(mission) {
                self.missions.push(mission.clone());
            }
        }
    }

    pub fn clear(&mut self) {
        self.inventory.clear();
        self.missions.clear();
        self.dragon_defeated = false;
        self.game_complete = false;
    }
}

#[derive(Component, Debug)]
pub struct InventoryText;

#[derive(Component, Debug)]
pub struct MissionText;

#[derive(Component, Debug)]
pub struct HintText;

#[derive(Component, Debug)]
pub struct VictoryBanner;

/// Runs the dragon's shrink-and-fade once its quest completes.
#[derive(Component, Debug)]
pub struct DragonDefeat {
    pub timer: Timer,
}

impl DragonDefeat {
    pub fn new(seconds: f32) -> Self {
        Self {
            timer: Timer::from_seconds(seconds, TimerMode::Once),
        }
    }
}

/// Delay between the winning reply and the banner appearing.
#[derive(Resource, Debug, Default)]
pub struct VictoryCountdown {
    pub timer: Option<Timer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mission_names_cover_the_quest_line() {
        assert_eq!(mission_display_name("riddle_quest"), "Wizard's Riddle");
        assert_eq!(mission_display_name("dragon_quest"), "Slay the Dragon");
        // Unknown ids pass through untouched.
        assert_eq!(mission_display_name("secret_quest"), "secret_quest");
    }

    #[test]
    fn missions_record_once_in_first_seen_order() {
        let mut state = HudState::default();
        state.record_missions(&["riddle_quest".into(), "forge_quest".into()]);
        state.record_missions(&["riddle_quest".into(), "herb_quest".into()]);
        assert_eq!(state.missions, vec!["riddle_quest", "forge_quest", "herb_quest"]);
    }
}
