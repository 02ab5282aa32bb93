//! NPC-specific components and supporting state.
use std::fmt;

use bevy::prelude::*;

/// Unique identifier for an NPC; the same key travels on the wire as
/// `npc_id`, so it stays a plain string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Component)]
pub struct NpcId(&'static str);

impl NpcId {
    pub const WIZARD: NpcId = NpcId("wizard");
    pub const BLACKSMITH: NpcId = NpcId("blacksmith");
    pub const HERBALIST: NpcId = NpcId("herbalist");
    pub const GUARD: NpcId = NpcId("guard");
    pub const DRAGON: NpcId = NpcId("dragon");

    pub const fn new(key: &'static str) -> Self {
        Self(key)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for NpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity data shown in dialogue and above the sprite.
#[derive(Component, Debug, Clone)]
pub struct Identity {
    pub id: NpcId,
    pub display_name: String,
}

impl Identity {
    pub fn new(id: NpcId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// Where the NPC belongs; wandering past `RoamConfig::home_radius` from here
/// forces a walk back before any further random action.
#[derive(Component, Debug, Clone, Copy)]
pub struct Home {
    pub position: Vec2,
}

/// Roam state machine: idle and walking alternate, returning-home overrides
/// both when the NPC strays too far.
#[derive(Debug, Clone)]
pub enum RoamState {
    Idle { until: Timer },
    Walking { velocity: Vec2, until: Timer },
    ReturningHome { until: Timer },
}

#[derive(Component, Debug)]
pub struct Roamer {
    pub state: RoamState,
}

impl Roamer {
    pub fn idle_for(seconds: f32) -> Self {
        Self {
            state: RoamState::Idle {
                until: Timer::from_seconds(seconds, TimerMode::Once),
            },
        }
    }
}

/// Countdown gate between chats, mirroring the dialogue queue's cooldown
/// bookkeeping (seconds remaining, ticked by scaled delta).
#[derive(Debug, Clone)]
pub struct CooldownTracker {
    remaining: f32,
}

impl CooldownTracker {
    pub fn ready() -> Self {
        Self { remaining: 0.0 }
    }

    pub fn tick(&mut self, delta_seconds: f32) {
        self.remaining = (self.remaining - delta_seconds).max(0.0);
    }

    pub fn is_ready(&self) -> bool {
        self.remaining <= f32::EPSILON
    }

    pub fn trigger(&mut self, cooldown: f32) {
        self.remaining = cooldown.max(0.0);
    }
}

/// Participation in NPC-NPC chatter. The dragon is spawned without this
/// component and therefore never enters the scheduler's candidate set.
#[derive(Component, Debug)]
pub struct Sociable {
    chatting: bool,
    cooldown: CooldownTracker,
}

impl Sociable {
    pub fn ready() -> Self {
        Self {
            chatting: false,
            cooldown: CooldownTracker::ready(),
        }
    }

    pub fn tick(&mut self, delta_seconds: f32) {
        self.cooldown.tick(delta_seconds);
    }

    pub fn is_chatting(&self) -> bool {
        self.chatting
    }

    pub fn cooldown_ready(&self) -> bool {
        self.cooldown.is_ready()
    }

    /// Marks the NPC as mid-conversation and stamps the cooldown.
    pub fn begin_chat(&mut self, cooldown_seconds: f32) {
        self.chatting = true;
        self.cooldown.trigger(cooldown_seconds);
    }

    pub fn end_chat(&mut self) {
        self.chatting = false;
    }
}

/// Marker for NPCs that threaten rather than greet (changes the dialogue
/// prompt and the defeat handling).
#[derive(Component, Debug, Default)]
pub struct Hostile;

/// Marker for the floating name label child entity.
#[derive(Component, Debug)]
pub struct NpcLabel;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_tracker_blocks_until_elapsed() {
        let mut tracker = CooldownTracker::ready();
        assert!(tracker.is_ready());

        tracker.trigger(2.0);
        assert!(!tracker.is_ready());

        tracker.tick(1.0);
        assert!(!tracker.is_ready());

        tracker.tick(1.0);
        assert!(tracker.is_ready());
    }

    #[test]
    fn sociable_chat_cycle_respects_cooldown() {
        let mut sociable = Sociable::ready();
        sociable.begin_chat(10.0);
        assert!(sociable.is_chatting());
        assert!(!sociable.cooldown_ready());

        sociable.end_chat();
        assert!(!sociable.is_chatting());
        assert!(!sociable.cooldown_ready());

        sociable.tick(10.0);
        assert!(sociable.cooldown_ready());
    }
}
