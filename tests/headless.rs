//! Headless integration tests.
//!
//! These exercise the behavioral layer without a window or GPU, using
//! `MinimalPlugins` and a manually ticked simulation clock so timer-driven
//! systems run deterministically.
//!
//! Run with: `cargo test --test headless`

use std::time::Duration;

use bevy::prelude::*;

use emberhollow::core::SimulationClock;
use emberhollow::dialogue::events::{
    DialogueClosed, DialogueOpened, GameEffects, MemoryReset, NpcReplied, PlayerLineSubmitted,
};
use emberhollow::dialogue::session::{handle_session_keys, DialogueSession};
use emberhollow::npc::chatter::{
    advance_active_conversation, run_chat_scheduler, NpcChatter, NpcSpeech,
};
use emberhollow::npc::components::{Home, Hostile, Identity, NpcId, RoamState, Roamer, Sociable};
use emberhollow::npc::config::NpcConfig;
use emberhollow::npc::conversations::ConversationScript;
use emberhollow::npc::systems::{apply_roam_movement, decide_roam_actions};
use emberhollow::player::components::{
    NearbyNpcInfo, Player, PlayerInteractionState, PlayerMovement,
};
use emberhollow::player::systems::move_player;
use emberhollow::ui::hud::components::{DragonDefeat, HudState, VictoryCountdown};
use emberhollow::ui::hud::systems::apply_game_effects;
use emberhollow::world::map::{CollisionMap, MapData};

/// Lines captured from `NpcSpeech` messages, in emission order.
#[derive(Resource, Default)]
struct SpokenLines(Vec<(String, String)>);

fn capture_speech(mut speech: MessageReader<NpcSpeech>, mut lines: ResMut<SpokenLines>) {
    for line in speech.read() {
        lines.0.push((line.speaker_name.clone(), line.text.clone()));
    }
}

/// Builds a minimal app with the chatter scheduler and a manual clock.
/// The clock has no update system; tests advance it explicitly.
fn build_chatter_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);

    app.insert_resource(SimulationClock::new(1.0))
        .insert_resource(NpcConfig::default())
        .insert_resource(ConversationScript::village_script())
        .insert_resource(NpcChatter::new(6.0))
        .init_resource::<DialogueSession>()
        .init_resource::<SpokenLines>()
        .add_message::<NpcSpeech>()
        .add_systems(
            Update,
            (
                run_chat_scheduler,
                advance_active_conversation.after(run_chat_scheduler),
                capture_speech.after(advance_active_conversation),
            ),
        );
    app
}

/// Ticks the simulation clock by `seconds` and runs one frame.
fn advance(app: &mut App, seconds: f32) {
    app.world_mut()
        .resource_mut::<SimulationClock>()
        .tick(Duration::from_secs_f32(seconds));
    app.update();
}

fn spawn_villager(app: &mut App, id: NpcId, name: &str, x: f32) -> Entity {
    let position = Vec2::new(x, 0.0);
    app.world_mut()
        .spawn((
            Sprite::from_color(Color::WHITE, Vec2::splat(44.0)),
            Transform::from_translation(position.extend(20.0)),
            Identity::new(id, name),
            Home { position },
            Roamer::idle_for(1.0),
            Sociable::ready(),
        ))
        .id()
}

// ─────────────────────────────────────────────────────────────────────────────
// NPC chatter scheduler
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn scripted_pair_talks_and_releases() {
    let mut app = build_chatter_app();
    let wizard = spawn_villager(&mut app, NpcId::WIZARD, "Zephyr the Wise", 0.0);
    let smith = spawn_villager(&mut app, NpcId::BLACKSMITH, "Brunhild the Strong", 50.0);

    // Scheduler interval is 6s; nothing should happen before it elapses.
    advance(&mut app, 1.0);
    assert!(app.world().resource::<SpokenLines>().0.is_empty());

    advance(&mut app, 5.1);
    {
        let chatter = app.world().resource::<NpcChatter>();
        assert!(chatter.conversation_active(), "pair should start talking");
    }
    for entity in [wizard, smith] {
        let sociable = app.world().entity(entity).get::<Sociable>().unwrap();
        assert!(sociable.is_chatting(), "both parties should be mid-chat");
    }

    {
        let lines = app.world().resource::<SpokenLines>();
        assert_eq!(lines.0[0].0, "Zephyr the Wise");
        assert_eq!(lines.0[0].1, "The stars foretell a hero...");
    }

    // Reply lands after the reply delay, release after the release delay.
    advance(&mut app, 3.0);
    {
        let lines = app.world().resource::<SpokenLines>();
        let reply = lines.0.iter().find(|(name, _)| name == "Brunhild the Strong");
        assert_eq!(reply.map(|(_, text)| text.as_str()), Some("Aye, about time."));
    }

    advance(&mut app, 6.1);
    assert!(!app.world().resource::<NpcChatter>().conversation_active());
    for entity in [wizard, smith] {
        let sociable = app.world().entity(entity).get::<Sociable>().unwrap();
        assert!(!sociable.is_chatting());
        assert!(
            !sociable.cooldown_ready(),
            "cooldown should hold after a conversation"
        );
    }
}

#[test]
fn open_dialogue_session_suppresses_chatter() {
    let mut app = build_chatter_app();
    spawn_villager(&mut app, NpcId::WIZARD, "Zephyr the Wise", 0.0);
    spawn_villager(&mut app, NpcId::BLACKSMITH, "Brunhild the Strong", 50.0);

    app.world_mut()
        .resource_mut::<DialogueSession>()
        .open(Entity::PLACEHOLDER, NpcId::GUARD, "Captain Aldric".into());

    advance(&mut app, 6.1);
    advance(&mut app, 6.1);

    assert!(app.world().resource::<SpokenLines>().0.is_empty());
    assert!(!app.world().resource::<NpcChatter>().conversation_active());

    // Closing the session lets the next interval fire.
    app.world_mut().resource_mut::<DialogueSession>().close();
    advance(&mut app, 6.1);
    assert!(app.world().resource::<NpcChatter>().conversation_active());
}

#[test]
fn only_one_conversation_runs_at_a_time() {
    let mut app = build_chatter_app();
    spawn_villager(&mut app, NpcId::WIZARD, "Zephyr the Wise", 0.0);
    spawn_villager(&mut app, NpcId::BLACKSMITH, "Brunhild the Strong", 40.0);
    // A second scripted pair, also in range of each other.
    spawn_villager(&mut app, NpcId::HERBALIST, "Elara the Herbalist", 80.0);
    spawn_villager(&mut app, NpcId::GUARD, "Captain Aldric", 120.0);

    advance(&mut app, 6.1);

    let mut sociables = app.world_mut().query::<&Sociable>();
    let chatting = sociables
        .iter(app.world())
        .filter(|sociable| sociable.is_chatting())
        .count();
    assert_eq!(chatting, 2, "exactly one pair should be mid-conversation");
}

// ─────────────────────────────────────────────────────────────────────────────
// Roaming home radius
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn strayed_roamer_returns_toward_home() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);

    app.insert_resource(SimulationClock::new(1.0))
        .insert_resource(NpcConfig::default())
        .insert_resource(CollisionMap::from_map(&MapData::fallback_village()))
        .add_systems(
            Update,
            (decide_roam_actions, apply_roam_movement.after(decide_roam_actions)),
        );

    let (home, strayed) = {
        let collisions = app.world().resource::<CollisionMap>();
        (collisions.tile_to_world(6, 10), collisions.tile_to_world(10, 10))
    };
    let radius = app.world().resource::<NpcConfig>().roam.home_radius;
    assert!(
        home.distance(strayed) > radius,
        "start point must lie outside the home radius"
    );

    let npc = app
        .world_mut()
        .spawn((
            Sprite::from_color(Color::WHITE, Vec2::splat(44.0)),
            Transform::from_translation(strayed.extend(20.0)),
            Home { position: home },
            Roamer::idle_for(0.5),
        ))
        .id();

    // The idle timer elapses; the next decision must be a walk home, never a
    // random draw.
    advance(&mut app, 0.6);
    {
        let roamer = app.world().entity(npc).get::<Roamer>().unwrap();
        assert!(
            matches!(roamer.state, RoamState::ReturningHome { .. }),
            "an idle roamer beyond the home radius must start returning"
        );
    }
    let after_first = app
        .world()
        .entity(npc)
        .get::<Transform>()
        .unwrap()
        .translation
        .truncate();
    assert!(
        after_first.distance(home) < strayed.distance(home),
        "returning roamer should close on its home point"
    );

    advance(&mut app, 1.0);
    let after_second = app
        .world()
        .entity(npc)
        .get::<Transform>()
        .unwrap()
        .translation
        .truncate();
    assert!(
        after_second.distance(home) < after_first.distance(home),
        "the return walk should keep closing the gap each frame"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Player freeze while a session is open
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn player_movement_freezes_during_dialogue() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);

    app.insert_resource(SimulationClock::new(1.0))
        .insert_resource(CollisionMap::from_map(&MapData::fallback_village()))
        .init_resource::<DialogueSession>()
        .add_systems(Update, move_player);

    let mut keys = ButtonInput::<KeyCode>::default();
    keys.press(KeyCode::KeyD);
    app.insert_resource(keys);

    let start = {
        let collisions = app.world().resource::<CollisionMap>();
        collisions.tile_to_world(14, 12)
    };
    let player = app
        .world_mut()
        .spawn((
            Sprite::from_color(Color::WHITE, Vec2::splat(44.0)),
            Transform::from_translation(start.extend(25.0)),
            Player,
            PlayerMovement::default(),
        ))
        .id();

    app.world_mut()
        .resource_mut::<DialogueSession>()
        .open(Entity::PLACEHOLDER, NpcId::WIZARD, "Zephyr the Wise".into());

    advance(&mut app, 0.25);
    let frozen = app.world().entity(player).get::<Transform>().unwrap();
    assert_eq!(
        frozen.translation.truncate(),
        start,
        "player must not move while a session is open"
    );

    app.world_mut().resource_mut::<DialogueSession>().close();
    advance(&mut app, 0.25);
    let moved = app.world().entity(player).get::<Transform>().unwrap();
    assert!(
        moved.translation.x > start.x,
        "player should move once the session closes"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Session open/close keys
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn space_opens_and_escape_closes_the_session() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);

    app.init_resource::<DialogueSession>()
        .init_resource::<PlayerInteractionState>()
        .insert_resource(ButtonInput::<KeyCode>::default())
        .add_message::<DialogueOpened>()
        .add_message::<DialogueClosed>()
        .add_message::<PlayerLineSubmitted>()
        .add_message::<NpcReplied>()
        .add_systems(Update, handle_session_keys);

    let npc = app
        .world_mut()
        .spawn(Identity::new(NpcId::HERBALIST, "Elara the Herbalist"))
        .id();
    app.world_mut()
        .resource_mut::<PlayerInteractionState>()
        .nearby_npc = Some(NearbyNpcInfo {
        entity: npc,
        npc_id: NpcId::HERBALIST,
        name: "Elara the Herbalist".to_string(),
        distance: 30.0,
    });

    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::Space);
    app.update();

    {
        let session = app.world().resource::<DialogueSession>();
        assert!(session.is_open());
        assert_eq!(session.active().unwrap().npc_name, "Elara the Herbalist");
    }

    let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keys.clear();
    keys.press(KeyCode::Escape);
    app.update();

    assert!(!app.world().resource::<DialogueSession>().is_open());
}

// ─────────────────────────────────────────────────────────────────────────────
// Game effects: missions, dragon defeat, victory countdown
// ─────────────────────────────────────────────────────────────────────────────

fn build_effects_app() -> (App, Entity) {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);

    app.init_resource::<HudState>()
        .init_resource::<VictoryCountdown>()
        .add_message::<GameEffects>()
        .add_message::<MemoryReset>()
        .add_systems(Update, apply_game_effects);

    let dragon = app
        .world_mut()
        .spawn((
            Sprite::from_color(Color::WHITE, Vec2::splat(44.0)),
            Transform::from_scale(Vec3::splat(1.3)),
            Identity::new(NpcId::DRAGON, "Ignis the Dread"),
            Hostile,
        ))
        .id();
    (app, dragon)
}

#[test]
fn dragon_defeat_triggers_exactly_once() {
    let (mut app, dragon) = build_effects_app();

    app.world_mut().write_message(GameEffects {
        inventory: None,
        missions_completed: vec!["dragon_quest".to_string()],
        game_complete: false,
    });
    app.update();

    assert!(app.world().entity(dragon).get::<DragonDefeat>().is_some());
    assert!(app.world().resource::<HudState>().dragon_defeated);

    // Remove the marker; a repeated report must not re-trigger it.
    app.world_mut().entity_mut(dragon).remove::<DragonDefeat>();
    app.world_mut().write_message(GameEffects {
        inventory: None,
        missions_completed: vec!["dragon_quest".to_string()],
        game_complete: false,
    });
    app.update();

    assert!(app.world().entity(dragon).get::<DragonDefeat>().is_none());
}

#[test]
fn game_complete_arms_the_victory_countdown() {
    let (mut app, _dragon) = build_effects_app();

    app.world_mut().write_message(GameEffects {
        inventory: Some(vec!["sword_of_dawn".to_string(), "healing_potion".to_string()]),
        missions_completed: vec!["dragon_quest".to_string()],
        game_complete: true,
    });
    app.update();

    let hud = app.world().resource::<HudState>();
    assert!(hud.game_complete);
    assert_eq!(hud.inventory.len(), 2);
    assert_eq!(hud.missions, vec!["dragon_quest".to_string()]);

    let victory = app.world().resource::<VictoryCountdown>();
    assert!(victory.timer.is_some(), "banner countdown should be armed");
}
