use std::time::Duration;

use anyhow::Result;
use glam::Vec2;
use log::{debug, info};

mod core;
mod engine;
mod game;

use engine::game_loop::GameLoop;
use engine::input::{Action, PlayerInput};
use engine::physics::{presets, CollisionEvent, PhysicsWorld};
use game::characters::animation::AnimationClip;
use game::characters::{
    flying, patrol, CharacterStats, ContactOutcome, EnemyStats, EntityKind, EntityManager,
    FlightConfig, PatrolConfig, PlayerStats,
};

/// Length of the scripted run in simulated seconds
const DEMO_LENGTH: f32 = 8.0;

/// Frame length the demo is driven at
const FRAME_TIME: Duration = Duration::from_micros(16_667);

/// Frames during which the demo sits paused, to show the clock holding still
const PAUSED_FRAMES: std::ops::Range<u64> = 240..270;

/// Keys held or tapped at simulation time `t`
fn scripted_input(input: &mut PlayerInput, t: f32) {
    if t < 3.0 {
        input.press(Action::MoveRight);
    } else {
        input.release(Action::MoveRight);
    }

    if (5.0..6.0).contains(&t) {
        input.press(Action::MoveLeft);
    } else {
        input.release(Action::MoveLeft);
    }

    // Half-speed walk on the analog stick
    if (6.5..7.5).contains(&t) {
        input.set_axis(Some(Vec2::new(0.5, 0.0)));
    } else {
        input.set_axis(None);
    }

    // Tap jump for a single frame at a few points
    let tap = [1.2, 2.1, 5.5].iter().any(|at| (t - at).abs() < 0.01);
    if tap {
        input.press(Action::Jump);
    } else {
        input.release(Action::Jump);
    }
}

/// Build a small level: one long platform, the player, a walker and a flyer
fn build_level(world: &mut PhysicsWorld, manager: &mut EntityManager) -> Result<()> {
    world.spawn(
        presets::platform_body(0.0, -0.5),
        presets::platform_collider(40.0, 1.0),
    );

    let player_stats = CharacterStats::default().with_size(1.0, 2.0);
    let body = world.spawn(
        presets::player_body(-6.0, 1.0),
        presets::player_collider(player_stats.width, player_stats.height),
    );
    let id = manager.spawn_player(
        "hero",
        body,
        player_stats,
        PlayerStats::default().with_jump_force(13.0),
    )?;
    world.set_entity_mapping(body, id);

    let walker_stats = CharacterStats::default()
        .with_move_speed(2.0)
        .with_max_health(1);
    let body = world.spawn(
        presets::ground_enemy_body(2.0, 0.5),
        presets::enemy_collider(walker_stats.width, walker_stats.height),
    );
    let id = manager.spawn_ground_enemy(
        "walker",
        body,
        walker_stats,
        EnemyStats::default(),
        PatrolConfig::between(Vec2::new(-1.0, 0.5), Vec2::new(5.0, 0.5)).starting_right(),
    )?;
    world.set_entity_mapping(body, id);

    let flyer_stats = CharacterStats::default()
        .with_move_speed(3.0)
        .facing_left_by_default();
    let body = world.spawn(
        presets::flying_enemy_body(6.0, 3.0),
        presets::enemy_collider(flyer_stats.width, flyer_stats.height),
    );
    let id = manager.spawn_flying_enemy(
        world,
        "bat",
        body,
        flyer_stats,
        EnemyStats::default().with_contact_damage(2),
        FlightConfig::between(Vec2::new(6.0, 3.0), Vec2::new(12.0, 3.0))
            .with_arrival_threshold(0.25),
    )?;
    world.set_entity_mapping(body, id);

    Ok(())
}

/// Frame tables of the demo sprite sheets
fn sprite_sheet(kind: EntityKind) -> Vec<AnimationClip> {
    match kind {
        EntityKind::Player => vec![
            AnimationClip::looping("idle", 4, 8.0),
            AnimationClip::looping("run", 6, 12.0),
            AnimationClip::looping("jump", 1, 10.0),
            AnimationClip::looping("fall", 1, 10.0),
            AnimationClip::one_shot("hurt", 2, 10.0),
            AnimationClip::looping("dead", 1, 10.0),
        ],
        EntityKind::GroundEnemy | EntityKind::FlyingEnemy => vec![
            AnimationClip::looping("move", 4, 8.0),
            AnimationClip::one_shot("death", 5, 10.0),
        ],
    }
}

/// Hand every entity's animator the frames for its clips
fn load_sprite_sheets(manager: &mut EntityManager) {
    let entities: Vec<_> = manager.all().iter().map(|e| (e.id, e.kind())).collect();
    for (id, kind) in entities {
        let Some(entity) = manager.get_mut(id) else {
            continue;
        };
        for clip in sprite_sheet(kind) {
            entity.animator.add_clip(clip);
        }
    }
}

/// Route contact-start events from the last physics step to the entities involved
fn dispatch_contacts(world: &mut PhysicsWorld, manager: &mut EntityManager, now: f32) {
    for event in world.collision_events() {
        match event {
            CollisionEvent::Started {
                collider1,
                collider2,
                normal: Some(normal),
            } => {
                let (Some(a), Some(b)) = (
                    world.entity_for_collider(collider1),
                    world.entity_for_collider(collider2),
                ) else {
                    continue;
                };
                let outcome = manager.handle_contact(world, a, b, normal, now);
                if outcome != ContactOutcome::Ignored {
                    info!("Contact {} <-> {}: {:?}", a, b, outcome);
                }
            }
            CollisionEvent::Started { normal: None, .. } => {}
            CollisionEvent::Stopped {
                collider1,
                collider2,
            } => {
                debug!("Contact ended: {:?} / {:?}", collider1, collider2);
            }
        }
    }
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Starting Rusted Platformer demo...");

    let mut world = PhysicsWorld::new();
    let mut manager = EntityManager::new();
    build_level(&mut world, &mut manager)?;
    load_sprite_sheets(&mut manager);
    info!("Level ready with {} entities", manager.count());

    let mut game_loop = GameLoop::new();
    let mut input = PlayerInput::new();

    while game_loop.sim_time() < DEMO_LENGTH {
        let frame = game_loop.frame_count();
        if frame == PAUSED_FRAMES.start || frame == PAUSED_FRAMES.end {
            game_loop.toggle_pause();
        }

        let steps = game_loop.advance(FRAME_TIME);
        if game_loop.is_paused() {
            continue;
        }
        let now = game_loop.sim_time();

        scripted_input(&mut input, now);
        manager.apply_player_input(&mut world, &input);

        // Physics cadence
        for _ in 0..steps {
            manager.fixed_update(&mut world, now);
            world.step();
            dispatch_contacts(&mut world, &mut manager, now);
        }

        // Frame cadence
        for id in manager.frame_update(&mut world, now, game_loop.frame_delta_time()) {
            info!("Entity {} left the level at {:.2}s", id, now);
        }
        for (id, trigger) in manager.drain_animation_triggers() {
            debug!("Entity {} animation trigger '{}'", id, trigger);
        }

        input.update();
    }

    for entity in manager.all() {
        info!(
            "  {} ({:?}): health {}, clip '{}'{}",
            entity.name,
            entity.kind(),
            entity.health(),
            entity.animator.current_clip(),
            if entity.is_dead() { ", dead" } else { "" }
        );
        if let Some((left, right)) = patrol::patrol_segment(entity) {
            info!("    patrols {:?} .. {:?}", left, right);
        }
        if let Some(target) = flying::current_target(entity) {
            info!("    flying toward {:?}", target);
        }
    }
    match manager.player() {
        Some(player) => info!(
            "Demo finished: player health {}/{}, {} of {} entities alive",
            player.health(),
            player.character.max_health(),
            manager.alive_count(),
            manager.count()
        ),
        None => info!("Demo finished: player removed, {} entities left", manager.count()),
    }
    info!(
        "{} frames at {:.0} fps, {} physics steps of {:.4}s under gravity {:.2}, {} bodies",
        game_loop.frame_count(),
        game_loop.fps(),
        game_loop.update_count(),
        world.timestep(),
        world.gravity().y,
        world.body_count()
    );

    Ok(())
}
