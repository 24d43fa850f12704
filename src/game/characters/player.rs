// Player behavior: run, jump, get hurt, die
//
// Frame cadence: advance the damage machine, probe for ground, push animation
// parameters. Physics cadence: apply the horizontal input. Jumps happen when
// the input layer reports a rising edge. Anything handed a `now` brings the
// damage machine up to that time before reading it.

use glam::Vec2;
use log::{debug, info};

use crate::game::host::PhysicsHost;

use super::animation::params;
use super::character::DamageOutcome;
use super::entity::{Entity, KindState};
use super::state::{DeathStage, PlayerPhase};

/// Point the foot probe is centered on
fn foot_position(entity: &Entity, center: Vec2) -> Vec2 {
    center - Vec2::new(0.0, entity.character.stats().height / 2.0)
}

pub fn frame_update(entity: &mut Entity, host: &mut dyn PhysicsHost, now: f32, dt: f32) {
    advance_sequences(entity, host, now);

    if !entity.is_dead() {
        check_environment(entity, host);
        update_animation_parameters(entity, host);
        let visible = entity
            .player_data()
            .map(|data| data.machine.flicker_visible(now, &data.stats));
        if let Some(visible) = visible {
            entity.sprite.visible = visible;
        }
        entity.sync_sprite_facing();
    }

    entity.animator.update(dt);
}

/// Run the transitions of the hurt or death sequence that are due
fn advance_sequences(entity: &mut Entity, host: &mut dyn PhysicsHost, now: f32) {
    let KindState::Player(data) = &mut entity.state else {
        return;
    };
    let entered = data.machine.update(now, &data.stats);
    let entered_at = data.machine.entered_at();
    let stats = data.stats.clone();

    for phase in entered {
        match phase {
            PlayerPhase::Flickering => {
                debug!("{} stun over", entity.name);
            }
            PlayerPhase::Normal => {
                entity.sprite.visible = true;
                debug!("{} no longer invulnerable", entity.name);
            }
            PlayerPhase::Dying(DeathStage::Falling) => {
                host.set_simulated(entity.body, true);
                host.set_collider_enabled(entity.body, false);
                host.set_gravity_scale(entity.body, stats.death_gravity_scale);
                host.set_velocity(entity.body, Vec2::new(0.0, stats.death_pop_velocity));
                info!("{} death leap", entity.name);
            }
            PlayerPhase::Removed => {
                entity.removal_at = Some(entered_at);
            }
            PlayerPhase::Hurt | PlayerPhase::Dying(DeathStage::Frozen) => {}
        }
    }
}

fn check_environment(entity: &mut Entity, host: &mut dyn PhysicsHost) {
    let Some(center) = host.position(entity.body) else {
        return;
    };
    let foot = foot_position(entity, center);
    let body = entity.body;

    if let KindState::Player(data) = &mut entity.state {
        data.grounded = host.overlaps_ground(foot, data.stats.ground_check_radius, body);
    }
}

fn update_animation_parameters(entity: &mut Entity, host: &mut dyn PhysicsHost) {
    let velocity = host.velocity(entity.body).unwrap_or(Vec2::ZERO);
    let grounded = entity.player_data().is_some_and(|d| d.grounded);

    entity
        .animator
        .set_float(params::HORIZONTAL_SPEED, velocity.x.abs());
    entity
        .animator
        .set_float(params::VERTICAL_VELOCITY, velocity.y);
    entity.animator.set_bool(params::IS_GROUNDED, grounded);
}

pub fn fixed_update(entity: &mut Entity, host: &mut dyn PhysicsHost, now: f32) {
    advance_sequences(entity, host, now);
    if entity.is_dead() {
        return;
    }
    let Some(data) = entity.player_data() else {
        return;
    };
    if !data.machine.phase().can_move() {
        return;
    }

    let input_x = data.move_input.x;
    host.set_horizontal_velocity(entity.body, input_x * entity.character.move_speed());
    entity.character.flip_sprite(input_x);
}

/// Record the latest movement intent. Ignored once dead.
pub fn set_move_input(entity: &mut Entity, input: Vec2) {
    if entity.is_dead() {
        return;
    }
    if let Some(data) = entity.player_data_mut() {
        data.move_input = input;
    }
}

/// Jump on a rising input edge if standing on ground. Returns true if the player jumped.
pub fn try_jump(entity: &mut Entity, host: &mut dyn PhysicsHost) -> bool {
    if entity.is_dead() {
        return false;
    }
    let Some(data) = entity.player_data() else {
        return false;
    };
    if !data.grounded {
        return false;
    }

    let jump_force = data.stats.jump_force;
    host.set_vertical_velocity(entity.body, jump_force);
    entity.animator.set_trigger(params::JUMP);
    true
}

pub fn take_damage(
    entity: &mut Entity,
    host: &mut dyn PhysicsHost,
    amount: i32,
    now: f32,
) -> DamageOutcome {
    advance_sequences(entity, host, now);
    let invulnerable = entity
        .player_phase()
        .is_some_and(|phase| phase.is_invulnerable());
    if entity.is_dead() || invulnerable {
        return DamageOutcome::Ignored;
    }

    let outcome = entity.character.apply_damage(amount);
    match outcome {
        DamageOutcome::Lethal => die(entity, host, now),
        DamageOutcome::Survived => start_hurt(entity, host, now),
        DamageOutcome::Ignored => {}
    }
    outcome
}

fn start_hurt(entity: &mut Entity, host: &mut dyn PhysicsHost, now: f32) {
    let heading = entity.character.heading();
    let KindState::Player(data) = &mut entity.state else {
        return;
    };
    data.machine.hurt(now);
    let force = data.stats.knockback_force;
    let window = data.stats.invulnerability_window();

    entity.animator.set_trigger(params::HURT);

    // Push away from where the player is looking; zero first so every hit pops the same
    host.set_velocity(entity.body, Vec2::ZERO);
    host.apply_impulse(entity.body, Vec2::new(-heading * force, force));

    debug!(
        "{} hurt, health {}/{}, invulnerable for {:.1}s",
        entity.name,
        entity.character.health(),
        entity.character.max_health(),
        window
    );
}

pub fn die(entity: &mut Entity, host: &mut dyn PhysicsHost, now: f32) {
    if !entity.character.mark_dead() {
        return;
    }

    let mut removal_in = 0.0;
    if let KindState::Player(data) = &mut entity.state {
        data.machine.die(now);
        data.move_input = Vec2::ZERO;
        removal_in = data.stats.death_sequence_length();
    }

    entity.sprite.bring_to_front();
    entity.sprite.visible = true;
    entity.animator.set_bool(params::IS_DEAD, true);
    entity.animator.set_trigger(params::HURT);

    host.set_velocity(entity.body, Vec2::ZERO);
    host.set_simulated(entity.body, false);

    info!("{} died, removal in {:.1}s", entity.name, removal_in);
}
