// Behavior shared by every enemy kind: contact resolution and death

use glam::Vec2;
use log::{debug, info};

use crate::game::host::PhysicsHost;

use super::animation::params;
use super::character::DamageOutcome;
use super::entity::{Entity, EntityKind};

/// A contact normal at or below this vertical component came down on the enemy's head
pub const STOMP_NORMAL_Y: f32 = -0.5;

/// What a player/enemy contact resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Player landed on top: enemy dies, player bounces
    Stomped,
    /// Side or bottom hit: the enemy's contact damage went to the player
    ContactDamage(DamageOutcome),
    /// Not a live player touching a live enemy
    Ignored,
}

/// Is this contact a stomp? `normal` points from the player into the enemy.
pub fn is_stomp(normal: Vec2) -> bool {
    normal.y <= STOMP_NORMAL_Y
}

/// Resolve a contact between an enemy and the player into exactly one outcome.
///
/// `normal` is the first contact normal, pointing from the player into the enemy.
pub fn resolve_contact(
    enemy: &mut Entity,
    player: &mut Entity,
    normal: Vec2,
    host: &mut dyn PhysicsHost,
    now: f32,
) -> ContactOutcome {
    if player.kind() != EntityKind::Player || enemy.is_dead() || player.is_dead() {
        return ContactOutcome::Ignored;
    }
    let Some(stats) = enemy.enemy.clone() else {
        return ContactOutcome::Ignored;
    };

    if is_stomp(normal) {
        host.set_vertical_velocity(player.body, stats.stomp_bounce_force);
        info!("{} stomped {}", player.name, enemy.name);
        enemy.die(host, now);
        ContactOutcome::Stomped
    } else {
        debug!(
            "{} hit {} for {}",
            enemy.name, player.name, stats.contact_damage
        );
        ContactOutcome::ContactDamage(player.take_damage(host, stats.contact_damage, now))
    }
}

pub fn frame_update(entity: &mut Entity, _host: &mut dyn PhysicsHost, _now: f32, dt: f32) {
    entity.sync_sprite_facing();
    entity.animator.update(dt);
}

/// Plain health subtraction; enemies have no invulnerability
pub fn take_damage(
    entity: &mut Entity,
    host: &mut dyn PhysicsHost,
    amount: i32,
    now: f32,
) -> DamageOutcome {
    let outcome = entity.character.apply_damage(amount);
    if outcome == DamageOutcome::Lethal {
        die(entity, host, now);
    }
    outcome
}

/// Play the death effect, take the body out of physics and schedule removal
pub fn die(entity: &mut Entity, host: &mut dyn PhysicsHost, now: f32) {
    if !entity.character.mark_dead() {
        return;
    }

    entity.animator.set_bool(params::IS_DEAD, true);
    entity.animator.set_trigger(params::DEATH);

    // The corpse must not be hit again
    host.set_simulated(entity.body, false);
    host.set_velocity(entity.body, Vec2::ZERO);
    host.set_collider_enabled(entity.body, false);

    let delay = entity
        .enemy
        .as_ref()
        .map_or(0.0, |stats| stats.removal_delay);
    entity.removal_at = Some(now + delay);

    info!("{} died", entity.name);
}
