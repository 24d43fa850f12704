// Flying enemy: shuttle between two waypoints, ignoring gravity

use glam::Vec2;

use crate::core::math::direction_to;
use crate::game::host::PhysicsHost;

use super::entity::{Entity, KindState};

pub fn fixed_update(entity: &mut Entity, host: &mut dyn PhysicsHost, _now: f32) {
    if entity.is_dead() {
        return;
    }
    let speed = entity.character.move_speed();
    let body = entity.body;
    let KindState::FlyingEnemy(flight) = &mut entity.state else {
        return;
    };

    let (Some(_), Some(_)) = (flight.point_a, flight.point_b) else {
        // Hover in place until both waypoints exist
        host.set_velocity(body, Vec2::ZERO);
        return;
    };
    let Some(target) = flight.waypoint(flight.target) else {
        return;
    };
    let Some(position) = host.position(body) else {
        return;
    };

    let velocity = direction_to(position, target) * speed;
    host.set_velocity(body, velocity);

    if position.distance(target) < flight.arrival_threshold {
        flight.target = flight.target.other();
    }

    entity.character.flip_sprite(velocity.x);
}

/// Waypoint the enemy is currently flying toward
pub fn current_target(entity: &Entity) -> Option<Vec2> {
    match &entity.state {
        KindState::FlyingEnemy(flight) => flight.waypoint(flight.target),
        _ => None,
    }
}
