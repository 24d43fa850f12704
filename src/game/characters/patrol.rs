// Ground enemy: walk back and forth between two boundary markers

use glam::Vec2;

use crate::game::host::PhysicsHost;

use super::entity::{Entity, KindState, PatrolData};
use super::state::PatrolDirection;

pub fn fixed_update(entity: &mut Entity, host: &mut dyn PhysicsHost, _now: f32) {
    if entity.is_dead() {
        return;
    }
    let speed = entity.character.move_speed();
    let body = entity.body;
    let KindState::GroundEnemy(patrol) = &mut entity.state else {
        return;
    };

    let Some((left, right)) = patrol.boundaries() else {
        // Misconfigured patrol: stand still (warned about at spawn)
        host.set_horizontal_velocity(body, 0.0);
        return;
    };

    // Turn before moving so a step never starts past a boundary
    if let Some(position) = host.position(body) {
        check_boundaries(patrol, position, left, right);
    }

    // Vertical velocity is left to gravity
    let vx = patrol.direction.sign() * speed;
    host.set_horizontal_velocity(body, vx);

    entity.character.flip_sprite(vx);
}

fn check_boundaries(patrol: &mut PatrolData, position: Vec2, left: Vec2, right: Vec2) {
    match patrol.direction {
        PatrolDirection::MovingLeft if position.x <= left.x => {}
        PatrolDirection::MovingRight if position.x >= right.x => {}
        _ => return,
    }
    patrol.direction = patrol.direction.reversed();
}

/// Segment a debug overlay can draw for this patrol
pub fn patrol_segment(entity: &Entity) -> Option<(Vec2, Vec2)> {
    match &entity.state {
        KindState::GroundEnemy(patrol) => patrol.boundaries(),
        _ => None,
    }
}
