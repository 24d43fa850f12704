// In-memory physics host for gameplay tests
//
// Bodies are points with unit mass. `step` integrates velocity (and optional
// gravity) for simulated bodies; the ground is a flat plane at `ground_level`.

use std::collections::HashMap;

use glam::Vec2;
use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

use super::host::{BodyRef, PhysicsHost};

#[derive(Debug, Clone)]
pub struct MockBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub simulated: bool,
    pub collider_enabled: bool,
    pub gravity_scale: f32,
    /// Every impulse applied, in order
    pub impulses: Vec<Vec2>,
}

#[derive(Debug, Default)]
pub struct MockHost {
    bodies: HashMap<BodyRef, MockBody>,
    next_index: u32,
    /// Top of the floor plane, `None` for no ground at all
    pub ground_level: Option<f32>,
    /// Downward acceleration applied by `step`, scaled per body
    pub gravity: f32,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_body(&mut self, position: Vec2) -> BodyRef {
        let index = self.next_index;
        self.next_index += 1;
        let body = BodyRef::new(
            RigidBodyHandle::from_raw_parts(index, 0),
            ColliderHandle::from_raw_parts(index, 0),
        );
        self.bodies.insert(
            body,
            MockBody {
                position,
                velocity: Vec2::ZERO,
                simulated: true,
                collider_enabled: true,
                gravity_scale: 1.0,
                impulses: Vec::new(),
            },
        );
        body
    }

    pub fn contains(&self, body: BodyRef) -> bool {
        self.bodies.contains_key(&body)
    }

    pub fn body(&self, body: BodyRef) -> &MockBody {
        &self.bodies[&body]
    }

    pub fn body_mut(&mut self, body: BodyRef) -> &mut MockBody {
        self.bodies.get_mut(&body).expect("unknown body")
    }

    /// Advance every simulated body by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        let gravity = self.gravity;
        for body in self.bodies.values_mut().filter(|b| b.simulated) {
            body.velocity.y -= gravity * body.gravity_scale * dt;
            body.position += body.velocity * dt;
        }
    }
}

impl PhysicsHost for MockHost {
    fn position(&self, body: BodyRef) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.position)
    }

    fn velocity(&self, body: BodyRef) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.velocity)
    }

    fn set_velocity(&mut self, body: BodyRef, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.velocity = velocity;
        }
    }

    fn apply_impulse(&mut self, body: BodyRef, impulse: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.velocity += impulse;
            b.impulses.push(impulse);
        }
    }

    fn set_simulated(&mut self, body: BodyRef, simulated: bool) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.simulated = simulated;
        }
    }

    fn set_gravity_scale(&mut self, body: BodyRef, scale: f32) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.gravity_scale = scale;
        }
    }

    fn set_collider_enabled(&mut self, body: BodyRef, enabled: bool) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.collider_enabled = enabled;
        }
    }

    fn overlaps_ground(&self, center: Vec2, radius: f32, _exclude: BodyRef) -> bool {
        self.ground_level
            .is_some_and(|ground| center.y - radius <= ground)
    }

    fn despawn(&mut self, body: BodyRef) {
        self.bodies.remove(&body);
    }
}
