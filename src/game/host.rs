// Boundary between gameplay and the physics engine
//
// Entities never hold the physics world. They hold a `BodyRef` resolved once at
// spawn and ask the host to read or write their body through it.

use glam::Vec2;
use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

/// The rigid body and collider owned by one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyRef {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

impl BodyRef {
    pub fn new(body: RigidBodyHandle, collider: ColliderHandle) -> Self {
        Self { body, collider }
    }
}

/// Everything gameplay needs from the physics simulation.
///
/// Reads return `None` and writes are ignored once a body has been removed.
pub trait PhysicsHost {
    fn position(&self, body: BodyRef) -> Option<Vec2>;

    fn velocity(&self, body: BodyRef) -> Option<Vec2>;

    fn set_velocity(&mut self, body: BodyRef, velocity: Vec2);

    /// Apply an instantaneous change in momentum
    fn apply_impulse(&mut self, body: BodyRef, impulse: Vec2);

    /// Turn simulation of the body on or off entirely
    fn set_simulated(&mut self, body: BodyRef, simulated: bool);

    fn set_gravity_scale(&mut self, body: BodyRef, scale: f32);

    /// Enable or disable the collider's collision response
    fn set_collider_enabled(&mut self, body: BodyRef, enabled: bool);

    /// Does a circle at `center` touch any ground-layer collider (other than `exclude`)?
    fn overlaps_ground(&self, center: Vec2, radius: f32, exclude: BodyRef) -> bool;

    /// Remove the body and its collider from the simulation
    fn despawn(&mut self, body: BodyRef);

    /// Overwrite only the vertical component of the velocity
    fn set_vertical_velocity(&mut self, body: BodyRef, vy: f32) {
        if let Some(v) = self.velocity(body) {
            self.set_velocity(body, Vec2::new(v.x, vy));
        }
    }

    /// Overwrite only the horizontal component of the velocity
    fn set_horizontal_velocity(&mut self, body: BodyRef, vx: f32) {
        if let Some(v) = self.velocity(body) {
            self.set_velocity(body, Vec2::new(vx, v.y));
        }
    }
}
