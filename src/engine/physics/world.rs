use glam::Vec2;
use rapier2d::parry::shape::Ball;
use rapier2d::prelude::*;
use std::collections::HashMap;

use super::collision::{
    CollisionEvent as GameCollisionEvent, CollisionEventQueue, CollisionGroups,
};
use crate::core::math::{from_rapier, to_rapier};
use crate::game::host::{BodyRef, PhysicsHost};

/// Physics world that manages all physics simulation
pub struct PhysicsWorld {
    /// Gravity vector
    gravity: Vector<Real>,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,

    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,

    /// Query pipeline for overlap tests
    query_pipeline: QueryPipeline,

    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,

    /// Collision event handler
    collision_event_queue: CollisionEventQueue,

    /// Mapping from bodies to game entity IDs
    body_to_entity: HashMap<RigidBodyHandle, u32>,
}

impl PhysicsWorld {
    /// Create a new physics world with platformer gravity
    pub fn new() -> Self {
        Self::with_gravity(vector![0.0, -9.81 * 3.0])
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vector<Real>) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = crate::engine::game_loop::FIXED_TIMESTEP;

        Self {
            gravity,
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            collision_event_queue: CollisionEventQueue::new(),
            body_to_entity: HashMap::new(),
        }
    }

    /// Step the physics simulation forward by one timestep
    pub fn step(&mut self) {
        self.collision_event_queue.clear();

        let event_handler = &self.collision_event_queue;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            event_handler,
        );
    }

    /// Add a body with a single collider and return both handles
    pub fn spawn(&mut self, body: RigidBody, collider: Collider) -> BodyRef {
        let body_handle = self.rigid_body_set.insert(body);
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);
        BodyRef::new(body_handle, collider_handle)
    }

    /// Associate a game entity ID with a body
    pub fn set_entity_mapping(&mut self, body: BodyRef, entity_id: u32) {
        self.body_to_entity.insert(body.body, entity_id);
    }

    /// Get the entity that owns a collider, if any
    pub fn entity_for_collider(&self, collider: ColliderHandle) -> Option<u32> {
        let parent = self.collider_set.get(collider)?.parent()?;
        self.body_to_entity.get(&parent).copied()
    }

    /// Get a reference to a rigid body
    #[cfg(test)]
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a reference to a collider
    #[cfg(test)]
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Get all collision events from the last step
    pub fn collision_events(&self) -> Vec<GameCollisionEvent> {
        self.collision_event_queue.events()
    }

    /// Get current gravity
    pub fn gravity(&self) -> Vector<Real> {
        self.gravity
    }

    /// Get the current timestep
    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }

    /// Number of bodies still in the simulation
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsHost for PhysicsWorld {
    fn position(&self, body: BodyRef) -> Option<Vec2> {
        self.rigid_body_set
            .get(body.body)
            .map(|b| from_rapier(b.translation()))
    }

    fn velocity(&self, body: BodyRef) -> Option<Vec2> {
        self.rigid_body_set
            .get(body.body)
            .map(|b| from_rapier(b.linvel()))
    }

    fn set_velocity(&mut self, body: BodyRef, velocity: Vec2) {
        if let Some(b) = self.rigid_body_set.get_mut(body.body) {
            b.set_linvel(to_rapier(velocity), true);
        }
    }

    fn apply_impulse(&mut self, body: BodyRef, impulse: Vec2) {
        if let Some(b) = self.rigid_body_set.get_mut(body.body) {
            b.apply_impulse(to_rapier(impulse), true);
        }
    }

    fn set_simulated(&mut self, body: BodyRef, simulated: bool) {
        if let Some(b) = self.rigid_body_set.get_mut(body.body) {
            b.set_enabled(simulated);
        }
    }

    fn set_gravity_scale(&mut self, body: BodyRef, scale: f32) {
        if let Some(b) = self.rigid_body_set.get_mut(body.body) {
            b.set_gravity_scale(scale, true);
        }
    }

    fn set_collider_enabled(&mut self, body: BodyRef, enabled: bool) {
        if let Some(c) = self.collider_set.get_mut(body.collider) {
            c.set_enabled(enabled);
        }
    }

    fn overlaps_ground(&self, center: Vec2, radius: f32, exclude: BodyRef) -> bool {
        let shape = Ball::new(radius);
        let shape_pos = Isometry::translation(center.x, center.y);
        let filter = QueryFilter::default()
            .groups(CollisionGroups::Ground.query_only())
            .exclude_rigid_body(exclude.body);

        self.query_pipeline
            .intersection_with_shape(
                &self.rigid_body_set,
                &self.collider_set,
                &shape_pos,
                &shape,
                filter,
            )
            .is_some()
    }

    fn despawn(&mut self, body: BodyRef) {
        self.rigid_body_set.remove(
            body.body,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        );
        self.body_to_entity.remove(&body.body);
    }
}
