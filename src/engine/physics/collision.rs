use glam::Vec2;
use rapier2d::prelude::*;
use std::sync::{Arc, Mutex};

use crate::core::math::from_rapier;

/// Collision groups for filtering what objects can collide with each other
///
/// Ground is also the layer the player's foot probe tests against, so anything
/// the player should be able to stand on belongs here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// Default group - interacts with everything
    Default = 0b0000_0001,

    /// The player character
    Player = 0b0000_0010,

    /// Enemies (ground patrols, flyers)
    Enemy = 0b0000_0100,

    /// Static platforms and floors
    Ground = 0b0000_1000,
}

impl CollisionGroups {
    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self as u32);

        let filter = match self {
            // Player touches the level and enemies
            CollisionGroups::Player => Group::from_bits_truncate(
                CollisionGroups::Ground as u32 | CollisionGroups::Enemy as u32,
            ),

            // Enemies pass through each other
            CollisionGroups::Enemy => Group::from_bits_truncate(
                CollisionGroups::Player as u32 | CollisionGroups::Ground as u32,
            ),

            CollisionGroups::Ground => Group::from_bits_truncate(
                CollisionGroups::Player as u32
                    | CollisionGroups::Enemy as u32
                    | CollisionGroups::Ground as u32,
            ),

            CollisionGroups::Default => Group::ALL,
        };

        InteractionGroups::new(memberships, filter)
    }

    /// Query groups that only match colliders of this group
    pub fn query_only(self) -> InteractionGroups {
        InteractionGroups::new(Group::ALL, Group::from_bits_truncate(self as u32))
    }
}

/// Custom collision event for game logic
#[derive(Debug, Clone, Copy)]
pub enum CollisionEvent {
    /// Two colliders started touching.
    ///
    /// `normal` is the first touching manifold's normal, pointing from
    /// `collider1` toward `collider2`. Pairs without contact points carry no normal.
    Started {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
        normal: Option<Vec2>,
    },

    /// Two colliders stopped touching
    Stopped {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
    },
}

/// Queue for storing collision events during physics step
pub struct CollisionEventQueue {
    events: Arc<Mutex<Vec<CollisionEvent>>>,
}

impl CollisionEventQueue {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::with_capacity(32))),
        }
    }

    /// Clear all events (call at start of physics step)
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    /// Get all collision events from this step
    pub fn events(&self) -> Vec<CollisionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: CollisionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for CollisionEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Normal of the first manifold with contact points, oriented from `first`
/// toward the other collider
fn first_contact_normal(pair: &ContactPair, first: ColliderHandle) -> Option<Vec2> {
    let manifold = pair.manifolds.iter().find(|m| !m.points.is_empty())?;
    let normal = from_rapier(&manifold.data.normal);
    if pair.collider1 == first {
        Some(normal)
    } else {
        Some(-normal)
    }
}

impl EventHandler for CollisionEventQueue {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: rapier2d::prelude::CollisionEvent,
        contact_pair: Option<&ContactPair>,
    ) {
        match event {
            rapier2d::prelude::CollisionEvent::Started(h1, h2, _flags) => {
                self.push(CollisionEvent::Started {
                    collider1: h1,
                    collider2: h2,
                    normal: contact_pair.and_then(|pair| first_contact_normal(pair, h1)),
                });
            }
            rapier2d::prelude::CollisionEvent::Stopped(h1, h2, _flags) => {
                self.push(CollisionEvent::Stopped {
                    collider1: h1,
                    collider2: h2,
                });
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}
