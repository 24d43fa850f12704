// Physics system using rapier2d

pub mod body;
mod collision;
mod world;

pub use body::presets;
pub use collision::{CollisionEvent, CollisionGroups};
pub use world::PhysicsWorld;
