// Character system
//
// This module contains everything related to the characters in a level:
// - Character core (health, facing) and per-instance stats
// - Damage, death and patrol state machines
// - Animator parameters and sprite state
// - Player, enemy, patrol and flight behaviors
// - The entity record and its manager

pub mod animation;
pub mod character;
pub mod enemy;
pub mod entity;
pub mod flying;
pub mod manager;
pub mod patrol;
pub mod player;
pub mod sprite;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use character::DamageOutcome;
pub use enemy::ContactOutcome;
pub use entity::{Entity, EntityId, EntityKind};
pub use manager::EntityManager;
pub use state::{DeathStage, PlayerPhase};
pub use stats::{CharacterStats, ConfigError, EnemyStats, FlightConfig, PatrolConfig, PlayerStats};
