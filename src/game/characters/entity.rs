// Entity record and per-kind capability table
//
// Every character in the level is one flat `Entity`. What differs between the
// player and the enemy kinds lives in `KindState`, and the functions that move,
// damage and kill each kind are looked up in a static `Behavior` row.

use glam::Vec2;

use crate::game::host::{BodyRef, PhysicsHost};

use super::animation::Animator;
use super::character::{Character, DamageOutcome};
use super::sprite::SpriteState;
use super::state::{PatrolDirection, PlayerPhase, PlayerStateMachine, Waypoint};
use super::stats::{CharacterStats, EnemyStats, FlightConfig, PatrolConfig, PlayerStats};
use super::{enemy, flying, patrol, player};

/// Unique identifier for an entity
pub type EntityId = u32;

/// Kind tag used to select a `Behavior`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    GroundEnemy,
    FlyingEnemy,
}

impl EntityKind {
    pub fn is_enemy(&self) -> bool {
        matches!(self, Self::GroundEnemy | Self::FlyingEnemy)
    }
}

/// Player-only state
#[derive(Debug)]
pub struct PlayerData {
    pub stats: PlayerStats,
    pub machine: PlayerStateMachine,
    /// Last movement intent received from input
    pub move_input: Vec2,
    /// Result of the most recent foot probe
    pub grounded: bool,
}

/// Ground enemy patrol state
#[derive(Debug)]
pub struct PatrolData {
    pub left_boundary: Option<Vec2>,
    pub right_boundary: Option<Vec2>,
    pub direction: PatrolDirection,
}

impl PatrolData {
    /// Both boundaries, if the patrol is fully configured
    pub fn boundaries(&self) -> Option<(Vec2, Vec2)> {
        Some((self.left_boundary?, self.right_boundary?))
    }
}

/// Flying enemy waypoint state
#[derive(Debug)]
pub struct FlightData {
    pub point_a: Option<Vec2>,
    pub point_b: Option<Vec2>,
    pub target: Waypoint,
    pub arrival_threshold: f32,
}

impl FlightData {
    pub fn waypoint(&self, which: Waypoint) -> Option<Vec2> {
        match which {
            Waypoint::A => self.point_a,
            Waypoint::B => self.point_b,
        }
    }
}

#[derive(Debug)]
pub enum KindState {
    Player(PlayerData),
    GroundEnemy(PatrolData),
    FlyingEnemy(FlightData),
}

/// Per-kind gameplay functions
pub struct Behavior {
    /// Runs every rendered frame: timers, probes, animation parameters
    pub frame_update: fn(&mut Entity, &mut dyn PhysicsHost, f32, f32),
    /// Runs every physics step: velocity decisions
    pub fixed_update: fn(&mut Entity, &mut dyn PhysicsHost, f32),
    pub take_damage: fn(&mut Entity, &mut dyn PhysicsHost, i32, f32) -> DamageOutcome,
    pub die: fn(&mut Entity, &mut dyn PhysicsHost, f32),
}

static PLAYER_BEHAVIOR: Behavior = Behavior {
    frame_update: player::frame_update,
    fixed_update: player::fixed_update,
    take_damage: player::take_damage,
    die: player::die,
};

static GROUND_ENEMY_BEHAVIOR: Behavior = Behavior {
    frame_update: enemy::frame_update,
    fixed_update: patrol::fixed_update,
    take_damage: enemy::take_damage,
    die: enemy::die,
};

static FLYING_ENEMY_BEHAVIOR: Behavior = Behavior {
    frame_update: enemy::frame_update,
    fixed_update: flying::fixed_update,
    take_damage: enemy::take_damage,
    die: enemy::die,
};

/// Capability row for a kind
pub fn behavior(kind: EntityKind) -> &'static Behavior {
    match kind {
        EntityKind::Player => &PLAYER_BEHAVIOR,
        EntityKind::GroundEnemy => &GROUND_ENEMY_BEHAVIOR,
        EntityKind::FlyingEnemy => &FLYING_ENEMY_BEHAVIOR,
    }
}

/// A character in the level
#[derive(Debug)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub character: Character,
    /// Contact damage and stomp tuning; `None` for the player
    pub enemy: Option<EnemyStats>,
    pub state: KindState,
    pub body: BodyRef,
    pub animator: Animator,
    pub sprite: SpriteState,
    /// Simulation time after which the entity leaves the level
    pub removal_at: Option<f32>,
}

impl Entity {
    pub fn player(
        id: EntityId,
        name: &str,
        body: BodyRef,
        stats: CharacterStats,
        player_stats: PlayerStats,
    ) -> Self {
        Self::new(
            id,
            name,
            body,
            stats,
            None,
            KindState::Player(PlayerData {
                stats: player_stats,
                machine: PlayerStateMachine::new(),
                move_input: Vec2::ZERO,
                grounded: false,
            }),
            Animator::for_player(),
        )
    }

    pub fn ground_enemy(
        id: EntityId,
        name: &str,
        body: BodyRef,
        stats: CharacterStats,
        enemy_stats: EnemyStats,
        patrol: PatrolConfig,
    ) -> Self {
        let direction = if patrol.starts_moving_left {
            PatrolDirection::MovingLeft
        } else {
            PatrolDirection::MovingRight
        };
        Self::new(
            id,
            name,
            body,
            stats,
            Some(enemy_stats),
            KindState::GroundEnemy(PatrolData {
                left_boundary: patrol.left_boundary,
                right_boundary: patrol.right_boundary,
                direction,
            }),
            Animator::for_enemy(),
        )
    }

    pub fn flying_enemy(
        id: EntityId,
        name: &str,
        body: BodyRef,
        stats: CharacterStats,
        enemy_stats: EnemyStats,
        flight: FlightConfig,
    ) -> Self {
        Self::new(
            id,
            name,
            body,
            stats,
            Some(enemy_stats),
            KindState::FlyingEnemy(FlightData {
                point_a: flight.point_a,
                point_b: flight.point_b,
                target: Waypoint::B,
                arrival_threshold: flight.arrival_threshold,
            }),
            Animator::for_enemy(),
        )
    }

    fn new(
        id: EntityId,
        name: &str,
        body: BodyRef,
        stats: CharacterStats,
        enemy: Option<EnemyStats>,
        state: KindState,
        animator: Animator,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            character: Character::new(stats),
            enemy,
            state,
            body,
            animator,
            sprite: SpriteState::default(),
            removal_at: None,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self.state {
            KindState::Player(_) => EntityKind::Player,
            KindState::GroundEnemy(_) => EntityKind::GroundEnemy,
            KindState::FlyingEnemy(_) => EntityKind::FlyingEnemy,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.character.is_dead()
    }

    pub fn health(&self) -> i32 {
        self.character.health()
    }

    pub fn player_data(&self) -> Option<&PlayerData> {
        match &self.state {
            KindState::Player(data) => Some(data),
            _ => None,
        }
    }

    pub fn player_data_mut(&mut self) -> Option<&mut PlayerData> {
        match &mut self.state {
            KindState::Player(data) => Some(data),
            _ => None,
        }
    }

    /// Damage/death phase, for the player only
    pub fn player_phase(&self) -> Option<PlayerPhase> {
        self.player_data().map(|data| data.machine.phase())
    }

    pub fn is_due_for_removal(&self, now: f32) -> bool {
        self.removal_at.is_some_and(|at| now >= at)
    }

    pub fn frame_update(&mut self, host: &mut dyn PhysicsHost, now: f32, dt: f32) {
        (behavior(self.kind()).frame_update)(self, host, now, dt)
    }

    pub fn fixed_update(&mut self, host: &mut dyn PhysicsHost, now: f32) {
        (behavior(self.kind()).fixed_update)(self, host, now)
    }

    pub fn take_damage(
        &mut self,
        host: &mut dyn PhysicsHost,
        amount: i32,
        now: f32,
    ) -> DamageOutcome {
        (behavior(self.kind()).take_damage)(self, host, amount, now)
    }

    pub fn die(&mut self, host: &mut dyn PhysicsHost, now: f32) {
        (behavior(self.kind()).die)(self, host, now)
    }

    /// Mirror the character's facing onto the sprite
    pub(super) fn sync_sprite_facing(&mut self) {
        self.sprite.scale_x = self.character.facing_sign();
    }
}
