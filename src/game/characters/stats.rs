// Per-instance tuning for characters
//
// Every entity is created with a fixed set of parameters. The consts below are
// the stock tuning; levels adjust individual values with the `with_*` helpers.

use glam::Vec2;

/// Invalid per-instance configuration, reported at spawn time
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_health must be positive, got {0}")]
    NonPositiveHealth(i32),

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value < 0.0 || value.is_nan() {
        Err(ConfigError::Negative { name, value })
    } else {
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

/// Stats every character has
#[derive(Debug, Clone)]
pub struct CharacterStats {
    /// Horizontal speed (units/second)
    pub move_speed: f32,
    /// Starting and maximum health
    pub max_health: i32,
    /// Sprite art is drawn facing left
    pub faces_left_by_default: bool,
    /// Collider width in world units
    pub width: f32,
    /// Collider height in world units
    pub height: f32,
}

pub const BASE_CHARACTER: CharacterStats = CharacterStats {
    move_speed: 5.0,
    max_health: 3,
    faces_left_by_default: false,
    width: 1.0,
    height: 1.0,
};

impl Default for CharacterStats {
    fn default() -> Self {
        BASE_CHARACTER
    }
}

impl CharacterStats {
    pub fn with_move_speed(mut self, move_speed: f32) -> Self {
        self.move_speed = move_speed;
        self
    }

    pub fn with_max_health(mut self, max_health: i32) -> Self {
        self.max_health = max_health;
        self
    }

    pub fn facing_left_by_default(mut self) -> Self {
        self.faces_left_by_default = true;
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_health <= 0 {
            return Err(ConfigError::NonPositiveHealth(self.max_health));
        }
        non_negative("move_speed", self.move_speed)?;
        positive("width", self.width)?;
        positive("height", self.height)
    }
}

/// Player-only tuning: jump, hit reaction and the staged death
#[derive(Debug, Clone)]
pub struct PlayerStats {
    /// Vertical speed set on jump
    pub jump_force: f32,
    /// Horizontal and vertical impulse of the hurt pop
    pub knockback_force: f32,
    /// Radius of the foot probe used for the grounded check
    pub ground_check_radius: f32,
    /// Seconds of input lock after a hit
    pub hurt_stun_time: f32,
    /// Seconds of flickering invulnerability after the stun ends
    pub iframe_duration: f32,
    /// Seconds between sprite visibility toggles while flickering
    pub flash_interval: f32,
    /// Seconds frozen in the death pose
    pub death_freeze_time: f32,
    /// Seconds of the death fall before removal
    pub death_fall_time: f32,
    /// Gravity scale during the death fall
    pub death_gravity_scale: f32,
    /// Upward speed at the start of the death fall
    pub death_pop_velocity: f32,
}

pub const BASE_PLAYER: PlayerStats = PlayerStats {
    jump_force: 12.0,
    knockback_force: 7.0,
    ground_check_radius: 0.2,
    hurt_stun_time: 0.3,
    iframe_duration: 1.5,
    flash_interval: 0.1,
    death_freeze_time: 0.5,
    death_fall_time: 3.0,
    death_gravity_scale: 3.0,
    death_pop_velocity: 10.0,
};

impl Default for PlayerStats {
    fn default() -> Self {
        BASE_PLAYER
    }
}

impl PlayerStats {
    pub fn with_jump_force(mut self, jump_force: f32) -> Self {
        self.jump_force = jump_force;
        self
    }

    /// Total time after a non-lethal hit during which damage is ignored
    pub fn invulnerability_window(&self) -> f32 {
        self.hurt_stun_time + self.iframe_duration
    }

    /// Time from death to removal
    pub fn death_sequence_length(&self) -> f32 {
        self.death_freeze_time + self.death_fall_time
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("jump_force", self.jump_force)?;
        non_negative("knockback_force", self.knockback_force)?;
        positive("ground_check_radius", self.ground_check_radius)?;
        non_negative("hurt_stun_time", self.hurt_stun_time)?;
        non_negative("iframe_duration", self.iframe_duration)?;
        positive("flash_interval", self.flash_interval)?;
        non_negative("death_freeze_time", self.death_freeze_time)?;
        non_negative("death_fall_time", self.death_fall_time)?;
        non_negative("death_gravity_scale", self.death_gravity_scale)
    }
}

/// Tuning shared by every enemy kind
#[derive(Debug, Clone)]
pub struct EnemyStats {
    /// Damage dealt to the player on a side or bottom hit
    pub contact_damage: i32,
    /// Vertical speed given to the player after a stomp
    pub stomp_bounce_force: f32,
    /// Seconds between death and removal, so the death effect can play
    pub removal_delay: f32,
}

pub const BASE_ENEMY: EnemyStats = EnemyStats {
    contact_damage: 1,
    stomp_bounce_force: 12.0,
    removal_delay: 0.5,
};

impl Default for EnemyStats {
    fn default() -> Self {
        BASE_ENEMY
    }
}

impl EnemyStats {
    pub fn with_contact_damage(mut self, contact_damage: i32) -> Self {
        self.contact_damage = contact_damage;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("contact_damage", self.contact_damage as f32)?;
        non_negative("stomp_bounce_force", self.stomp_bounce_force)?;
        non_negative("removal_delay", self.removal_delay)
    }
}

/// Patrol segment for a ground enemy. Missing boundaries leave it standing still.
#[derive(Debug, Clone)]
pub struct PatrolConfig {
    pub left_boundary: Option<Vec2>,
    pub right_boundary: Option<Vec2>,
    pub starts_moving_left: bool,
}

impl PatrolConfig {
    pub fn between(left: Vec2, right: Vec2) -> Self {
        Self {
            left_boundary: Some(left),
            right_boundary: Some(right),
            starts_moving_left: true,
        }
    }

    pub fn starting_right(mut self) -> Self {
        self.starts_moving_left = false;
        self
    }
}

/// Waypoint pair for a flying enemy. Missing points leave it hovering in place.
#[derive(Debug, Clone)]
pub struct FlightConfig {
    pub point_a: Option<Vec2>,
    pub point_b: Option<Vec2>,
    /// Distance below which the current waypoint counts as reached
    pub arrival_threshold: f32,
}

impl FlightConfig {
    pub fn between(point_a: Vec2, point_b: Vec2) -> Self {
        Self {
            point_a: Some(point_a),
            point_b: Some(point_b),
            arrival_threshold: 0.5,
        }
    }

    pub fn with_arrival_threshold(mut self, threshold: f32) -> Self {
        self.arrival_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("arrival_threshold", self.arrival_threshold)
    }
}
