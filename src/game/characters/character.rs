// Character core shared by the player and every enemy

use crate::core::math::{sign_outside_deadzone, FACING_DEADZONE};

use super::stats::CharacterStats;

/// Result of subtracting damage from a character's health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Nothing happened (already dead, or currently invulnerable)
    Ignored,
    /// Health went down and is still above zero
    Survived,
    /// Health reached zero; the caller must run the death sequence
    Lethal,
}

/// Health, facing and the dead flag
#[derive(Debug, Clone)]
pub struct Character {
    stats: CharacterStats,
    health: i32,
    dead: bool,
    /// Horizontal sprite scale sign (+1 unflipped, -1 mirrored)
    facing_sign: f32,
}

impl Character {
    pub fn new(stats: CharacterStats) -> Self {
        Self {
            health: stats.max_health,
            stats,
            dead: false,
            facing_sign: 1.0,
        }
    }

    pub fn stats(&self) -> &CharacterStats {
        &self.stats
    }

    pub fn move_speed(&self) -> f32 {
        self.stats.move_speed
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.stats.max_health
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Subtract `amount` from health, clamped at zero.
    ///
    /// Dying happens at zero or below. Negative amounts are treated as zero.
    pub fn apply_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.dead {
            return DamageOutcome::Ignored;
        }

        self.health = (self.health - amount.max(0)).max(0);

        if self.health <= 0 {
            DamageOutcome::Lethal
        } else {
            DamageOutcome::Survived
        }
    }

    /// Set the dead flag. Returns false if the character was already dead.
    pub fn mark_dead(&mut self) -> bool {
        if self.dead {
            return false;
        }
        self.dead = true;
        true
    }

    /// Face the direction of travel. Near-zero velocities and dead characters keep their facing.
    pub fn flip_sprite(&mut self, horizontal_velocity: f32) {
        if self.dead {
            return;
        }

        if let Some(direction) = sign_outside_deadzone(horizontal_velocity, FACING_DEADZONE) {
            self.facing_sign = if self.stats.faces_left_by_default {
                -direction
            } else {
                direction
            };
        }
    }

    /// Horizontal scale sign for the sprite
    pub fn facing_sign(&self) -> f32 {
        self.facing_sign
    }

    /// World direction the character is looking toward (+1 right, -1 left)
    pub fn heading(&self) -> f32 {
        if self.stats.faces_left_by_default {
            -self.facing_sign
        } else {
            self.facing_sign
        }
    }
}
