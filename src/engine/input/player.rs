// Per-player input state management

use super::action::Action;
use glam::Vec2;
use std::collections::HashSet;

/// Input state for the local player
#[derive(Debug, Default)]
pub struct PlayerInput {
    /// Actions that are currently pressed
    pressed: HashSet<Action>,

    /// Actions that went down this frame (rising edges)
    just_pressed: HashSet<Action>,

    /// Analog stick intent; replaces digital directions while set
    axis: Option<Vec2>,
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently pressed
    #[cfg(test)]
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Register an action press. Repeated presses without a release are not new edges.
    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register an action release
    pub fn release(&mut self, action: Action) {
        self.pressed.remove(&action);
    }

    /// Set (or clear) an analog movement vector, clamped to unit length
    pub fn set_axis(&mut self, axis: Option<Vec2>) {
        self.axis = axis.map(|v| v.clamp_length_max(1.0));
    }

    /// Update input state for a new frame.
    /// Call this once per frame after gameplay has read the input.
    pub fn update(&mut self) {
        self.just_pressed.clear();
    }

    /// Movement intent: horizontal and vertical in -1.0..=1.0
    pub fn move_intent(&self) -> Vec2 {
        if let Some(axis) = self.axis {
            return axis;
        }

        self.pressed.iter().fold(Vec2::ZERO, |acc, action| {
            let (x, y) = action.direction();
            acc + Vec2::new(x, y)
        })
    }

    /// Rising edge of the jump button
    pub fn jump_pressed(&self) -> bool {
        self.just_pressed(Action::Jump)
    }
}
