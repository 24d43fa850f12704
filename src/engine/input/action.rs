// Game action definitions

/// Represents all in-game actions a platformer player can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Jump,
}

impl Action {
    /// Unit contribution of this action to the movement intent vector
    pub fn direction(self) -> (f32, f32) {
        match self {
            Action::MoveLeft => (-1.0, 0.0),
            Action::MoveRight => (1.0, 0.0),
            Action::MoveUp => (0.0, 1.0),
            Action::MoveDown => (0.0, -1.0),
            Action::Jump => (0.0, 0.0),
        }
    }
}
