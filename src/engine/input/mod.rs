// Input handling
//
// Hosts translate their device events into `Action` presses and releases (or
// an analog stick vector) on a `PlayerInput`, then call `update()` once at the
// end of each frame. Gameplay reads the move intent vector and the jump edge.

pub mod action;
pub mod player;

pub use action::Action;
pub use player::PlayerInput;
