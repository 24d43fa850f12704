// Math utilities and helper functions

use glam::Vec2;
use rapier2d::na as nalgebra;
use rapier2d::prelude::{vector, Real, Vector};

/// Below this magnitude a horizontal velocity is treated as "not moving" for facing purposes
pub const FACING_DEADZONE: f32 = 0.1;

/// Sign of a value as -1.0 or 1.0, or `None` if it sits inside the deadzone
pub fn sign_outside_deadzone(value: f32, deadzone: f32) -> Option<f32> {
    if value.abs() > deadzone {
        Some(if value > 0.0 { 1.0 } else { -1.0 })
    } else {
        None
    }
}

/// Unit vector from `from` toward `to`, or zero when the points coincide
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Convert a glam vector into rapier's vector type
pub fn to_rapier(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

/// Convert a rapier vector into a glam vector
pub fn from_rapier(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sign_outside_deadzone() {
        assert_eq!(sign_outside_deadzone(3.0, 0.1), Some(1.0));
        assert_eq!(sign_outside_deadzone(-0.5, 0.1), Some(-1.0));
        assert_eq!(sign_outside_deadzone(0.05, 0.1), None);
        assert_eq!(sign_outside_deadzone(-0.1, 0.1), None);
    }

    #[test]
    fn test_direction_to() {
        let dir = direction_to(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0));
        assert_relative_eq!(dir.x, 0.6);
        assert_relative_eq!(dir.y, 0.8);

        let same = direction_to(Vec2::new(2.0, 2.0), Vec2::new(2.0, 2.0));
        assert_eq!(same, Vec2::ZERO);
    }

    #[test]
    fn test_rapier_conversion() {
        let v = Vec2::new(1.5, -2.0);
        assert_eq!(from_rapier(&to_rapier(v)), v);
    }
}
