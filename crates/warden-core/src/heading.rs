//! Heading math on the horizontal (XZ) plane
//!
//! Yaw follows the convention `yaw = atan2(z, x)`, so a yaw of zero faces +X
//! and `FRAC_PI_2` faces +Z.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Drop the vertical component of a vector
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Horizontal distance between two points
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    horizontal(b - a).length()
}

/// Yaw of a direction, or `None` when it has no horizontal extent
pub fn yaw_of(direction: Vec3) -> Option<f32> {
    let flat = horizontal(direction);
    if flat.length_squared() < 1e-8 {
        return None;
    }
    Some(flat.z.atan2(flat.x))
}

/// Unit forward vector for a yaw
pub fn forward(yaw: f32) -> Vec3 {
    Vec3::new(yaw.cos(), 0.0, yaw.sin())
}

/// Wrap an angle into `[-PI, PI)`
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Signed smallest rotation taking `from` to `to`
pub fn shortest_angle(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

/// Turn `yaw` toward `target` with exponential decay.
///
/// Each call closes `1 - exp(-rate * dt)` of the remaining angle, which makes
/// the result independent of how a fixed span of time is split into ticks.
pub fn turn_towards(yaw: f32, target: f32, rate: f32, dt: f32) -> f32 {
    if rate <= 0.0 || dt <= 0.0 {
        return yaw;
    }
    let blend = 1.0 - (-rate * dt).exp();
    wrap_angle(yaw + shortest_angle(yaw, target) * blend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_yaw_of_axes() {
        assert!((yaw_of(Vec3::X).unwrap()).abs() < 1e-6);
        assert!((yaw_of(Vec3::Z).unwrap() - FRAC_PI_2).abs() < 1e-6);
        assert!(yaw_of(Vec3::Y).is_none());
    }

    #[test]
    fn test_forward_matches_yaw() {
        let dir = Vec3::new(3.0, 5.0, -4.0);
        let yaw = yaw_of(dir).unwrap();
        let fwd = forward(yaw);
        let expected = horizontal(dir).normalize();
        assert!((fwd - expected).length() < 1e-5);
    }

    #[test]
    fn test_shortest_angle_wraps() {
        let d = shortest_angle(PI - 0.1, -PI + 0.1);
        assert!((d - 0.2).abs() < 1e-5);
        let d = shortest_angle(-PI + 0.1, PI - 0.1);
        assert!((d + 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_turn_towards_converges_without_overshoot() {
        let target = 1.0;
        let mut yaw = 0.0;
        let mut previous_gap = shortest_angle(yaw, target).abs();
        for _ in 0..200 {
            yaw = turn_towards(yaw, target, 3.0, 1.0 / 60.0);
            let gap = shortest_angle(yaw, target).abs();
            assert!(gap <= previous_gap);
            previous_gap = gap;
        }
        assert!(previous_gap < 0.01);
    }

    #[test]
    fn test_turn_towards_zero_rate_is_frozen() {
        assert_eq!(turn_towards(0.5, 2.0, 0.0, 0.1), 0.5);
    }

    #[test]
    fn test_horizontal_distance_ignores_height() {
        let d = horizontal_distance(Vec3::ZERO, Vec3::new(3.0, 100.0, 4.0));
        assert!((d - 5.0).abs() < 1e-5);
    }
}
