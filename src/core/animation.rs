use std::f32::consts::TAU;

use crate::scene::Transform;

/// Rotation rate shared by every animated node, in radians per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub rate: f32,
}

impl AnimationState {
    pub fn new(rate: f32) -> Self {
        Self { rate }
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new(0.005)
    }
}

/// Advance orientation by `rate` about X and about Y, each wrapped to one full turn
pub fn step(transform: &mut Transform, rate: f32) {
    transform.rotation.x = wrap(transform.rotation.x + rate);
    transform.rotation.y = wrap(transform.rotation.y + rate);
}

fn wrap(angle: f32) -> f32 {
    angle.rem_euclid(TAU)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    /// Distance between two angles on the circle
    fn angle_diff(a: f32, b: f32) -> f32 {
        let d = (a - b).rem_euclid(TAU);
        d.min(TAU - d)
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let mut transform = Transform::default();
        transform.rotation = Vec3::new(0.3, 1.2, 0.7);
        let before = transform;

        for _ in 0..1000 {
            step(&mut transform, 0.0);
        }
        assert_eq!(transform, before);
    }

    #[test]
    fn test_steps_accumulate() {
        for &(n, r) in &[(1usize, 0.005f32), (100, 0.005), (37, 0.2), (500, 0.5)] {
            let mut stepped = Transform::default();
            for _ in 0..n {
                step(&mut stepped, r);
            }

            let mut once = Transform::default();
            step(&mut once, n as f32 * r);

            assert!(angle_diff(stepped.rotation.x, once.rotation.x) < 1e-3, "x n={} r={}", n, r);
            assert!(angle_diff(stepped.rotation.y, once.rotation.y) < 1e-3, "y n={} r={}", n, r);
        }
    }

    #[test]
    fn test_axes_independent() {
        let mut transform = Transform::default();
        transform.rotation = Vec3::new(1.0, 2.0, 0.5);
        step(&mut transform, 0.1);

        assert!((transform.rotation.x - 1.1).abs() < 1e-6);
        assert!((transform.rotation.y - 2.1).abs() < 1e-6);
        assert_eq!(transform.rotation.z, 0.5);
        assert_eq!(transform.position, Vec3::ZERO);
    }

    #[test]
    fn test_wraps_full_turn() {
        let mut transform = Transform::default();
        transform.rotation = Vec3::new(TAU - 0.05, TAU - 0.05, 0.0);
        step(&mut transform, 0.1);

        assert!((transform.rotation.x - 0.05).abs() < 1e-4);
        assert!(transform.rotation.x >= 0.0 && transform.rotation.x < TAU);
    }

    #[test]
    fn test_negative_rate_stays_in_turn() {
        let mut transform = Transform::default();
        step(&mut transform, -0.1);
        assert!((transform.rotation.y - (TAU - 0.1)).abs() < 1e-4);
    }
}
