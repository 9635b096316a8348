use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::traits::Controls;

/// Keep the polar angle off the poles so `up` never aligns with the view direction
const POLAR_EPSILON: f32 = 1e-3;

/// Orbit camera controls: rotate around the target, dolly in/out, pan the target.
///
/// Input is accumulated between ticks and applied in one go by [`Controls::update`].
#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Radians per pixel of drag
    pub rotate_speed: f32,
    /// Distance factor per wheel step
    pub zoom_factor: f32,
    /// World units per pixel of drag, per unit of camera distance
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    rotate: Vec2,
    pan: Vec2,
    zoom: f32,
}

impl OrbitControls {
    pub fn new() -> Self {
        Self {
            rotate_speed: 0.005,
            zoom_factor: 0.95,
            pan_speed: 0.001,
            min_distance: 0.5,
            max_distance: 500.0,
            rotate: Vec2::ZERO,
            pan: Vec2::ZERO,
            zoom: 0.0,
        }
    }

    /// Queue an orbit drag in pixels
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.rotate += Vec2::new(dx, dy);
    }

    /// Queue a pan drag in pixels
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pan += Vec2::new(dx, dy);
    }

    /// Queue wheel steps; positive moves closer
    pub fn zoom(&mut self, steps: f32) {
        self.zoom += steps;
    }

    pub fn has_pending_input(&self) -> bool {
        self.rotate != Vec2::ZERO || self.pan != Vec2::ZERO || self.zoom != 0.0
    }

    fn clear(&mut self) {
        self.rotate = Vec2::ZERO;
        self.pan = Vec2::ZERO;
        self.zoom = 0.0;
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}

impl Controls for OrbitControls {
    fn update(&mut self, camera: &mut Camera) {
        if !self.has_pending_input() {
            return;
        }

        let offset = camera.position - camera.target;
        let radius = offset.length().max(f32::EPSILON);
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        theta -= self.rotate.x * self.rotate_speed;
        phi = (phi - self.rotate.y * self.rotate_speed).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        let radius = (radius * self.zoom_factor.powf(self.zoom))
            .clamp(self.min_distance, self.max_distance);

        if self.pan != Vec2::ZERO {
            let forward = camera.forward();
            let right = forward.cross(camera.up).normalize_or_zero();
            let up = right.cross(forward).normalize_or_zero();
            let scale = self.pan_speed * radius;
            camera.target += (-self.pan.x * right + self.pan.y * up) * scale;
        }

        camera.position = camera.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );

        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        let mut camera = Camera::default();
        camera.position = Vec3::new(0.0, 0.0, 5.0);
        camera.look_at(Vec3::ZERO);
        camera
    }

    #[test]
    fn test_idle_update_leaves_camera() {
        let mut controls = OrbitControls::new();
        let mut cam = camera();
        controls.update(&mut cam);
        assert_eq!(cam, camera());
    }

    #[test]
    fn test_rotate_keeps_distance() {
        let mut controls = OrbitControls::new();
        let mut cam = camera();
        controls.rotate(120.0, -40.0);
        controls.update(&mut cam);

        assert!((cam.position.length() - 5.0).abs() < 1e-4);
        assert!(cam.position.x.abs() > 0.1);
        assert_eq!(cam.target, Vec3::ZERO);
        assert!(!controls.has_pending_input());
    }

    #[test]
    fn test_zoom_moves_closer() {
        let mut controls = OrbitControls::new();
        let mut cam = camera();
        controls.zoom(2.0);
        controls.update(&mut cam);

        let expected = 5.0 * 0.95f32.powi(2);
        assert!((cam.position.length() - expected).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut controls = OrbitControls::new();
        let mut cam = camera();
        controls.zoom(10_000.0);
        controls.update(&mut cam);
        assert!((cam.position.length() - controls.min_distance).abs() < 1e-4);
    }

    #[test]
    fn test_pan_moves_target_and_camera_together() {
        let mut controls = OrbitControls::new();
        let mut cam = camera();
        controls.pan(100.0, 0.0);
        controls.update(&mut cam);

        // Dragging right slides the view left
        assert!(cam.target.x < 0.0);
        assert!(((cam.position - cam.target).length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_polar_angle_clamped() {
        let mut controls = OrbitControls::new();
        let mut cam = camera();
        controls.rotate(0.0, 100_000.0);
        controls.update(&mut cam);

        assert!(cam.position.y < 5.0);
        assert!(cam.forward().cross(cam.up).length() > 0.0);
    }
}
