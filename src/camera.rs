use glam::{Mat4, Vec3};

use crate::types::CameraUniform;

pub const DEFAULT_FOV_DEGREES: f32 = 75.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 1000.0;

/// Perspective camera looking at a target point
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            fov_y,
            aspect,
            near,
            far,
        }
    }

    /// Aspect ratio for a surface, falling back to 1 for degenerate sizes
    pub fn aspect_for(width: u32, height: u32) -> f32 {
        if width == 0 || height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = Self::aspect_for(width, height);
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection().to_cols_array_2d(),
            position: self.position.to_array(),
            _pad: 0.0,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(DEFAULT_FOV_DEGREES, 1.0, DEFAULT_NEAR, DEFAULT_FAR)
    }
}
