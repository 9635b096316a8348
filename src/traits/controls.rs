use crate::camera::Camera;

/// Camera controls - turns accumulated pointer/wheel input into camera motion
pub trait Controls {
    /// Apply all input received since the previous call to `camera`
    fn update(&mut self, camera: &mut Camera);
}
