use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use crate::controls::OrbitControls;

/// Pixels of touchpad scroll treated as one wheel step
const PIXELS_PER_WHEEL_STEP: f32 = 50.0;

/// What a held pointer button does while dragging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
}

/// Adapter that bridges Winit pointer events to [`OrbitControls`]
#[derive(Debug, Clone, Default)]
pub struct PointerInput {
    /// Active drag, if a mapped button is held
    drag: Option<DragMode>,
    /// Last cursor position (relative to window)
    mouse_position: Option<(f32, f32)>,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a Winit WindowEvent, queueing any camera motion on `controls`
    pub fn process_event(&mut self, event: &WindowEvent, controls: &mut OrbitControls) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => self.on_button(*button, *state),
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor((position.x as f32, position.y as f32), controls)
            }
            WindowEvent::CursorLeft { .. } => {
                self.drag = None;
                self.mouse_position = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_WHEEL_STEP,
                };
                controls.zoom(steps);
            }
            _ => {}
        }
    }

    fn on_button(&mut self, button: MouseButton, state: ElementState) {
        let Some(mode) = Self::mouse_button_to_drag(button) else {
            return;
        };
        match state {
            ElementState::Pressed => self.drag = Some(mode),
            ElementState::Released if self.drag == Some(mode) => self.drag = None,
            ElementState::Released => {}
        }
    }

    fn on_cursor(&mut self, new_pos: (f32, f32), controls: &mut OrbitControls) {
        if let (Some(old_pos), Some(mode)) = (self.mouse_position, self.drag) {
            let (dx, dy) = (new_pos.0 - old_pos.0, new_pos.1 - old_pos.1);
            match mode {
                DragMode::Rotate => controls.rotate(dx, dy),
                DragMode::Pan => controls.pan(dx, dy),
            }
        }
        self.mouse_position = Some(new_pos);
    }

    pub fn drag(&self) -> Option<DragMode> {
        self.drag
    }

    pub fn mouse_position(&self) -> Option<(f32, f32)> {
        self.mouse_position
    }

    /// Map Winit MouseButton to a drag mode
    fn mouse_button_to_drag(button: MouseButton) -> Option<DragMode> {
        match button {
            MouseButton::Left => Some(DragMode::Rotate),
            MouseButton::Right | MouseButton::Middle => Some(DragMode::Pan),
            _ => None,
        }
    }
}
