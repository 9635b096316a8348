use std::sync::Arc;
use winit::window::Window;

use crate::traits::FrameScheduler;

/// Frame scheduler backed by winit redraw requests.
///
/// winit coalesces redraws, so whichever `RedrawRequested` arrives first while a request is
/// outstanding satisfies it. Later ones are reported as unrequested.
pub struct WindowScheduler {
    window: Arc<Window>,
    pending: bool,
}

impl WindowScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            pending: false,
        }
    }
}

impl FrameScheduler for WindowScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
        self.window.request_redraw();
    }

    fn frame_delivered(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }
}
