/// Per-frame scheduling primitive of the host
pub trait FrameScheduler {
    /// Ask the host for one more frame callback
    fn request_frame(&mut self);

    /// Consume the outstanding request as its frame callback arrives.
    /// Returns false when the callback was not asked for.
    fn frame_delivered(&mut self) -> bool;
}

/// Scheduler driven by hand. Counts outstanding requests; each delivered frame consumes one.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: usize,
    requested: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests not yet consumed
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Total requests ever made
    pub fn requested(&self) -> usize {
        self.requested
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending += 1;
        self.requested += 1;
    }

    fn frame_delivered(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        true
    }
}
