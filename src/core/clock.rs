use std::time::Instant;

/// Seconds between FPS refreshes
pub const FPS_UPDATE_INTERVAL: f32 = 0.5;

/// Wall clock for frame deltas
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    /// Seconds since the previous tick
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Frames-per-second averaged over [`FPS_UPDATE_INTERVAL`]
#[derive(Debug, Default, Clone)]
pub struct FpsCounter {
    frames: u32,
    elapsed: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame; returns the new average when it was refreshed
    pub fn record(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;

        if self.elapsed < FPS_UPDATE_INTERVAL {
            return None;
        }
        self.fps = self.frames as f32 / self.elapsed;
        self.frames = 0;
        self.elapsed = 0.0;
        Some(self.fps)
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}
