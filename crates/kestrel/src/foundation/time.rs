//! Time management utilities

use std::time::Instant;

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Maximum number of fixed steps consumed in a single frame.
///
/// Bounds catch-up work after a slow frame so the simulation cannot enter
/// an unbounded spiral of fixed updates.
pub const MAX_FIXED_STEPS_PER_FRAME: u32 = 3;

/// Fixed-timestep accumulator
///
/// Converts variable real-frame durations into a bounded number of
/// constant-rate logic steps. When at least one step fires in a frame, any
/// unconsumed backlog is discarded rather than carried into the next frame.
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
}

impl FixedTimestep {
    /// Create an accumulator with the given step duration in seconds
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
        }
    }

    /// Create an accumulator from a step rate in Hz
    pub fn from_rate(rate_hz: f32) -> Self {
        Self::new(1.0 / rate_hz)
    }

    /// The fixed step duration in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Advance by one real frame and return how many fixed steps to run
    ///
    /// At most [`MAX_FIXED_STEPS_PER_FRAME`] steps are returned per call.
    pub fn advance(&mut self, delta_time: f32) -> u32 {
        self.accumulator += delta_time;
        if self.accumulator < self.step {
            return 0;
        }

        let mut steps = 0;
        while self.accumulator >= self.step && steps < MAX_FIXED_STEPS_PER_FRAME {
            self.accumulator -= self.step;
            steps += 1;
        }
        // Drop whatever backlog the cap left unconsumed.
        self.accumulator = 0.0;
        steps
    }
}
