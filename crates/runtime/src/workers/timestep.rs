//! Converts wall-clock ticks into fixed simulation steps.

use std::time::Duration;

/// Accumulates elapsed time and releases it in fixed-size steps.
///
/// Backlog beyond `max_steps` per call is dropped, so a stalled host resumes
/// at normal speed instead of fast-forwarding through the missed frames.
#[derive(Clone, Debug)]
pub struct FixedTimestep {
    step: Duration,
    max_steps: u32,
    accumulator: Duration,
}

impl FixedTimestep {
    pub const DEFAULT_MAX_STEPS: u32 = 5;

    /// Steps shorter than one millisecond are rounded up to one.
    pub fn new(step: Duration) -> Self {
        Self {
            step: step.max(Duration::from_millis(1)),
            max_steps: Self::DEFAULT_MAX_STEPS,
            accumulator: Duration::ZERO,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn step_ms(&self) -> u64 {
        self.step.as_millis() as u64
    }

    /// Adds `elapsed` and returns how many fixed steps are due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if self.accumulator >= self.step {
            self.accumulator = Duration::ZERO;
        }
        steps
    }

    /// Time accumulated toward the next step.
    pub fn pending(&self) -> Duration {
        self.accumulator
    }
}
