//! Display-rate frame scheduling.

use std::ops::ControlFlow;
use std::thread;
use std::time::{Duration, Instant};

/// Calls a frame callback at a fixed rate until the callback breaks.
pub struct Scheduler {
    interval: Duration,
    origin: Instant,
    stopped: bool,
}

impl Scheduler {
    pub fn new(fps: u32) -> Self {
        Self::with_interval(Duration::from_secs(1) / fps.max(1))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Scheduler {
            interval,
            origin: Instant::now(),
            stopped: true,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Milliseconds since the scheduler was created.
    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Run `frame` once per interval with the current timestamp.  No further
    /// frame is scheduled after one returns `Break`; its value is returned.
    pub fn run<B>(&mut self, mut frame: impl FnMut(f64) -> ControlFlow<B>) -> B {
        self.stopped = false;
        loop {
            let frame_start = Instant::now();
            if let ControlFlow::Break(value) = frame(self.now_ms()) {
                self.stopped = true;
                return value;
            }
            let elapsed = frame_start.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
            }
        }
    }
}
