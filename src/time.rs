use std::time::{Duration, Instant};

/// The frame clock. Everything that moves is driven by [`Time::delta_seconds`].
pub struct Time {
    delta: Duration,
    delta_seconds: f64,
    elapsed: Duration,
    frame_count: u64,
    last_update: Instant,
}

impl Time {
    pub fn new() -> Time {
        Time {
            delta: Duration::from_secs(0),
            delta_seconds: 0.0,
            elapsed: Duration::from_secs(0),
            frame_count: 0,
            last_update: Instant::now(),
        }
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta_seconds as f32
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        self.advance(now.duration_since(self.last_update));
        self.last_update = now;
    }

    fn advance(&mut self, delta_time: Duration) {
        self.delta = delta_time;
        self.delta_seconds = delta_time.as_secs_f64();
        self.elapsed += delta_time;
        self.frame_count += 1;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
