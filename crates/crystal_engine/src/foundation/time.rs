//! Time management utilities

use std::time::Instant;

/// Monotonic animation clock shared by everything that animates in a scene
///
/// The clock only ever moves forward. Hosts either feed it explicit frame
/// deltas ([`advance`](Self::advance)) or absolute timestamps
/// ([`advance_to`](Self::advance_to)); both reject values that would roll time
/// back or that are not finite.
#[derive(Debug, Clone, Default)]
pub struct AnimationClock {
    elapsed: f32,
    delta: f32,
    frame_count: u64,
}

impl AnimationClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `delta` seconds and return the new elapsed time
    ///
    /// Negative or non-finite deltas count as a zero-length frame.
    pub fn advance(&mut self, delta: f32) -> f32 {
        let delta = if delta.is_finite() && delta >= 0.0 {
            delta
        } else {
            log::trace!("Ignoring invalid clock delta: {}", delta);
            0.0
        };
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
        self.elapsed
    }

    /// Advance the clock to an absolute elapsed time in seconds
    ///
    /// Timestamps earlier than the current elapsed time produce a zero-length frame.
    pub fn advance_to(&mut self, elapsed: f32) -> f32 {
        let delta = if elapsed.is_finite() { elapsed - self.elapsed } else { 0.0 };
        self.advance(delta.max(0.0))
    }

    /// Total elapsed time in seconds
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Length of the last frame in seconds
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Number of frames the clock has been advanced
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// High-precision wall-clock timer for frame timing
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

    /// Get the average FPS since timer creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_accumulates_deltas() {
        let mut clock = AnimationClock::new();
        clock.advance(0.5);
        clock.advance(0.25);

        assert_eq!(clock.elapsed(), 0.75);
        assert_eq!(clock.delta(), 0.25);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_clock_never_rolls_back() {
        let mut clock = AnimationClock::new();
        clock.advance(1.0);
        clock.advance(-0.5);
        clock.advance(f32::NAN);
        clock.advance(f32::INFINITY);
        assert_eq!(clock.elapsed(), 1.0);

        clock.advance_to(0.2);
        assert_eq!(clock.elapsed(), 1.0);
        assert_eq!(clock.delta(), 0.0);

        clock.advance_to(3.0);
        assert_eq!(clock.elapsed(), 3.0);
        assert_eq!(clock.delta(), 2.0);
    }

    #[test]
    fn test_timer_counts_frames() {
        let mut timer = Timer::new();
        timer.update();
        timer.update();

        assert!(timer.delta_time() >= 0.0);
        assert!(timer.total_time() >= timer.delta_time());
    }
}
