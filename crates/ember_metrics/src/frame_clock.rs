//! Frame clock: measures frame durations and derives an fps estimate

use crate::ring_buffer::RingBuffer;
use std::time::{Duration, Instant};

pub struct FrameClock {
    frame_start: Instant,
    frames: RingBuffer,
}

impl FrameClock {
    /// Track the last `window` frames.
    pub fn new(window: usize) -> Self {
        Self {
            frame_start: Instant::now(),
            frames: RingBuffer::new(window),
        }
    }

    pub fn begin(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Record the frame and return its measured duration.
    pub fn end(&mut self) -> Duration {
        let elapsed = self.frame_start.elapsed();
        self.frames.push(elapsed);
        elapsed
    }

    pub fn average_frame_time(&self) -> Duration {
        self.frames.average()
    }

    pub fn fps(&self) -> f64 {
        let average = self.frames.average().as_secs_f64();
        if average > 0.0 {
            1.0 / average
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_records_a_sample() {
        let mut clock = FrameClock::new(4);
        clock.begin();
        let elapsed = clock.end();
        assert!(elapsed >= Duration::ZERO);
        assert_eq!(clock.frames.len(), 1);
    }

    #[test]
    fn fps_is_zero_without_samples() {
        let clock = FrameClock::new(4);
        assert_eq!(clock.fps(), 0.0);
    }
}
