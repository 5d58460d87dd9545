//! Fixed-capacity buffer of the most recent frame durations

use std::time::Duration;

/// Keeps the last `capacity` samples; older samples are overwritten.
pub struct RingBuffer {
    samples: Vec<Duration>,
    capacity: usize,
    cursor: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
            cursor: 0,
        }
    }

    pub fn push(&mut self, sample: Duration) {
        if self.samples.len() < self.capacity {
            self.samples.push(sample);
        } else {
            self.samples[self.cursor] = sample;
        }
        self.cursor = (self.cursor + 1) % self.capacity;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn average(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.samples.iter().sum();
        total / self.samples.len() as u32
    }

    pub fn min_max(&self) -> (Duration, Duration) {
        let mut min = Duration::MAX;
        let mut max = Duration::ZERO;
        for &sample in &self.samples {
            min = min.min(sample);
            max = max.max(sample);
        }
        if self.samples.is_empty() {
            (Duration::ZERO, Duration::ZERO)
        } else {
            (min, max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_after_capacity() {
        let mut buffer = RingBuffer::new(3);
        for millis in [10, 20, 30, 40] {
            buffer.push(Duration::from_millis(millis));
        }
        assert_eq!(buffer.len(), 3);
        // The oldest sample (10ms) was overwritten.
        assert_eq!(buffer.average(), Duration::from_millis(30));
    }

    #[test]
    fn min_max_over_current_samples() {
        let mut buffer = RingBuffer::new(4);
        buffer.push(Duration::from_millis(5));
        buffer.push(Duration::from_millis(15));
        let (min, max) = buffer.min_max();
        assert_eq!(min, Duration::from_millis(5));
        assert_eq!(max, Duration::from_millis(15));
    }

    #[test]
    fn empty_buffer_reports_zero() {
        let buffer = RingBuffer::new(8);
        assert_eq!(buffer.average(), Duration::ZERO);
        assert_eq!(buffer.min_max(), (Duration::ZERO, Duration::ZERO));
    }
}
