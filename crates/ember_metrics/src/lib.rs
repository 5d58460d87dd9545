//! Ember Metrics - Frame timing instrumentation
//!
//! Small, std-only helpers for watching where frame time goes:
//! a fixed-capacity ring buffer of recent frame durations, a frame clock,
//! and a per-stage accumulator for schedule profiling.

mod frame_clock;
mod ring_buffer;
mod stage_timer;

pub use frame_clock::FrameClock;
pub use ring_buffer::RingBuffer;
pub use stage_timer::StageTimer;
