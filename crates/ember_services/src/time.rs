//! Frame time resource
//!
//! `Time` carries the last frame's delta and the seconds elapsed since
//! startup; a PreUpdate system advances it from a monotonic clock.

use ember_core::{EcsError, Plugin, ResMut, Stage, World};
use std::time::Instant;

/// Seconds-based frame timing, readable by any system.
#[derive(Debug, Default, Clone, Copy)]
pub struct Time {
    /// Time since the previous frame, in seconds.
    pub delta_time: f32,
    /// Time since application startup, in seconds.
    pub elapsed_time: f32,
}

impl Time {
    pub(crate) fn advance(&mut self, delta: f32) {
        self.delta_time = delta;
        self.elapsed_time += delta;
    }
}

/// Monotonic clock backing the Time resource.
struct TimeClock {
    last: Instant,
}

fn advance_time(mut time: ResMut<Time>, mut clock: ResMut<TimeClock>) {
    let now = Instant::now();
    let delta = now.duration_since(clock.last).as_secs_f32();
    clock.last = now;
    time.advance(delta);
}

/// Adds the `Time` resource and its PreUpdate step.
pub struct TimePlugin;

impl TimePlugin {
    pub const TITLE: &'static str = "Time";
}

impl Plugin for TimePlugin {
    fn title(&self) -> &str {
        Self::TITLE
    }

    fn description(&self) -> &str {
        "Provides delta time for frame interpolation and timer support."
    }

    fn build(&self, world: &mut World) -> Result<(), EcsError> {
        world.add_resource(Time::default());
        world.add_resource(TimeClock {
            last: Instant::now(),
        });
        world.add_system(Stage::PreUpdate, advance_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::World;

    #[test]
    fn advance_accumulates_elapsed_time() {
        let mut time = Time::default();
        time.advance(0.25);
        time.advance(0.5);
        assert_eq!(time.delta_time, 0.5);
        assert_eq!(time.elapsed_time, 0.75);
    }

    #[test]
    fn plugin_registers_resource_and_steps_each_update() {
        let mut world = World::new();
        world.add_plugin(TimePlugin).unwrap();
        world.startup().unwrap();
        world.update().unwrap();
        let time = world.get_resource::<Time>().unwrap();
        assert!(time.elapsed_time >= 0.0);
        assert!(time.delta_time >= 0.0);
    }
}
