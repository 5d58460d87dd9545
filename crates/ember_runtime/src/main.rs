//! Ember Engine Runtime
//!
//! Composes the core plugin bundles, boots the world and drives the
//! startup/update/render/shutdown lifecycle.

mod demo;

use anyhow::Result;
use ember_core::World;
use ember_metrics::{FrameClock, StageTimer};
use ember_render::RenderPlugins;
use ember_services::{CorePlugins, Settings, Window};

const SETTINGS_PATH: &str = "ember.json";

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("Ember Engine v{}", ember_core::VERSION);

    let settings = Settings::load_or_default(SETTINGS_PATH)?;
    let frame_cap = settings.graphics.frame_cap;

    let mut world = World::new();
    world.add_resource(settings);
    world.add_bundle(CorePlugins)?;
    world.add_bundle(RenderPlugins)?;
    world.add_plugin(demo::DemoScenePlugin)?;

    world.startup()?;

    let mut clock = FrameClock::new(120);
    let mut stages = StageTimer::new();
    let mut frames: u32 = 0;
    loop {
        clock.begin();
        stages.time("update", || world.update())?;
        stages.time("render", || world.render())?;
        clock.end();
        frames += 1;

        if world.get_resource::<Window>()?.should_close() {
            break;
        }
        if frame_cap != 0 && frames >= frame_cap {
            break;
        }
    }

    tracing::info!(
        "ran {frames} frames, avg {:.2}ms ({:.1} fps)",
        clock.average_frame_time().as_secs_f64() * 1000.0,
        clock.fps()
    );
    for (label, total) in stages.report() {
        tracing::debug!("stage {label}: {total:?} accumulated");
    }

    world.shutdown()?;
    Ok(())
}
