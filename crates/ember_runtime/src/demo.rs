//! Demo scene: a camera orbit target with a few spinning props.
//!
//! Exists so `cargo run` exercises the whole lifecycle without a real
//! windowing backend. The scene auto-exits after a few seconds unless the
//! settings file caps the frame count first.

use ember_core::{
    Commands, EcsError, Plugin, Query, Ref, RefMut, Res, ResMut, Stage, World,
};
use ember_render::glam::{Quat, Vec3};
use ember_render::{Camera, RenderPlugin, Transform};
use ember_services::{Time, TimePlugin, Window};

const DEMO_RUNTIME_SECONDS: f32 = 5.0;

/// Rotation speed in radians per second.
struct Spin {
    speed: f32,
}

fn spawn_scene(mut commands: Commands) {
    let camera = commands.spawn();
    commands.insert(camera, Camera::default());
    commands.insert(
        camera,
        Transform::from_translation(Vec3::new(0.0, 2.0, 8.0)),
    );

    for i in 0..4 {
        let prop = commands.spawn();
        commands.insert(
            prop,
            Transform::from_translation(Vec3::new(i as f32 * 2.0 - 3.0, 0.0, 0.0)),
        );
        commands.insert(
            prop,
            Spin {
                speed: 0.5 + i as f32 * 0.25,
            },
        );
    }
}

fn spin_props(mut query: Query<(RefMut<Transform>, Ref<Spin>)>, time: Res<Time>) {
    for (transform, spin) in query.iter() {
        transform.rotation =
            Quat::from_rotation_y(spin.speed * time.delta_time) * transform.rotation;
    }
}

fn auto_exit(time: Res<Time>, mut window: ResMut<Window>) {
    if time.elapsed_time > DEMO_RUNTIME_SECONDS {
        window.request_close();
    }
}

pub struct DemoScenePlugin;

impl Plugin for DemoScenePlugin {
    fn title(&self) -> &str {
        "DemoScene"
    }

    fn description(&self) -> &str {
        "Spawns a camera and a few spinning props."
    }

    fn dependencies(&self) -> Vec<String> {
        vec![
            TimePlugin::TITLE.to_string(),
            RenderPlugin::TITLE.to_string(),
        ]
    }

    fn build(&self, world: &mut World) -> Result<(), EcsError> {
        world.register_component::<Spin>();
        world.add_system(Stage::Startup, spawn_scene)?;
        world.add_system(Stage::Update, spin_props)?;
        world.add_system(Stage::Update, auto_exit)
    }
}
