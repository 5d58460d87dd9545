//! Render-side plugins
//!
//! `AssetPlugin` registers the asset libraries; `RenderPlugin` wires the
//! render graph, the renderer service and the PreRender/Render/PostRender
//! systems. All renderer work happens in the render stages, never during
//! update.

use crate::assets::{
    Material, MaterialLibrary, Mesh, MeshLibrary, Texture, TextureLibrary,
};
use crate::components::{Camera, Transform};
use crate::graph::{DrawBatch, RenderGraph, Renderer};
use ember_core::{Bundle, EcsError, Plugin, Query, Ref, Res, ResMut, Stage, World};
use ember_services::{Settings, Window, WindowPlugin};
use tracing::trace;

/// Registers the texture, mesh and material libraries, each seeded with a
/// fallback entry so handle resolution always has something to return.
pub struct AssetPlugin;

impl AssetPlugin {
    pub const TITLE: &'static str = "Assets";
}

impl Plugin for AssetPlugin {
    fn title(&self) -> &str {
        Self::TITLE
    }

    fn description(&self) -> &str {
        "Provides the texture, mesh and material libraries."
    }

    fn build(&self, world: &mut World) -> Result<(), EcsError> {
        let mut textures = TextureLibrary::new();
        let white = textures.insert("white", Texture { width: 1, height: 1 });

        let mut meshes = MeshLibrary::new();
        meshes.insert(
            "unit-quad",
            Mesh {
                vertex_count: 4,
                index_count: 6,
            },
        );

        let mut materials = MaterialLibrary::new();
        materials.insert(
            "default",
            Material {
                base_color: [1.0, 1.0, 1.0, 1.0],
                texture: Some(white),
            },
        );

        world.add_resource(textures);
        world.add_resource(meshes);
        world.add_resource(materials);
        Ok(())
    }
}

fn update_camera(
    mut graph: ResMut<RenderGraph>,
    window: Res<Window>,
    mut query: Query<(Ref<Camera>, Ref<Transform>)>,
) {
    if let Some((camera, transform)) = query.iter().next() {
        let view = transform.matrix().inverse();
        graph.set_view_projection(camera.projection(window.aspect_ratio()) * view);
    }
}

fn build_frame(mut graph: ResMut<RenderGraph>, mut query: Query<(Ref<Transform>,)>) {
    graph.clear_frame();
    for (transform,) in query.iter() {
        graph.push_batch(DrawBatch {
            transform: transform.matrix(),
        });
    }
}

fn execute_graph(graph: Res<RenderGraph>, renderer: Res<Renderer>) {
    for node in graph.nodes().iter().filter(|node| node.enabled) {
        trace!(
            "node {} drawing {} batches (clear {:?})",
            node.name,
            graph.batches().len(),
            renderer.clear_color
        );
    }
}

fn present(mut renderer: ResMut<Renderer>) {
    renderer.finish_frame();
    trace!("frame {} presented", renderer.frames_rendered());
}

/// Wires the render graph, renderer service and render-stage systems.
pub struct RenderPlugin;

impl RenderPlugin {
    pub const TITLE: &'static str = "Render";
}

impl Plugin for RenderPlugin {
    fn title(&self) -> &str {
        Self::TITLE
    }

    fn description(&self) -> &str {
        "Drives the render graph through the render stages."
    }

    fn dependencies(&self) -> Vec<String> {
        vec![WindowPlugin::TITLE.to_string(), AssetPlugin::TITLE.to_string()]
    }

    fn build(&self, world: &mut World) -> Result<(), EcsError> {
        world.register_component::<Transform>();
        world.register_component::<Camera>();

        let clear_color = world
            .get_resource::<Settings>()
            .map(|settings| settings.graphics.clear_color)
            .unwrap_or([0.05, 0.05, 0.08, 1.0]);

        let mut graph = RenderGraph::new();
        graph.add_node("geometry");
        graph.add_node("post");
        world.add_resource(graph);
        world.add_resource(Renderer::new(clear_color));

        world.add_system(Stage::PreRender, update_camera)?;
        world.add_system(Stage::PreRender, build_frame)?;
        world.add_system(Stage::Render, execute_graph)?;
        world.add_system(Stage::PostRender, present)
    }
}

/// Assets plus the renderer, added as one unit.
pub struct RenderPlugins;

impl Bundle for RenderPlugins {
    fn add_plugins(&self, world: &mut World) -> Result<(), EcsError> {
        world.add_plugin(AssetPlugin)?;
        world.add_plugin(RenderPlugin)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_services::CorePlugins;
    use glam::Vec3;

    #[test]
    fn render_stages_batch_transforms_and_count_frames() {
        let mut world = World::new();
        world.add_bundle(CorePlugins).unwrap();
        world.add_bundle(RenderPlugins).unwrap();

        let camera = world.spawn();
        world.add_components(camera, (Camera::default(), Transform::default()));
        for x in 0..3 {
            let e = world.spawn();
            world.add_component(e, Transform::from_translation(Vec3::new(x as f32, 0.0, 0.0)));
        }

        world.startup().unwrap();
        world.update().unwrap();
        world.render().unwrap();

        let graph = world.get_resource::<RenderGraph>().unwrap();
        // Three props plus the camera's own transform.
        assert_eq!(graph.batches().len(), 4);
        let renderer = world.get_resource::<Renderer>().unwrap();
        assert_eq!(renderer.frames_rendered(), 1);
    }

    #[test]
    fn asset_plugin_seeds_fallback_entries() {
        let mut world = World::new();
        world.add_plugin(AssetPlugin).unwrap();
        let textures = world.get_resource::<TextureLibrary>().unwrap();
        assert!(textures.handle("white").is_some());
        let materials = world.get_resource::<MaterialLibrary>().unwrap();
        assert!(materials.handle("default").is_some());
    }
}
