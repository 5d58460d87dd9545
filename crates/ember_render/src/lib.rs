//! Ember Render Seam
//!
//! The renderer-facing side of the world: asset libraries handing out
//! opaque handles, spatial components, and the render graph the backend
//! walks. A real GPU backend replaces the `Renderer` service; everything
//! here stays backend-agnostic.

pub mod assets;
pub mod components;
pub mod graph;
pub mod plugin;

pub use assets::{
    AssetHandle, AssetLibrary, Material, MaterialLibrary, Mesh, MeshLibrary, Texture,
    TextureLibrary,
};
pub use components::{Camera, Transform};
pub use graph::{DrawBatch, RenderGraph, RenderNode, Renderer};
pub use plugin::{AssetPlugin, RenderPlugin, RenderPlugins};

pub use glam;
