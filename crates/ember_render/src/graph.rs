//! Render graph and renderer service resources
//!
//! The graph holds the ordered passes a backend would walk plus the frame's
//! batched draw data, rebuilt every PreRender. The renderer carries the
//! cross-frame state (clear color, frame counter).

use glam::Mat4;

/// One pass in the graph. Disabled nodes are skipped by the walk.
#[derive(Debug, Clone)]
pub struct RenderNode {
    pub name: String,
    pub enabled: bool,
}

/// A single draw recorded for this frame.
#[derive(Debug, Clone, Copy)]
pub struct DrawBatch {
    pub transform: Mat4,
}

/// Ordered render passes plus per-frame draw data.
#[derive(Default)]
pub struct RenderGraph {
    nodes: Vec<RenderNode>,
    batches: Vec<DrawBatch>,
    view_projection: Mat4,
}

impl RenderGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: impl Into<String>) {
        self.nodes.push(RenderNode {
            name: name.into(),
            enabled: true,
        });
    }

    pub fn nodes(&self) -> &[RenderNode] {
        &self.nodes
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut RenderNode> {
        self.nodes.iter_mut().find(|node| node.name == name)
    }

    /// Drop last frame's draw data; PreRender calls this before batching.
    pub fn clear_frame(&mut self) {
        self.batches.clear();
    }

    pub fn push_batch(&mut self, batch: DrawBatch) {
        self.batches.push(batch);
    }

    pub fn batches(&self) -> &[DrawBatch] {
        &self.batches
    }

    pub fn set_view_projection(&mut self, view_projection: Mat4) {
        self.view_projection = view_projection;
    }

    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }
}

/// Backend-facing service state. A real backend swaps this for its device
/// wrapper; systems only touch it in the render stages.
pub struct Renderer {
    pub clear_color: [f32; 4],
    frames_rendered: u64,
}

impl Renderer {
    pub fn new(clear_color: [f32; 4]) -> Self {
        Self {
            clear_color,
            frames_rendered: 0,
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub(crate) fn finish_frame(&mut self) {
        self.frames_rendered += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_keep_insertion_order() {
        let mut graph = RenderGraph::new();
        graph.add_node("geometry");
        graph.add_node("post");
        let names: Vec<&str> = graph.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["geometry", "post"]);
    }

    #[test]
    fn clear_frame_drops_batches_but_not_nodes() {
        let mut graph = RenderGraph::new();
        graph.add_node("geometry");
        graph.push_batch(DrawBatch {
            transform: Mat4::IDENTITY,
        });
        graph.clear_frame();
        assert!(graph.batches().is_empty());
        assert_eq!(graph.nodes().len(), 1);
    }

    #[test]
    fn disabling_a_node_sticks() {
        let mut graph = RenderGraph::new();
        graph.add_node("post");
        graph.node_mut("post").unwrap().enabled = false;
        assert!(!graph.nodes()[0].enabled);
    }
}
