// schedule.rs - The eight standard schedules and their system lists

use crate::ecs::SystemCell;
use std::fmt;

/// The standard execution stages, in frame order. Startup runs once before
/// the first frame, Shutdown once after the last; the update and render
/// triples run every frame (render optionally skipped for headless use).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Startup,
    PreUpdate,
    Update,
    PostUpdate,
    PreRender,
    Render,
    PostRender,
    Shutdown,
}

impl Stage {
    /// Every stage in canonical order.
    pub const ALL: [Stage; 8] = [
        Stage::Startup,
        Stage::PreUpdate,
        Stage::Update,
        Stage::PostUpdate,
        Stage::PreRender,
        Stage::Render,
        Stage::PostRender,
        Stage::Shutdown,
    ];

    /// The stages run by `World::update`, in order.
    pub const UPDATE_STAGES: [Stage; 3] = [Stage::PreUpdate, Stage::Update, Stage::PostUpdate];

    /// The stages run by `World::render`, in order.
    pub const RENDER_STAGES: [Stage; 3] = [Stage::PreRender, Stage::Render, Stage::PostRender];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Startup => "Startup",
            Stage::PreUpdate => "PreUpdate",
            Stage::Update => "Update",
            Stage::PostUpdate => "PostUpdate",
            Stage::PreRender => "PreRender",
            Stage::Render => "Render",
            Stage::PostRender => "PostRender",
            Stage::Shutdown => "Shutdown",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered list of systems for one stage. Run order is insertion order.
#[derive(Default)]
pub struct Schedule {
    systems: Vec<SystemCell>,
}

impl Schedule {
    pub(crate) fn push(&mut self, system: SystemCell) {
        self.systems.push(system);
    }

    pub(crate) fn systems(&self) -> &[SystemCell] {
        &self.systems
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}
