//! Ember Engine Core
//!
//! The data-oriented heart of the engine:
//! - Entity Component System (entities, packed columns, resources, queries)
//! - Named events with subscribed hook systems
//! - Deferred command buffer for structural mutation
//! - Eight-stage schedule runner and the plugin composition model

pub mod ecs;

pub use ecs::{
    Bundle, Claim, ClaimSet, Commands, Component, ComponentBundle, EcsError, Entity, EntityId,
    Event, IntoSystem, ParamAccess, Plugin, Query, Ref, RefMut, Res, ResMut, Stage, SystemMeta,
    SystemParam, World,
};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
