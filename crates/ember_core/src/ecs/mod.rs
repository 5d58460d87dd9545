// mod.rs - ECS module exports
//
// Data-oriented world: packed per-type component columns, generation-tagged
// entity handles, singleton resources, named events, deferred commands and
// systems organized into the eight standard schedules.

mod bundle;
mod commands;
mod component;
mod entity;
mod error;
mod event;
mod plugin;
mod query;
mod resource;
mod schedule;
mod system;
mod world;

pub use bundle::ComponentBundle;
pub use commands::Commands;
pub(crate) use commands::{CommandQueue, WorldCommand};
pub use component::{Component, ComponentRegistry};
#[doc(hidden)]
pub use component::AnyColumn;
pub(crate) use component::Column;
pub use entity::{Entity, EntityId, EntityRegistry};
pub use error::EcsError;
pub use event::Event;
pub(crate) use event::EventRegistry;
pub use plugin::{Bundle, Plugin};
pub(crate) use plugin::{log_plugin, PluginRecord, PluginRegistry};
pub use query::{Claim, ClaimAccess, ClaimSet, ColumnGuard, Query, QueryIter, Ref, RefMut};
pub use resource::{Res, ResMut, ResourceRegistry};
pub use schedule::{Schedule, Stage};
pub use system::{ErasedSystem, IntoSystem, ParamAccess, SystemMeta, SystemParam};
pub(crate) use system::{validate_system, SystemCell};
pub use world::World;
