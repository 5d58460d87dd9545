use crate::ecs::EntityId;
use thiserror::Error;

/// Errors surfaced by the ECS world.
///
/// These are the programmer-error failures: they abort the running schedule
/// and propagate to the caller. Benign conditions (a stale entity handle, an
/// unknown event name, a re-registered plugin) are logged and absorbed
/// instead of being reported here.
#[derive(Debug, Error)]
pub enum EcsError {
    #[error("component not found for entity ({entity}) with component: {component}")]
    ComponentNotFound {
        entity: EntityId,
        component: &'static str,
    },

    #[error("resource not found: {resource}")]
    ResourceNotFound { resource: &'static str },

    #[error("aliasing mutable access to component: {component}")]
    AliasViolation { component: &'static str },

    #[error("invalid signature for system '{system}': {reason}")]
    SystemSignatureInvalid { system: String, reason: String },

    #[error("plugin '{plugin}' is missing dependencies: {missing:?}")]
    PluginDependencyMissing {
        plugin: String,
        missing: Vec<String>,
    },
}
