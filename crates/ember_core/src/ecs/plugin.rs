// plugin.rs - Self-contained units of world configuration
//
// A plugin registers components, resources, systems and events under a
// unique title and may declare dependencies on other plugin titles.
// Dependencies are validated once, at world startup.

use crate::ecs::{EcsError, World};
use tracing::info;

/// A named, dependency-declaring unit that configures the world.
///
/// Equality is by title: adding a second plugin with an already-registered
/// title warns and is otherwise ignored.
pub trait Plugin {
    fn title(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Titles of plugins that must also be registered by startup.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Configure the world. Runs once, when the plugin is added.
    fn build(&self, world: &mut World) -> Result<(), EcsError>;
}

/// A group of plugins added to the world as one unit.
pub trait Bundle {
    fn add_plugins(&self, world: &mut World) -> Result<(), EcsError>;
}

pub(crate) struct PluginRecord {
    pub title: String,
    pub dependencies: Vec<String>,
}

/// Titles and dependency lists of every registered plugin.
#[derive(Default)]
pub(crate) struct PluginRegistry {
    plugins: Vec<PluginRecord>,
}

impl PluginRegistry {
    pub fn contains(&self, title: &str) -> bool {
        self.plugins.iter().any(|plugin| plugin.title == title)
    }

    pub fn add(&mut self, record: PluginRecord) {
        self.plugins.push(record);
    }

    /// Every dependency title must itself be registered.
    pub fn check_dependencies(&self) -> Result<(), EcsError> {
        for plugin in &self.plugins {
            let missing: Vec<String> = plugin
                .dependencies
                .iter()
                .filter(|dependency| !self.contains(dependency.as_str()))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(EcsError::PluginDependencyMissing {
                    plugin: plugin.title.clone(),
                    missing,
                });
            }
        }
        Ok(())
    }
}

/// One aligned line per plugin, long titles truncated with an ellipsis.
pub(crate) fn log_plugin(title: &str, description: &str) {
    const TITLE_WIDTH: usize = 20;
    let formatted = if title.len() > TITLE_WIDTH {
        let cut: String = title.chars().take(TITLE_WIDTH - 3).collect();
        format!("{cut}...")
    } else {
        format!("{title:<width$}", width = TITLE_WIDTH)
    };
    info!("Plugin added: {formatted}    {description}");
}
