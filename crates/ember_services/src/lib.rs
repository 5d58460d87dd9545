//! Ember Services Layer
//!
//! Platform-seam plugins for the ECS world: frame time, the window
//! resource, peripheral input state, and engine settings. No OS windowing
//! or GL lives here; these are the resources and stages the real platform
//! collaborators plug into.

pub mod input;
pub mod settings;
pub mod time;
pub mod window;

pub use input::{InputEvent, InputManager, InputPlugin, Key};
pub use settings::{Settings, SettingsError};
pub use time::{Time, TimePlugin};
pub use window::{Window, WindowPlugin, WINDOW_RESIZE_EVENT};

use ember_core::{Bundle, EcsError, World};

/// The baseline plugin set: input, time and the window seam.
pub struct CorePlugins;

impl Bundle for CorePlugins {
    fn add_plugins(&self, world: &mut World) -> Result<(), EcsError> {
        world.add_plugin(InputPlugin)?;
        world.add_plugin(TimePlugin)?;
        world.add_plugin(WindowPlugin)?;
        Ok(())
    }
}
