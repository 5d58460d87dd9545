//! Window resource seam
//!
//! The `Window` resource is the contract between the world and a real
//! windowing backend: constructed once at plug time from `Settings`,
//! mutated only by dedicated Startup/PreUpdate systems. Resizes are
//! two-phase so downstream systems observe them as the "WindowResize"
//! event rather than mid-frame state changes.

use crate::settings::Settings;
use ember_core::{Commands, EcsError, Plugin, Res, ResMut, Stage, World};
use tracing::info;

pub const WINDOW_RESIZE_EVENT: &str = "WindowResize";
pub const WINDOW_RESIZE_EVENT_DESCRIPTION: &str = "Called whenever the window is resized.";

#[derive(Debug, Clone)]
pub struct Window {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    should_close: bool,
    pending_resize: Option<(u32, u32)>,
}

impl Window {
    pub fn new(title: impl Into<String>, width: u32, height: u32, vsync: bool) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            vsync,
            should_close: false,
            pending_resize: None,
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            0.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Ask for a resize; applied by the PreUpdate system next frame.
    pub fn request_resize(&mut self, width: u32, height: u32) {
        self.pending_resize = Some((width, height));
    }

    pub fn request_close(&mut self) {
        self.should_close = true;
    }

    pub fn should_close(&self) -> bool {
        self.should_close
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new("Ember", 1280, 720, true)
    }
}

fn announce_window(window: Res<Window>) {
    info!(
        "window ready: {} ({}x{}, vsync {})",
        window.title, window.width, window.height, window.vsync
    );
}

fn apply_pending_resize(mut window: ResMut<Window>, mut commands: Commands) {
    if let Some((width, height)) = window.pending_resize.take() {
        window.width = width;
        window.height = height;
        commands.trigger(WINDOW_RESIZE_EVENT);
    }
}

/// Adds the window resource, the resize event, and the systems that own
/// window mutation.
pub struct WindowPlugin;

impl WindowPlugin {
    pub const TITLE: &'static str = "Window";
}

impl Plugin for WindowPlugin {
    fn title(&self) -> &str {
        Self::TITLE
    }

    fn description(&self) -> &str {
        "Provides the window seam resource and the resize event."
    }

    fn build(&self, world: &mut World) -> Result<(), EcsError> {
        let window = match world.get_resource::<Settings>() {
            Ok(settings) => Window::new(
                settings.window.title.clone(),
                settings.window.width,
                settings.window.height,
                settings.window.vsync,
            ),
            Err(_) => Window::default(),
        };
        world.add_resource(window);
        world.register_event(WINDOW_RESIZE_EVENT, WINDOW_RESIZE_EVENT_DESCRIPTION);
        world.add_system(Stage::Startup, announce_window)?;
        world.add_system(Stage::PreUpdate, apply_pending_resize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::World;

    #[test]
    fn plugin_builds_window_from_settings() {
        let mut world = World::new();
        let mut settings = Settings::default();
        settings.window.title = "Test".to_string();
        settings.window.width = 640;
        settings.window.height = 480;
        world.add_resource(settings);
        world.add_plugin(WindowPlugin).unwrap();

        let window = world.get_resource::<Window>().unwrap();
        assert_eq!(window.title, "Test");
        assert_eq!((window.width, window.height), (640, 480));
    }

    #[test]
    fn resize_applies_next_frame_and_fires_the_event() {
        let mut world = World::new();
        world.add_plugin(WindowPlugin).unwrap();
        world.startup().unwrap();

        world
            .get_resource_mut::<Window>()
            .unwrap()
            .request_resize(1920, 1080);
        world.update().unwrap();

        let window = world.get_resource::<Window>().unwrap();
        assert_eq!((window.width, window.height), (1920, 1080));
    }

    #[test]
    fn close_request_is_sticky() {
        let mut window = Window::default();
        assert!(!window.should_close());
        window.request_close();
        assert!(window.should_close());
    }
}
