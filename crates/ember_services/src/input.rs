//! Peripheral input state
//!
//! The platform collaborator pushes raw `InputEvent`s into the manager's
//! queue; a PreUpdate system pumps the queue into per-frame key and pointer
//! state that gameplay systems read.

use ember_core::{EcsError, Plugin, ResMut, Stage, World};
use std::collections::{HashSet, VecDeque};

use crate::window::WindowPlugin;

/// Keys the seam distinguishes. A real backend maps its scancodes onto
/// these before queueing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    Escape,
    Enter,
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Pressed(Key),
    Released(Key),
    PointerMoved { x: f32, y: f32 },
}

/// Key and pointer state for the current frame.
#[derive(Debug, Default)]
pub struct InputManager {
    pressed: HashSet<Key>,
    just_pressed: HashSet<Key>,
    pointer: (f32, f32),
    queue: VecDeque<InputEvent>,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw event from the platform side.
    pub fn push_event(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// True only on the first frame a key goes down.
    pub fn was_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    /// Fold every queued event into the frame state.
    pub(crate) fn pump(&mut self) {
        self.just_pressed.clear();
        while let Some(event) = self.queue.pop_front() {
            match event {
                InputEvent::Pressed(key) => {
                    if self.pressed.insert(key) {
                        self.just_pressed.insert(key);
                    }
                }
                InputEvent::Released(key) => {
                    self.pressed.remove(&key);
                }
                InputEvent::PointerMoved { x, y } => {
                    self.pointer = (x, y);
                }
            }
        }
    }
}

fn pump_input(mut input: ResMut<InputManager>) {
    input.pump();
}

/// Adds the input manager and its PreUpdate pump. Depends on the window
/// plugin: input is meaningless without a focused surface.
pub struct InputPlugin;

impl InputPlugin {
    pub const TITLE: &'static str = "Input";
}

impl Plugin for InputPlugin {
    fn title(&self) -> &str {
        Self::TITLE
    }

    fn description(&self) -> &str {
        "Provides peripheral input state information."
    }

    fn dependencies(&self) -> Vec<String> {
        vec![WindowPlugin::TITLE.to_string()]
    }

    fn build(&self, world: &mut World) -> Result<(), EcsError> {
        world.add_resource(InputManager::new());
        world.add_system(Stage::PreUpdate, pump_input)
    }
}
