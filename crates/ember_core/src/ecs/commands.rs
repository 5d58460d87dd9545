// commands.rs - Deferred world mutation
//
// While a system runs it holds borrows into component columns, so structural
// changes go through this buffer instead of the world. Every operation is
// recorded as a command object and applied in insertion order at the next
// schedule boundary. Spawns reserve their entity id immediately so the
// returned handle can be the target of follow-up commands in the same tick.

use crate::ecs::{
    Component, EcsError, Entity, EntityRegistry, ErasedSystem, IntoSystem, Stage, World,
};
use std::cell::{self, RefCell};
use std::marker::PhantomData;

/// One deferred world mutation.
pub(crate) trait WorldCommand {
    fn apply(self: Box<Self>, world: &mut World) -> Result<(), EcsError>;
}

/// Insertion-ordered buffer of pending commands.
#[derive(Default)]
pub(crate) struct CommandQueue {
    queue: Vec<Box<dyn WorldCommand>>,
}

impl CommandQueue {
    pub fn push(&mut self, command: Box<dyn WorldCommand>) {
        self.queue.push(command);
    }

    pub fn take(&mut self) -> Vec<Box<dyn WorldCommand>> {
        std::mem::take(&mut self.queue)
    }
}

/// System parameter granting deferred access to the world's structure.
pub struct Commands<'w> {
    queue: cell::RefMut<'w, CommandQueue>,
    entities: &'w RefCell<EntityRegistry>,
}

impl<'w> Commands<'w> {
    pub(crate) fn new(
        queue: cell::RefMut<'w, CommandQueue>,
        entities: &'w RefCell<EntityRegistry>,
    ) -> Self {
        Self { queue, entities }
    }

    /// Reserve a new entity. The handle is valid immediately; the entity
    /// becomes live when the buffer is applied.
    pub fn spawn(&mut self) -> Entity {
        let entity = self.entities.borrow_mut().reserve();
        self.queue.push(Box::new(Realize { entity }));
        entity
    }

    /// Queue a kill; stale handles are dropped with a warning at apply time.
    pub fn kill(&mut self, entity: Entity) {
        self.queue.push(Box::new(Kill { entity }));
    }

    /// Queue a component insert (add-or-overwrite).
    pub fn insert<T: Component>(&mut self, entity: Entity, value: T) {
        self.queue.push(Box::new(Insert { entity, value }));
    }

    /// Queue a component removal.
    pub fn remove<T: Component>(&mut self, entity: Entity) {
        self.queue.push(Box::new(Remove::<T> {
            entity,
            marker: PhantomData,
        }));
    }

    /// Queue a system registration onto a schedule.
    pub fn add_system<M, S: IntoSystem<M>>(&mut self, stage: Stage, system: S) {
        self.queue.push(Box::new(AddSystem {
            stage,
            system: system.into_system(),
        }));
    }

    /// Queue a hook subscription to a named event.
    pub fn add_hook<M, S: IntoSystem<M>>(&mut self, event: impl Into<String>, system: S) {
        self.queue.push(Box::new(AddHook {
            event: event.into(),
            system: system.into_system(),
        }));
    }

    /// Queue an event firing.
    pub fn trigger(&mut self, event: impl Into<String>) {
        self.queue.push(Box::new(Trigger {
            event: event.into(),
        }));
    }
}

struct Realize {
    entity: Entity,
}

impl WorldCommand for Realize {
    fn apply(self: Box<Self>, world: &mut World) -> Result<(), EcsError> {
        world.realize_entity(self.entity);
        Ok(())
    }
}

struct Kill {
    entity: Entity,
}

impl WorldCommand for Kill {
    fn apply(self: Box<Self>, world: &mut World) -> Result<(), EcsError> {
        world.kill(self.entity);
        Ok(())
    }
}

struct Insert<T: Component> {
    entity: Entity,
    value: T,
}

impl<T: Component> WorldCommand for Insert<T> {
    fn apply(self: Box<Self>, world: &mut World) -> Result<(), EcsError> {
        world.add_component(self.entity, self.value);
        Ok(())
    }
}

struct Remove<T: Component> {
    entity: Entity,
    marker: PhantomData<fn() -> T>,
}

impl<T: Component> WorldCommand for Remove<T> {
    fn apply(self: Box<Self>, world: &mut World) -> Result<(), EcsError> {
        world.remove_component::<T>(self.entity);
        Ok(())
    }
}

struct AddSystem {
    stage: Stage,
    system: ErasedSystem,
}

impl WorldCommand for AddSystem {
    fn apply(self: Box<Self>, world: &mut World) -> Result<(), EcsError> {
        world.insert_erased_system(self.stage, self.system)
    }
}

struct AddHook {
    event: String,
    system: ErasedSystem,
}

impl WorldCommand for AddHook {
    fn apply(self: Box<Self>, world: &mut World) -> Result<(), EcsError> {
        world.insert_erased_hook(&self.event, self.system)
    }
}

struct Trigger {
    event: String,
}

impl WorldCommand for Trigger {
    fn apply(self: Box<Self>, world: &mut World) -> Result<(), EcsError> {
        world.trigger_event(&self.event);
        Ok(())
    }
}
