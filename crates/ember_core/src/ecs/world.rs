// world.rs - Facade owning every ECS registry
//
// All state lives here: entities, component columns, resources, events,
// schedules, plugins and the pending command buffer. The lifecycle methods
// drain the command buffer at every schedule boundary and the event queue
// after PostUpdate, after PostRender, and at the end of startup/shutdown.

use crate::ecs::{
    log_plugin, validate_system, Bundle, ClaimSet, CommandQueue, Component, ComponentBundle,
    ComponentRegistry, EcsError, Entity, EntityRegistry, ErasedSystem, EventRegistry, IntoSystem,
    Plugin, PluginRecord, PluginRegistry, Query, Res, ResMut, ResourceRegistry, Schedule, Stage,
    SystemCell, WorldCommand,
};
use std::cell::{self, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::warn;

pub struct World {
    pub(crate) entities: RefCell<EntityRegistry>,
    pub(crate) components: ComponentRegistry,
    pub(crate) resources: ResourceRegistry,
    pub(crate) commands: RefCell<CommandQueue>,
    events: EventRegistry,
    schedules: HashMap<Stage, Schedule>,
    plugins: PluginRegistry,
}

impl World {
    /// An empty world with the eight standard schedules.
    pub fn new() -> Self {
        let mut schedules = HashMap::new();
        for stage in Stage::ALL {
            schedules.insert(stage, Schedule::default());
        }
        Self {
            entities: RefCell::new(EntityRegistry::new()),
            components: ComponentRegistry::new(),
            resources: ResourceRegistry::new(),
            commands: RefCell::new(CommandQueue::default()),
            events: EventRegistry::default(),
            schedules,
            plugins: PluginRegistry::default(),
        }
    }

    // ---- entities --------------------------------------------------------

    pub fn spawn(&mut self) -> Entity {
        self.entities.get_mut().spawn()
    }

    /// Kill an entity and cascade-remove all of its components. Stale
    /// handles warn and no-op.
    pub fn kill(&mut self, entity: Entity) {
        if !self.entities.get_mut().kill(entity) {
            warn!("kill on dead entity ({})", entity.id);
            return;
        }
        self.components.remove_entity(entity.id);
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.borrow().is_alive(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.borrow().count()
    }

    // ---- components ------------------------------------------------------

    /// Pre-create the packed column for `T`. Idempotent; inserting also
    /// registers on first use.
    pub fn register_component<T: Component>(&mut self) {
        self.components.register::<T>();
    }

    /// Attach a component, overwriting any existing value of the same type.
    /// Stale handles warn and no-op.
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) {
        if !self.is_alive(entity) {
            warn!("add_component on dead entity ({})", entity.id);
            return;
        }
        self.components.insert(entity, value);
    }

    pub fn remove_component<T: Component>(&mut self, entity: Entity) {
        if !self.is_alive(entity) {
            warn!("remove_component on dead entity ({})", entity.id);
            return;
        }
        self.components.remove::<T>(entity);
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.is_alive(entity) && self.components.has::<T>(entity)
    }

    pub fn get_component<T: Component>(&self, entity: Entity) -> Result<cell::Ref<'_, T>, EcsError> {
        self.components.get(entity)
    }

    pub fn get_component_mut<T: Component>(
        &self,
        entity: Entity,
    ) -> Result<cell::RefMut<'_, T>, EcsError> {
        self.components.get_mut(entity)
    }

    /// Attach every component of a tuple bundle at once.
    pub fn add_components<B: ComponentBundle>(&mut self, entity: Entity, bundle: B) {
        if !self.is_alive(entity) {
            warn!("add_components on dead entity ({})", entity.id);
            return;
        }
        bundle.insert_into(&mut self.components, entity);
    }

    pub fn remove_components<B: ComponentBundle>(&mut self, entity: Entity) {
        if !self.is_alive(entity) {
            warn!("remove_components on dead entity ({})", entity.id);
            return;
        }
        B::remove_from(&mut self.components, entity);
    }

    pub fn has_components<B: ComponentBundle>(&self, entity: Entity) -> bool {
        self.is_alive(entity) && B::present_in(&self.components, entity)
    }

    /// Fetch shared borrows of a whole bundle; fails with the first missing
    /// component's error.
    pub fn get_components<B: ComponentBundle>(
        &self,
        entity: Entity,
    ) -> Result<B::Refs<'_>, EcsError> {
        B::fetch(&self.components, entity)
    }

    // ---- resources -------------------------------------------------------

    /// Insert a resource, replacing any previous value of the same type.
    pub fn add_resource<R: 'static>(&mut self, value: R) {
        self.resources.add(value);
    }

    pub fn contains_resource<R: 'static>(&self) -> bool {
        self.resources.contains::<R>()
    }

    pub fn get_resource<R: 'static>(&self) -> Result<cell::Ref<'_, R>, EcsError> {
        self.resources.get()
    }

    pub fn get_resource_mut<R: 'static>(&self) -> Result<cell::RefMut<'_, R>, EcsError> {
        self.resources.get_mut()
    }

    /// Shared resource access in system-parameter form.
    pub fn read<R: 'static>(&self) -> Result<Res<'_, R>, EcsError> {
        self.resources.read()
    }

    /// Exclusive resource access in system-parameter form.
    pub fn write<R: 'static>(&self) -> Result<ResMut<'_, R>, EcsError> {
        self.resources.write()
    }

    // ---- queries ---------------------------------------------------------

    /// Build a query over the given claim set.
    pub fn query<Q: ClaimSet>(&self) -> Result<Query<'_, Q>, EcsError> {
        Query::new(&self.components, &self.entities)
    }

    // ---- events ----------------------------------------------------------

    pub fn register_event(&mut self, name: &str, description: &str) {
        self.events.register(name, description);
    }

    pub fn is_event(&self, name: &str) -> bool {
        self.events.is_registered(name)
    }

    /// Subscribe a system to a named event. Signature rules apply as for
    /// scheduled systems.
    pub fn add_hook<M, S: IntoSystem<M>>(&mut self, event: &str, system: S) -> Result<(), EcsError> {
        self.insert_erased_hook(event, system.into_system())
    }

    /// Queue one firing. Unknown names warn and are dropped.
    pub fn trigger_event(&self, name: &str) {
        self.events.trigger(name);
    }

    // ---- systems ---------------------------------------------------------

    /// Register a system onto a schedule, validating its signature.
    pub fn add_system<M, S: IntoSystem<M>>(
        &mut self,
        stage: Stage,
        system: S,
    ) -> Result<(), EcsError> {
        self.insert_erased_system(stage, system.into_system())
    }

    pub(crate) fn insert_erased_system(
        &mut self,
        stage: Stage,
        system: ErasedSystem,
    ) -> Result<(), EcsError> {
        validate_system(system.meta())?;
        self.schedules
            .entry(stage)
            .or_default()
            .push(Rc::new(RefCell::new(system)));
        Ok(())
    }

    pub(crate) fn insert_erased_hook(
        &mut self,
        event: &str,
        system: ErasedSystem,
    ) -> Result<(), EcsError> {
        validate_system(system.meta())?;
        self.events.add_hook(event, Rc::new(RefCell::new(system)));
        Ok(())
    }

    pub(crate) fn realize_entity(&mut self, entity: Entity) {
        if !self.entities.get_mut().realize(entity) {
            warn!("spawn reservation was stale ({})", entity.id);
        }
    }

    // ---- plugins ---------------------------------------------------------

    /// Add a plugin. Re-adding a title warns and does not run `build` again.
    pub fn add_plugin<P: Plugin>(&mut self, plugin: P) -> Result<(), EcsError> {
        if self.plugins.contains(plugin.title()) {
            warn!("plugin {} already registered", plugin.title());
            return Ok(());
        }
        self.plugins.add(PluginRecord {
            title: plugin.title().to_string(),
            dependencies: plugin.dependencies(),
        });
        plugin.build(self)?;
        log_plugin(plugin.title(), plugin.description());
        Ok(())
    }

    /// Add a group of plugins as one unit.
    pub fn add_bundle<B: Bundle>(&mut self, bundle: B) -> Result<(), EcsError> {
        bundle.add_plugins(self)
    }

    pub fn is_plugin(&self, title: &str) -> bool {
        self.plugins.contains(title)
    }

    // ---- lifecycle -------------------------------------------------------

    /// Validate plugin dependencies, then run the Startup schedule.
    pub fn startup(&mut self) -> Result<(), EcsError> {
        self.plugins.check_dependencies()?;
        self.run_schedule(Stage::Startup)?;
        self.apply_commands()?;
        self.drain_events()
    }

    /// Run PreUpdate, Update and PostUpdate, draining commands at each
    /// boundary, then drain the event queue.
    pub fn update(&mut self) -> Result<(), EcsError> {
        for stage in Stage::UPDATE_STAGES {
            self.run_schedule(stage)?;
            self.apply_commands()?;
        }
        self.drain_events()
    }

    /// Run PreRender, Render and PostRender, draining commands at each
    /// boundary, then drain the event queue. Never called in headless use.
    pub fn render(&mut self) -> Result<(), EcsError> {
        for stage in Stage::RENDER_STAGES {
            self.run_schedule(stage)?;
            self.apply_commands()?;
        }
        self.drain_events()
    }

    pub fn shutdown(&mut self) -> Result<(), EcsError> {
        self.run_schedule(Stage::Shutdown)?;
        self.apply_commands()?;
        self.drain_events()
    }

    /// Run one schedule's systems in insertion order. Does not drain the
    /// command buffer; the lifecycle methods handle boundaries.
    pub fn run_schedule(&mut self, stage: Stage) -> Result<(), EcsError> {
        let systems: Vec<SystemCell> = self
            .schedules
            .get(&stage)
            .map(|schedule| schedule.systems().to_vec())
            .unwrap_or_default();
        for system in systems {
            system.borrow_mut().run(&*self)?;
        }
        Ok(())
    }

    fn apply_commands(&mut self) -> Result<(), EcsError> {
        loop {
            let batch = self.commands.borrow_mut().take();
            if batch.is_empty() {
                return Ok(());
            }
            for command in batch {
                command.apply(self)?;
            }
        }
    }

    /// Run pending event firings to exhaustion. Hooks run in subscription
    /// order; the command buffer drains after each firing so hooks
    /// subscribed mid-drain take effect for subsequent firings.
    fn drain_events(&mut self) -> Result<(), EcsError> {
        while let Some(name) = self.events.pop() {
            for hook in self.events.hooks_for(&name) {
                hook.borrow_mut().run(&*self)?;
            }
            self.apply_commands()?;
        }
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
