// resource.rs - Globally unique, type-keyed singleton values
//
// At most one instance per type; adding again replaces the previous value.
// Values sit behind RefCells so systems can borrow them through a shared
// world reference, with the per-system aliasing rules keeping the borrows
// honest.

use crate::ecs::EcsError;
use std::any::{type_name, Any, TypeId};
use std::cell::{self, RefCell};
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

/// Singleton storage keyed by resource type.
#[derive(Default)]
pub struct ResourceRegistry {
    resources: HashMap<TypeId, RefCell<Box<dyn Any>>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resource, replacing any previous value of the same type.
    pub fn add<R: 'static>(&mut self, value: R) {
        self.resources
            .insert(TypeId::of::<R>(), RefCell::new(Box::new(value)));
    }

    pub fn contains<R: 'static>(&self) -> bool {
        self.resources.contains_key(&TypeId::of::<R>())
    }

    pub fn get<R: 'static>(&self) -> Result<cell::Ref<'_, R>, EcsError> {
        let cell = self
            .resources
            .get(&TypeId::of::<R>())
            .ok_or_else(missing::<R>)?;
        cell::Ref::filter_map(cell.borrow(), |boxed| boxed.downcast_ref::<R>())
            .map_err(|_| missing::<R>())
    }

    pub fn get_mut<R: 'static>(&self) -> Result<cell::RefMut<'_, R>, EcsError> {
        let cell = self
            .resources
            .get(&TypeId::of::<R>())
            .ok_or_else(missing::<R>)?;
        cell::RefMut::filter_map(cell.borrow_mut(), |boxed| boxed.downcast_mut::<R>())
            .map_err(|_| missing::<R>())
    }

    /// Shared access wrapped for system injection.
    pub fn read<R: 'static>(&self) -> Result<Res<'_, R>, EcsError> {
        Ok(Res { value: self.get()? })
    }

    /// Exclusive access wrapped for system injection.
    pub fn write<R: 'static>(&self) -> Result<ResMut<'_, R>, EcsError> {
        Ok(ResMut {
            value: self.get_mut()?,
        })
    }
}

fn missing<R>() -> EcsError {
    EcsError::ResourceNotFound {
        resource: type_name::<R>(),
    }
}

/// Read request: shared borrow of a resource for the duration of a system's
/// invocation.
pub struct Res<'w, R: 'static> {
    value: cell::Ref<'w, R>,
}

impl<R: 'static> Deref for Res<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.value
    }
}

/// Write request: exclusive borrow of a resource for the duration of a
/// system's invocation.
pub struct ResMut<'w, R: 'static> {
    value: cell::RefMut<'w, R>,
}

impl<R: 'static> Deref for ResMut<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.value
    }
}

impl<R: 'static> DerefMut for ResMut<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.value
    }
}
