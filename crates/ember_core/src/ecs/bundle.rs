//! Component bundles: tuple-shaped groups of components added, removed,
//! probed and fetched together. The elementwise composition of the
//! single-component operations; a multi-fetch fails with the first missing
//! component's error.

use crate::ecs::{Component, ComponentRegistry, EcsError, Entity};
use std::cell;

/// A group of components handled as one unit. Implemented for tuples of up
/// to six component types.
pub trait ComponentBundle: 'static {
    /// Shared borrows of every component in the bundle, in tuple order.
    type Refs<'w>;

    /// Insert every component, overwriting existing values.
    fn insert_into(self, components: &mut ComponentRegistry, entity: Entity);

    /// Remove every component. Missing components are skipped.
    fn remove_from(components: &mut ComponentRegistry, entity: Entity);

    /// True iff the entity carries every component in the bundle.
    fn present_in(components: &ComponentRegistry, entity: Entity) -> bool;

    /// Fetch shared borrows of every component in the bundle.
    fn fetch(components: &ComponentRegistry, entity: Entity) -> Result<Self::Refs<'_>, EcsError>;
}

macro_rules! impl_component_bundle {
    ($(($T:ident, $idx:tt)),+) => {
        impl<$($T: Component),+> ComponentBundle for ($($T,)+) {
            type Refs<'w> = ($(cell::Ref<'w, $T>,)+);

            fn insert_into(self, components: &mut ComponentRegistry, entity: Entity) {
                $(components.insert(entity, self.$idx);)+
            }

            fn remove_from(components: &mut ComponentRegistry, entity: Entity) {
                $(components.remove::<$T>(entity);)+
            }

            fn present_in(components: &ComponentRegistry, entity: Entity) -> bool {
                $(components.has::<$T>(entity))&&+
            }

            fn fetch(
                components: &ComponentRegistry,
                entity: Entity,
            ) -> Result<Self::Refs<'_>, EcsError> {
                Ok(($(components.get::<$T>(entity)?,)+))
            }
        }
    };
}

impl_component_bundle!((A, 0));
impl_component_bundle!((A, 0), (B, 1));
impl_component_bundle!((A, 0), (B, 1), (C, 2));
impl_component_bundle!((A, 0), (B, 1), (C, 2), (D, 3));
impl_component_bundle!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4));
impl_component_bundle!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5));

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Position(i32, i32);

    #[derive(Debug, PartialEq)]
    struct Velocity(i32, i32);

    #[test]
    fn bundle_insert_and_fetch_round_trip() {
        let mut components = ComponentRegistry::new();
        let e = Entity::new(0, 1);
        (Position(1, 2), Velocity(3, 4)).insert_into(&mut components, e);
        assert!(<(Position, Velocity)>::present_in(&components, e));

        let (p, v) = <(Position, Velocity)>::fetch(&components, e).unwrap();
        assert_eq!(*p, Position(1, 2));
        assert_eq!(*v, Velocity(3, 4));
    }

    #[test]
    fn fetch_fails_with_first_missing_component() {
        let mut components = ComponentRegistry::new();
        let e = Entity::new(0, 1);
        (Velocity(3, 4),).insert_into(&mut components, e);

        let err = <(Position, Velocity)>::fetch(&components, e).unwrap_err();
        match err {
            EcsError::ComponentNotFound { component, .. } => {
                assert!(component.contains("Position"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn remove_is_elementwise_and_total() {
        let mut components = ComponentRegistry::new();
        let e = Entity::new(0, 1);
        (Position(1, 2),).insert_into(&mut components, e);
        // Velocity was never added; removal still succeeds for the rest.
        <(Position, Velocity)>::remove_from(&mut components, e);
        assert!(!<(Position,)>::present_in(&components, e));
    }
}
