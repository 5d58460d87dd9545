// query.rs - Typed cursors over entities holding a set of components
//
// A query is a tuple of access claims: Ref<T> for shared component access,
// RefMut<T> for exclusive access, or Entity for the owning handle.
// Construction borrows every claimed column out of the component registry
// (shared or exclusive to match the claim) and holds those borrows for the
// query's lifetime, so any structural mutation attempted mid-iteration
// trips the column's RefCell instead of invalidating rows. The command
// buffer is the sanctioned channel for mutation while a query is live.
//
// Iteration walks the smallest claimed column and probes the remaining
// ones, yielding claim-order tuples. Cost is O(min-column * claims).

use crate::ecs::{AnyColumn, Column, Component, ComponentRegistry, EcsError, Entity, EntityRegistry};
use std::any::{type_name, TypeId};
use std::cell::{self, RefCell};
use std::marker::PhantomData;

/// Claim for shared access to component `T`.
pub struct Ref<T>(PhantomData<T>);

/// Claim for exclusive access to component `T`.
pub struct RefMut<T>(PhantomData<T>);

/// What a single claim touches; used for alias checks at query construction
/// and for system-signature validation at registration.
#[derive(Copy, Clone, Debug)]
pub enum ClaimAccess {
    Component {
        type_id: TypeId,
        name: &'static str,
        mutable: bool,
    },
    Entity,
}

/// Borrow of one claimed column, held for the query's lifetime.
pub enum ColumnGuard<'w> {
    Read(cell::Ref<'w, Box<dyn AnyColumn>>),
    Write(cell::RefMut<'w, Box<dyn AnyColumn>>),
    /// Claimed component type has no column yet: the query is empty.
    Missing,
    /// Entity claims borrow nothing.
    Entities,
}

impl std::fmt::Debug for ColumnGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnGuard::Read(_) => f.write_str("ColumnGuard::Read(..)"),
            ColumnGuard::Write(_) => f.write_str("ColumnGuard::Write(..)"),
            ColumnGuard::Missing => f.write_str("ColumnGuard::Missing"),
            ColumnGuard::Entities => f.write_str("ColumnGuard::Entities"),
        }
    }
}

impl ColumnGuard<'_> {
    /// Column length, or None for claims that cannot drive iteration.
    fn len(&self) -> Option<usize> {
        match self {
            ColumnGuard::Read(column) => Some(column.len()),
            ColumnGuard::Write(column) => Some(column.len()),
            ColumnGuard::Missing => Some(0),
            ColumnGuard::Entities => None,
        }
    }

    fn contains(&self, id: u32) -> bool {
        match self {
            ColumnGuard::Read(column) => column.contains(id),
            ColumnGuard::Write(column) => column.contains(id),
            ColumnGuard::Missing => false,
            ColumnGuard::Entities => true,
        }
    }

    fn entity_at(&self, row: usize) -> u32 {
        match self {
            ColumnGuard::Read(column) => column.entity_at(row),
            ColumnGuard::Write(column) => column.entity_at(row),
            ColumnGuard::Missing | ColumnGuard::Entities => unreachable!("guard cannot drive"),
        }
    }
}

/// One access claim inside a query tuple.
pub trait Claim {
    type Item<'q>;

    fn access() -> ClaimAccess;

    fn acquire(components: &ComponentRegistry) -> ColumnGuard<'_>;

    /// Fetch the claimed value for one entity.
    ///
    /// # Safety
    /// The caller must keep the guard alive and unmoved for `'q`, and must
    /// not fetch the same (column, row) twice while a mutable item from it
    /// is still live. The query iterator guarantees both: guards live in
    /// the query for the whole borrow and every entity is visited once per
    /// pass.
    unsafe fn fetch<'q>(guard: &mut ColumnGuard<'_>, entity: Entity) -> Option<Self::Item<'q>>;
}

impl<T: Component> Claim for Ref<T> {
    type Item<'q> = &'q T;

    fn access() -> ClaimAccess {
        ClaimAccess::Component {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
            mutable: false,
        }
    }

    fn acquire(components: &ComponentRegistry) -> ColumnGuard<'_> {
        match components.cell(TypeId::of::<T>()) {
            Some(cell) => ColumnGuard::Read(cell.borrow()),
            None => ColumnGuard::Missing,
        }
    }

    unsafe fn fetch<'q>(guard: &mut ColumnGuard<'_>, entity: Entity) -> Option<Self::Item<'q>> {
        let ColumnGuard::Read(column) = guard else {
            return None;
        };
        let value = column.as_any().downcast_ref::<Column<T>>()?.get(entity.id)?;
        // Safety: see trait contract; the guard outlives 'q.
        Some(unsafe { &*(value as *const T) })
    }
}

impl<T: Component> Claim for RefMut<T> {
    type Item<'q> = &'q mut T;

    fn access() -> ClaimAccess {
        ClaimAccess::Component {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
            mutable: true,
        }
    }

    fn acquire(components: &ComponentRegistry) -> ColumnGuard<'_> {
        match components.cell(TypeId::of::<T>()) {
            Some(cell) => ColumnGuard::Write(cell.borrow_mut()),
            None => ColumnGuard::Missing,
        }
    }

    unsafe fn fetch<'q>(guard: &mut ColumnGuard<'_>, entity: Entity) -> Option<Self::Item<'q>> {
        let ColumnGuard::Write(column) = guard else {
            return None;
        };
        let value = column
            .as_any_mut()
            .downcast_mut::<Column<T>>()?
            .get_mut(entity.id)?;
        // Safety: claims are alias-checked at construction and rows are
        // visited at most once per pass, so this &mut is unique.
        Some(unsafe { &mut *(value as *mut T) })
    }
}

impl Claim for Entity {
    type Item<'q> = Entity;

    fn access() -> ClaimAccess {
        ClaimAccess::Entity
    }

    fn acquire(_components: &ComponentRegistry) -> ColumnGuard<'_> {
        ColumnGuard::Entities
    }

    unsafe fn fetch<'q>(_guard: &mut ColumnGuard<'_>, entity: Entity) -> Option<Self::Item<'q>> {
        Some(entity)
    }
}

/// A tuple of claims, fetched together per matching entity.
pub trait ClaimSet: 'static {
    type Row<'q>;

    fn accesses(out: &mut Vec<ClaimAccess>);

    fn acquire(components: &ComponentRegistry) -> Vec<ColumnGuard<'_>>;

    /// # Safety
    /// Same contract as [`Claim::fetch`], applied to every guard.
    unsafe fn fetch_row<'q>(
        guards: &mut [ColumnGuard<'_>],
        entity: Entity,
    ) -> Option<Self::Row<'q>>;
}

macro_rules! impl_claim_set {
    ($($C:ident),+) => {
        impl<$($C: Claim + 'static),+> ClaimSet for ($($C,)+) {
            type Row<'q> = ($($C::Item<'q>,)+);

            fn accesses(out: &mut Vec<ClaimAccess>) {
                $(out.push($C::access());)+
            }

            fn acquire(components: &ComponentRegistry) -> Vec<ColumnGuard<'_>> {
                vec![$($C::acquire(components)),+]
            }

            unsafe fn fetch_row<'q>(
                guards: &mut [ColumnGuard<'_>],
                entity: Entity,
            ) -> Option<Self::Row<'q>> {
                let mut guards = guards.iter_mut();
                Some(($(unsafe { $C::fetch(guards.next()?, entity)? },)+))
            }
        }
    };
}

impl_claim_set!(A);
impl_claim_set!(A, B);
impl_claim_set!(A, B, C);
impl_claim_set!(A, B, C, D);
impl_claim_set!(A, B, C, D, E);
impl_claim_set!(A, B, C, D, E, F);
impl_claim_set!(A, B, C, D, E, F, G);
impl_claim_set!(A, B, C, D, E, F, G, H);

/// Reject a claim set that names the same component type twice with at
/// least one exclusive claim.
pub(crate) fn validate_claims(accesses: &[ClaimAccess]) -> Result<(), EcsError> {
    for (i, claim) in accesses.iter().enumerate() {
        let ClaimAccess::Component {
            type_id,
            name,
            mutable,
        } = claim
        else {
            continue;
        };
        for other in &accesses[i + 1..] {
            if let ClaimAccess::Component {
                type_id: other_id,
                mutable: other_mutable,
                ..
            } = other
            {
                if type_id == other_id && (*mutable || *other_mutable) {
                    return Err(EcsError::AliasViolation { component: *name });
                }
            }
        }
    }
    Ok(())
}

/// Cursor over every live entity holding all claimed components.
///
/// Restartable: `iter` may be called any number of times while the query is
/// alive. The claimed columns stay borrowed for the query's whole lifetime.
pub struct Query<'w, Q: ClaimSet> {
    guards: Vec<ColumnGuard<'w>>,
    entities: &'w RefCell<EntityRegistry>,
    driver: Option<usize>,
    claims: PhantomData<Q>,
}

impl<'w, Q: ClaimSet> std::fmt::Debug for Query<'w, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("guards", &self.guards)
            .field("driver", &self.driver)
            .finish()
    }
}

impl<'w, Q: ClaimSet> Query<'w, Q> {
    pub(crate) fn new(
        components: &'w ComponentRegistry,
        entities: &'w RefCell<EntityRegistry>,
    ) -> Result<Self, EcsError> {
        let mut accesses = Vec::new();
        Q::accesses(&mut accesses);
        validate_claims(&accesses)?;

        let guards = Q::acquire(components);
        let driver = guards
            .iter()
            .enumerate()
            .filter_map(|(index, guard)| guard.len().map(|len| (index, len)))
            .min_by_key(|&(_, len)| len)
            .map(|(index, _)| index);

        Ok(Self {
            guards,
            entities,
            driver,
            claims: PhantomData,
        })
    }

    /// Iterate matching entities, yielding the claimed values in claim
    /// order. Candidates come from the smallest claimed column; the
    /// remaining columns are probed per candidate.
    pub fn iter(&mut self) -> QueryIter<'_, 'w, Q> {
        let matches = self.collect_candidates();
        QueryIter {
            query: self,
            matches,
            cursor: 0,
        }
    }

    fn collect_candidates(&self) -> Vec<Entity> {
        let entities = self.entities.borrow();
        match self.driver {
            Some(driver) => {
                let guard = &self.guards[driver];
                let len = guard.len().unwrap_or(0);
                (0..len)
                    .filter_map(|row| entities.handle(guard.entity_at(row)))
                    .collect()
            }
            // No component claims: every live entity matches.
            None => entities.iter().collect(),
        }
    }
}

pub struct QueryIter<'q, 'w, Q: ClaimSet> {
    query: &'q mut Query<'w, Q>,
    matches: Vec<Entity>,
    cursor: usize,
}

impl<'q, 'w, Q: ClaimSet> Iterator for QueryIter<'q, 'w, Q> {
    type Item = Q::Row<'q>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor < self.matches.len() {
            let entity = self.matches[self.cursor];
            self.cursor += 1;
            if !self.query.guards.iter().all(|guard| guard.contains(entity.id)) {
                continue;
            }
            // Safety: the guards live inside the query, which stays borrowed
            // for 'q; each candidate entity appears exactly once per pass,
            // and construction rejected aliasing mutable claims.
            let row: Option<Q::Row<'q>> =
                unsafe { Q::fetch_row(&mut self.query.guards, entity) };
            if row.is_some() {
                return row;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::ComponentRegistry;

    #[derive(Debug, PartialEq)]
    struct Position {
        x: i32,
        y: i32,
    }

    #[derive(Debug, PartialEq)]
    struct Velocity {
        x: i32,
        y: i32,
    }

    fn world_fixture() -> (ComponentRegistry, RefCell<EntityRegistry>) {
        let mut components = ComponentRegistry::new();
        let entities = RefCell::new(EntityRegistry::new());
        let e1 = entities.borrow_mut().spawn();
        let e2 = entities.borrow_mut().spawn();
        let e3 = entities.borrow_mut().spawn();
        components.insert(e1, Position { x: 1, y: 2 });
        components.insert(e1, Velocity { x: 3, y: 4 });
        components.insert(e2, Position { x: 6, y: 7 });
        components.insert(e3, Position { x: 11, y: 12 });
        components.insert(e3, Velocity { x: 13, y: 14 });
        (components, entities)
    }

    #[test]
    fn iterates_entities_holding_all_claims() {
        let (components, entities) = world_fixture();
        let mut query =
            Query::<(RefMut<Position>, Ref<Velocity>)>::new(&components, &entities).unwrap();
        let mut visited = 0;
        for (position, velocity) in query.iter() {
            position.x += velocity.x;
            position.y += velocity.y;
            visited += 1;
        }
        assert_eq!(visited, 2);
        // Release the column borrows before direct registry access.
        drop(query);

        let e1 = Entity::new(0, 1);
        let e2 = Entity::new(1, 1);
        assert_eq!(*components.get::<Position>(e1).unwrap(), Position { x: 4, y: 6 });
        assert_eq!(*components.get::<Position>(e2).unwrap(), Position { x: 6, y: 7 });
    }

    #[test]
    fn query_is_restartable() {
        let (components, entities) = world_fixture();
        let mut query = Query::<(Ref<Position>,)>::new(&components, &entities).unwrap();
        assert_eq!(query.iter().count(), 3);
        assert_eq!(query.iter().count(), 3);
    }

    #[test]
    fn entity_claim_yields_live_handles() {
        let (components, entities) = world_fixture();
        let mut query = Query::<(Entity, Ref<Velocity>)>::new(&components, &entities).unwrap();
        let ids: Vec<u32> = query.iter().map(|(entity, _)| entity.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&0) && ids.contains(&2));
    }

    #[test]
    fn aliased_mutable_claims_are_rejected() {
        let (components, entities) = world_fixture();
        let err = Query::<(RefMut<Position>, Ref<Position>)>::new(&components, &entities)
            .unwrap_err();
        assert!(matches!(err, EcsError::AliasViolation { .. }));
    }

    #[test]
    fn unregistered_component_means_empty_query() {
        struct Unseen;
        let (components, entities) = world_fixture();
        let mut query =
            Query::<(Ref<Position>, Ref<Unseen>)>::new(&components, &entities).unwrap();
        assert_eq!(query.iter().count(), 0);
    }

    #[test]
    fn shared_claims_of_the_same_type_are_allowed() {
        let (components, entities) = world_fixture();
        let mut query =
            Query::<(Ref<Position>, Ref<Position>)>::new(&components, &entities).unwrap();
        assert_eq!(query.iter().count(), 3);
    }
}
