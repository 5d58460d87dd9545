// system.rs - Systems and typed parameter injection
//
// A system is an erased callable plus the access descriptors of its formal
// parameters. The typed front end is any function or closure whose
// parameters implement SystemParam; registration collects the descriptors,
// validates the signature, and boxes an invoker that fetches each parameter
// from the world at every invocation.

use crate::ecs::{ClaimAccess, ClaimSet, Commands, EcsError, Query, Res, ResMut, World};
use std::any::{type_name, TypeId};
use std::cell::RefCell;
use std::rc::Rc;

/// What a single system parameter touches.
#[derive(Copy, Clone, Debug)]
pub enum ParamAccess {
    Component {
        type_id: TypeId,
        name: &'static str,
        mutable: bool,
    },
    Resource {
        type_id: TypeId,
        name: &'static str,
        mutable: bool,
    },
    Commands,
}

/// Name plus the flattened access set of a system's parameters.
pub struct SystemMeta {
    name: String,
    accesses: Vec<ParamAccess>,
}

impl SystemMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accesses: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accesses(&self) -> &[ParamAccess] {
        &self.accesses
    }

    pub(crate) fn push(&mut self, access: ParamAccess) {
        self.accesses.push(access);
    }
}

/// A value the world can construct for a system parameter at invocation.
pub trait SystemParam {
    type Item<'w>;

    /// Record what this parameter touches, for registration-time checks.
    fn describe(meta: &mut SystemMeta);

    /// Build the parameter from the world. This is the inject step.
    fn fetch(world: &World) -> Result<Self::Item<'_>, EcsError>;
}

impl<Q: ClaimSet> SystemParam for Query<'_, Q> {
    type Item<'w> = Query<'w, Q>;

    fn describe(meta: &mut SystemMeta) {
        let mut claims = Vec::new();
        Q::accesses(&mut claims);
        for claim in claims {
            if let ClaimAccess::Component {
                type_id,
                name,
                mutable,
            } = claim
            {
                meta.push(ParamAccess::Component {
                    type_id,
                    name,
                    mutable,
                });
            }
        }
    }

    fn fetch(world: &World) -> Result<Self::Item<'_>, EcsError> {
        world.query::<Q>()
    }
}

impl<R: 'static> SystemParam for Res<'_, R> {
    type Item<'w> = Res<'w, R>;

    fn describe(meta: &mut SystemMeta) {
        meta.push(ParamAccess::Resource {
            type_id: TypeId::of::<R>(),
            name: type_name::<R>(),
            mutable: false,
        });
    }

    fn fetch(world: &World) -> Result<Self::Item<'_>, EcsError> {
        world.resources.read::<R>()
    }
}

impl<R: 'static> SystemParam for ResMut<'_, R> {
    type Item<'w> = ResMut<'w, R>;

    fn describe(meta: &mut SystemMeta) {
        meta.push(ParamAccess::Resource {
            type_id: TypeId::of::<R>(),
            name: type_name::<R>(),
            mutable: true,
        });
    }

    fn fetch(world: &World) -> Result<Self::Item<'_>, EcsError> {
        world.resources.write::<R>()
    }
}

impl SystemParam for Commands<'_> {
    type Item<'w> = Commands<'w>;

    fn describe(meta: &mut SystemMeta) {
        meta.push(ParamAccess::Commands);
    }

    fn fetch(world: &World) -> Result<Self::Item<'_>, EcsError> {
        Ok(Commands::new(world.commands.borrow_mut(), &world.entities))
    }
}

/// A registered system: descriptors plus the boxed invoker.
pub struct ErasedSystem {
    meta: SystemMeta,
    invoker: Box<dyn FnMut(&World) -> Result<(), EcsError>>,
}

impl ErasedSystem {
    pub fn name(&self) -> &str {
        self.meta.name()
    }

    pub fn meta(&self) -> &SystemMeta {
        &self.meta
    }

    pub fn run(&mut self, world: &World) -> Result<(), EcsError> {
        (self.invoker)(world)
    }
}

pub(crate) type SystemCell = Rc<RefCell<ErasedSystem>>;

/// Conversion from a typed callable into an erased system. Implemented for
/// functions and closures of up to six injectable parameters.
pub trait IntoSystem<Marker> {
    fn into_system(self) -> ErasedSystem;
}

impl<F> IntoSystem<fn()> for F
where
    F: FnMut() + 'static,
{
    fn into_system(mut self) -> ErasedSystem {
        ErasedSystem {
            meta: SystemMeta::new(short_type_name(type_name::<F>())),
            invoker: Box::new(move |_world| {
                (self)();
                Ok(())
            }),
        }
    }
}

macro_rules! impl_into_system {
    ($($P:ident $p:ident),+) => {
        impl<F, $($P),+> IntoSystem<fn($($P,)+)> for F
        where
            F: FnMut($($P),+) + for<'w> FnMut($($P::Item<'w>),+) + 'static,
            $($P: SystemParam + 'static,)+
        {
            fn into_system(mut self) -> ErasedSystem {
                let mut meta = SystemMeta::new(short_type_name(type_name::<F>()));
                $($P::describe(&mut meta);)+
                ErasedSystem {
                    meta,
                    invoker: Box::new(move |world| {
                        // Calling through a monomorphic shim pins the
                        // parameter types fetched below onto the callable.
                        fn call_inner<$($P),+>(
                            f: &mut impl FnMut($($P),+),
                            $($p: $P,)+
                        ) {
                            f($($p),+)
                        }
                        $(let $p = $P::fetch(world)?;)+
                        call_inner(&mut self, $($p,)+);
                        Ok(())
                    }),
                }
            }
        }
    };
}

impl_into_system!(P0 p0);
impl_into_system!(P0 p0, P1 p1);
impl_into_system!(P0 p0, P1 p1, P2 p2);
impl_into_system!(P0 p0, P1 p1, P2 p2, P3 p3);
impl_into_system!(P0 p0, P1 p1, P2 p2, P3 p3, P4 p4);
impl_into_system!(P0 p0, P1 p1, P2 p2, P3 p3, P4 p4, P5 p5);

fn short_type_name(full: &'static str) -> &'static str {
    full.rsplit("::").next().unwrap_or(full)
}

/// Registration-time signature validation.
///
/// Rejects duplicate resource writes, read+write overlap on one resource,
/// a mutable component claim overlapping any other claim of the same type
/// across the whole parameter list, and more than one Commands parameter.
pub(crate) fn validate_system(meta: &SystemMeta) -> Result<(), EcsError> {
    let accesses = meta.accesses();
    let mut commands_seen = false;
    for (i, access) in accesses.iter().enumerate() {
        match access {
            ParamAccess::Commands => {
                if commands_seen {
                    return Err(invalid(meta, "more than one Commands parameter"));
                }
                commands_seen = true;
            }
            ParamAccess::Resource {
                type_id,
                name,
                mutable,
            } => {
                for other in &accesses[i + 1..] {
                    if let ParamAccess::Resource {
                        type_id: other_id,
                        mutable: other_mutable,
                        ..
                    } = other
                    {
                        if type_id != other_id {
                            continue;
                        }
                        if *mutable && *other_mutable {
                            return Err(invalid(
                                meta,
                                &format!("duplicate write access to resource {name}"),
                            ));
                        }
                        if *mutable || *other_mutable {
                            return Err(invalid(
                                meta,
                                &format!("resource {name} is both read and written"),
                            ));
                        }
                    }
                }
            }
            ParamAccess::Component {
                type_id,
                name,
                mutable,
            } => {
                for other in &accesses[i + 1..] {
                    if let ParamAccess::Component {
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
        }
    }
    Ok(())
}

fn invalid(meta: &SystemMeta, reason: &str) -> EcsError {
    EcsError::SystemSignatureInvalid {
        system: meta.name().to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Ref, RefMut};

    struct Position;
    struct Gravity;

    fn read_write_conflict(_a: Res<Gravity>, _b: ResMut<Gravity>) {}
    fn double_write(_a: ResMut<Gravity>, _b: ResMut<Gravity>) {}
    fn cross_query_alias(
        _a: Query<(RefMut<Position>,)>,
        _b: Query<(Ref<Position>,)>,
    ) {
    }
    fn well_formed(_a: Query<(Ref<Position>,)>, _b: Res<Gravity>, _c: Commands) {}

    #[test]
    fn read_and_write_of_one_resource_is_invalid() {
        let system = read_write_conflict.into_system();
        assert!(matches!(
            validate_system(system.meta()),
            Err(EcsError::SystemSignatureInvalid { .. })
        ));
    }

    #[test]
    fn two_writes_of_one_resource_is_invalid() {
        let system = double_write.into_system();
        assert!(matches!(
            validate_system(system.meta()),
            Err(EcsError::SystemSignatureInvalid { .. })
        ));
    }

    #[test]
    fn mutable_claim_conflicts_across_queries() {
        let system = cross_query_alias.into_system();
        assert!(matches!(
            validate_system(system.meta()),
            Err(EcsError::AliasViolation { .. })
        ));
    }

    #[test]
    fn disjoint_signature_passes() {
        let system = well_formed.into_system();
        assert!(validate_system(system.meta()).is_ok());
        assert_eq!(system.meta().accesses().len(), 3);
        assert_eq!(system.name(), "well_formed");
    }
}
