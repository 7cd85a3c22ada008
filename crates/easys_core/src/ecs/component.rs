//! # Component System
//!
//! Components are plain data attached to entities, keyed by their type.
//! Any `Send + Sync + 'static` type is a component; storage for a type is
//! created the first time a value of that type is added.

use std::any::{type_name, Any, TypeId};

use super::entity::Entity;
use crate::storage::SparseSet;

/// Marker trait for ECS components.
///
/// Implemented for every `Send + Sync + 'static` type.
///
/// # Example
///
/// ```rust
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// struct Position {
///     x: f32,
///     y: f32,
/// }
///
/// fn assert_component<T: easys_core::Component>() {}
/// assert_component::<Position>();
/// ```
pub trait Component: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Component for T {}

/// A list of component types, written as a tuple: `(A,)`, `(A, B)`, ...
///
/// Used by the multi-type operations of the registry. Implemented for
/// tuples of one to eight components.
pub trait ComponentTuple: 'static {
    /// Number of types in the tuple.
    const LEN: usize;

    /// Calls `visit` with the id and name of each type, in tuple order.
    fn for_each_type(visit: &mut dyn FnMut(TypeId, &'static str));

    /// Distinct type ids of the tuple, sorted.
    #[must_use]
    fn distinct_type_ids() -> Vec<TypeId> {
        let mut ids = Vec::with_capacity(Self::LEN);
        Self::for_each_type(&mut |id: TypeId, _: &'static str| ids.push(id));
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

macro_rules! impl_component_tuple {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentTuple for ($($name,)+) {
            const LEN: usize = [$(stringify!($name)),+].len();

            fn for_each_type(visit: &mut dyn FnMut(TypeId, &'static str)) {
                $(visit(TypeId::of::<$name>(), type_name::<$name>());)+
            }
        }
    };
}

impl_component_tuple!(A);
impl_component_tuple!(A, B);
impl_component_tuple!(A, B, C);
impl_component_tuple!(A, B, C, D);
impl_component_tuple!(A, B, C, D, E);
impl_component_tuple!(A, B, C, D, E, F);
impl_component_tuple!(A, B, C, D, E, F, G);
impl_component_tuple!(A, B, C, D, E, F, G, H);

/// Type-erased view of one component type's sparse set.
///
/// Lets the registry purge, count and clear every storage without knowing
/// the concrete component types.
pub(crate) trait ComponentStorage: Send + Sync {
    /// Drops the entity's component, returning whether one was stored.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    fn contains(&self, entity: Entity) -> bool;

    fn len(&self) -> usize;

    /// Entities holding this component, in packing order.
    fn entities(&self) -> &[Entity];

    fn clear(&mut self);

    fn component_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ComponentStorage for SparseSet<Entity, T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn contains(&self, entity: Entity) -> bool {
        SparseSet::contains(self, entity)
    }

    fn len(&self) -> usize {
        SparseSet::len(self)
    }

    fn entities(&self) -> &[Entity] {
        self.keys()
    }

    fn clear(&mut self) {
        SparseSet::clear(self);
    }

    fn component_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
