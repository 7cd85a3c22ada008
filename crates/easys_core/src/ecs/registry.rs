//! # Component Registry
//!
//! Owns one sparse set per component type and routes typed operations to
//! it. Implements the cross-type intersection query.
//!
//! Single-item access is strict: asking for a component an entity does not
//! carry is an error. Aggregate and multi-type operations are permissive: a
//! type that was never added contributes nothing and never raises.

use std::any::{type_name, TypeId};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use super::component::{Component, ComponentStorage, ComponentTuple};
use super::entity::{Entity, MAX_ENTITIES};
use crate::error::{EcsError, EcsResult};
use crate::storage::{SparseKey, SparseSet};

/// Type-indexed collection of component storages.
///
/// # Example
///
/// ```rust
/// use easys_core::Registry;
///
/// struct Health(u32);
///
/// let mut registry = Registry::new();
/// registry.add_component(3, Health(10))?;
/// assert_eq!(registry.get_component::<Health>(3)?.0, 10);
/// assert!(registry.get_component::<Health>(4).is_err());
/// # Ok::<(), easys_core::EcsError>(())
/// ```
pub struct Registry {
    storages: HashMap<TypeId, Box<dyn ComponentStorage>>,
    /// Key bound each new sparse set is created with.
    key_limit: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for storage in self.storages.values() {
            map.entry(&storage.component_name(), &storage.len());
        }
        map.finish()
    }
}

impl Registry {
    /// Creates an empty registry accepting entities below [`MAX_ENTITIES`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_key_limit(MAX_ENTITIES)
    }

    /// Creates an empty registry whose storages accept entities strictly
    /// below `key_limit`.
    #[must_use]
    pub fn with_key_limit(key_limit: usize) -> Self {
        Self {
            storages: HashMap::new(),
            key_limit: key_limit.min(Entity::ABSENT.to_index()),
        }
    }

    /// Exclusive upper bound on entity ids.
    #[inline]
    #[must_use]
    pub const fn key_limit(&self) -> usize {
        self.key_limit
    }

    /// Attaches `component` to `entity`, replacing any previous value.
    ///
    /// Storage for `T` is created on first use.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::CapacityExceeded`] if `entity` is beyond the key
    /// limit. Nothing is created or stored in that case.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<()> {
        if entity.to_index() >= self.key_limit {
            tracing::warn!(
                entity = entity.to_u64(),
                limit = self.key_limit,
                "component rejected, entity beyond key limit"
            );
            return Err(EcsError::CapacityExceeded {
                limit: self.key_limit,
            });
        }

        let key_limit = self.key_limit;
        self.storages.entry(TypeId::of::<T>()).or_insert_with(|| {
            tracing::debug!(component = type_name::<T>(), "component storage created");
            Box::new(SparseSet::<Entity, T>::with_key_limit(key_limit))
        });

        self.storage_mut::<T>()
            .ok_or_else(|| not_found::<T>(entity))?
            .set(entity, component)
    }

    /// Detaches and returns the entity's `T`. No-op if absent.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.storage_mut::<T>()?.remove(entity)
    }

    /// Purges `entity` from every storage.
    ///
    /// Cost is proportional to the number of registered component types.
    /// Returns how many components were removed.
    pub fn remove_components(&mut self, entity: Entity) -> usize {
        let removed: usize = self
            .storages
            .values_mut()
            .map(|storage| usize::from(storage.remove_entity(entity)))
            .sum();
        tracing::trace!(entity = entity.to_u64(), removed, "components purged");
        removed
    }

    /// Returns the entity's `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotFound`] if the entity has no `T`.
    pub fn get_component<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.storage::<T>()
            .and_then(|set| set.get(entity).ok())
            .ok_or_else(|| not_found::<T>(entity))
    }

    /// Returns the entity's `T` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotFound`] if the entity has no `T`.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.storage_mut::<T>()
            .and_then(|set| set.get_mut(entity).ok())
            .ok_or_else(|| not_found::<T>(entity))
    }

    /// Checks whether the entity has a `T`.
    #[must_use]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.storages
            .get(&TypeId::of::<T>())
            .is_some_and(|storage| storage.contains(entity))
    }

    /// Entities holding a `T`, in packing order.
    ///
    /// Empty if `T` was never added.
    #[must_use]
    pub fn get_entities_by_component<T: Component>(&self) -> &[Entity] {
        self.storage::<T>().map(SparseSet::keys).unwrap_or_default()
    }

    /// Entities holding every type in `Q`, sorted ascending.
    ///
    /// Key lists are intersected smallest first with a sorted two-pointer
    /// merge. A type that was never added, or holds no entities, makes the
    /// result empty.
    ///
    /// ```rust
    /// use easys_core::Registry;
    ///
    /// struct Position;
    /// struct Velocity;
    ///
    /// let mut registry = Registry::new();
    /// registry.add_component(1, Position)?;
    /// registry.add_component(2, Position)?;
    /// registry.add_component(2, Velocity)?;
    /// assert_eq!(registry.get_entities_by_components::<(Position, Velocity)>(), vec![2]);
    /// # Ok::<(), easys_core::EcsError>(())
    /// ```
    #[must_use]
    pub fn get_entities_by_components<Q: ComponentTuple>(&self) -> Vec<Entity> {
        let mut candidates: Vec<&[Entity]> = Vec::with_capacity(Q::LEN);
        let mut missing = false;
        Q::for_each_type(&mut |id: TypeId, _: &'static str| match self.storages.get(&id) {
            Some(storage) if !storage.entities().is_empty() => {
                candidates.push(storage.entities());
            }
            _ => missing = true,
        });
        if missing {
            return Vec::new();
        }

        candidates.sort_by_key(|keys| keys.len());
        let mut lists = candidates.into_iter();
        let Some(first) = lists.next() else {
            return Vec::new();
        };

        let mut result = first.to_vec();
        result.sort_unstable();
        for keys in lists {
            if result.is_empty() {
                break;
            }
            let mut sorted = keys.to_vec();
            sorted.sort_unstable();
            result = intersect_sorted(&result, &sorted);
        }
        result
    }

    /// All stored `T` values, in packing order.
    ///
    /// Parallel to [`Registry::get_entities_by_component`].
    #[must_use]
    pub fn components<T: Component>(&self) -> &[T] {
        self.storage::<T>().map(SparseSet::values).unwrap_or_default()
    }

    /// All stored `T` values, mutably.
    pub fn components_mut<T: Component>(&mut self) -> &mut [T] {
        self.storage_mut::<T>()
            .map(SparseSet::values_mut)
            .unwrap_or_default()
    }

    /// Total number of stored components across all types.
    #[must_use]
    pub fn size(&self) -> usize {
        self.storages.values().map(|storage| storage.len()).sum()
    }

    /// Number of stored components of the types in `Q`.
    ///
    /// Unknown types contribute zero. Repeated types are counted once.
    #[must_use]
    pub fn size_of<Q: ComponentTuple>(&self) -> usize {
        Q::distinct_type_ids()
            .iter()
            .filter_map(|id| self.storages.get(id))
            .map(|storage| storage.len())
            .sum()
    }

    /// Number of component types that have storage.
    #[must_use]
    pub fn component_types(&self) -> usize {
        self.storages.len()
    }

    /// Drops every storage.
    pub fn clear(&mut self) {
        tracing::debug!(types = self.storages.len(), "registry cleared");
        self.storages.clear();
    }

    /// Drops the data of the types in `Q`. Unknown types are ignored.
    pub fn clear_types<Q: ComponentTuple>(&mut self) {
        Q::for_each_type(&mut |id: TypeId, name: &'static str| {
            if let Some(storage) = self.storages.get_mut(&id) {
                storage.clear();
                tracing::debug!(component = name, "component storage cleared");
            }
        });
    }

    fn storage<T: Component>(&self) -> Option<&SparseSet<Entity, T>> {
        self.storages
            .get(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any().downcast_ref())
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut SparseSet<Entity, T>> {
        self.storages
            .get_mut(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any_mut().downcast_mut())
    }
}

fn not_found<T: Component>(entity: Entity) -> EcsError {
    EcsError::ComponentNotFound {
        entity: entity.to_u64(),
        component: type_name::<T>(),
    }
}

/// Intersects two ascending slices with a two-pointer merge.
fn intersect_sorted(left: &[Entity], right: &[Entity]) -> Vec<Entity> {
    let mut out = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.push(left[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}
