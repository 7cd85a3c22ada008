//! # ECS World
//!
//! The single entry point for callers. Composes the entity allocator with
//! the component registry and guarantees that no component data outlives
//! its entity.

use std::collections::BTreeSet;

use super::component::{Component, ComponentTuple};
use super::entity::{Entity, EntityAllocator};
use super::registry::Registry;
use crate::config::StorageConfig;
use crate::error::{EcsError, EcsResult};
use crate::storage::SparseKey;

/// The ECS World - container for all entities and their components.
///
/// References returned by accessors stay valid until the next structural
/// mutation. Dense positions are never exposed across calls.
///
/// # Example
///
/// ```rust
/// use easys_core::World;
///
/// #[derive(Debug, PartialEq)]
/// struct Position { x: f32, y: f32 }
/// struct Velocity { dx: f32, dy: f32 }
///
/// let mut world = World::new();
/// let entity = world.add_entity()?;
/// world.add_component(entity, Position { x: 0.0, y: 0.0 })?;
/// world.add_component(entity, Velocity { dx: 1.0, dy: 0.5 })?;
///
/// for e in world.get_entities_by_components::<(Position, Velocity)>() {
///     let (dx, dy) = {
///         let v = world.get_component::<Velocity>(e)?;
///         (v.dx, v.dy)
///     };
///     let p = world.get_component_mut::<Position>(e)?;
///     p.x += dx;
///     p.y += dy;
/// }
///
/// world.remove_entity(entity)?;
/// assert!(!world.has_component::<Position>(entity));
/// # Ok::<(), easys_core::EcsError>(())
/// ```
#[derive(Debug)]
pub struct World {
    entities: EntityAllocator,
    registry: Registry,
    config: StorageConfig,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty world with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StorageConfig::default())
    }

    /// Creates an empty world with the given bounds.
    ///
    /// Bounds beyond what [`Entity`] can represent are clamped. Use
    /// [`StorageConfig::validate`] to reject them instead.
    #[must_use]
    pub fn with_config(config: StorageConfig) -> Self {
        Self::from_entities_with_config(config, std::iter::empty())
    }

    /// Creates a world whose given ids are already active, with the
    /// default configuration.
    ///
    /// Every other id is immediately available for allocation.
    #[must_use]
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        Self::from_entities_with_config(StorageConfig::default(), entities)
    }

    /// Creates a world whose given ids are already active.
    ///
    /// Ids at or beyond `config.max_entities` are ignored.
    #[must_use]
    pub fn from_entities_with_config(
        config: StorageConfig,
        entities: impl IntoIterator<Item = Entity>,
    ) -> Self {
        Self {
            entities: EntityAllocator::from_active(config.max_entities, entities),
            registry: Registry::with_key_limit(config.key_limit()),
            config,
        }
    }

    /// The configuration this world was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Read-only access to the component registry.
    #[inline]
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Allocates a new entity.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::CapacityExceeded`] when `max_entities` are
    /// active. Nothing changes in that case.
    pub fn add_entity(&mut self) -> EcsResult<Entity> {
        self.entities.add_entity()
    }

    /// Removes an entity together with all of its components.
    ///
    /// The id becomes available for reuse; callers must drop any copy of
    /// it they still hold.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotActive`] if `entity` is not active.
    /// Nothing changes in that case.
    pub fn remove_entity(&mut self, entity: Entity) -> EcsResult<()> {
        if !self.entities.has_entity(entity) {
            return Err(EcsError::EntityNotActive(entity.to_u64()));
        }
        self.registry.remove_components(entity);
        self.entities.remove_entity(entity)
    }

    /// Checks whether `entity` is active.
    #[inline]
    #[must_use]
    pub fn has_entity(&self, entity: Entity) -> bool {
        self.entities.has_entity(entity)
    }

    /// The active entities, in ascending order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &BTreeSet<Entity> {
        self.entities.entities()
    }

    /// Number of active entities.
    #[inline]
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.count()
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Attaches `component` to `entity`, replacing any previous `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotActive`] if `entity` is not active, or
    /// [`EcsError::CapacityExceeded`] if it is beyond the sparse key limit.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<()> {
        if !self.entities.has_entity(entity) {
            return Err(EcsError::EntityNotActive(entity.to_u64()));
        }
        self.registry.add_component(entity, component)
    }

    /// Detaches and returns the entity's `T`. No-op if absent.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.registry.remove_component(entity)
    }

    /// Returns the entity's `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotFound`] if the entity has no `T`.
    pub fn get_component<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.registry.get_component(entity)
    }

    /// Returns the entity's `T` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotFound`] if the entity has no `T`.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.registry.get_component_mut(entity)
    }

    /// Checks whether the entity has a `T`.
    #[must_use]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.registry.has_component::<T>(entity)
    }

    /// Entities holding a `T`, in packing order.
    #[must_use]
    pub fn get_entities_by_component<T: Component>(&self) -> &[Entity] {
        self.registry.get_entities_by_component::<T>()
    }

    /// Entities holding every type in `Q`, sorted ascending.
    #[must_use]
    pub fn get_entities_by_components<Q: ComponentTuple>(&self) -> Vec<Entity> {
        self.registry.get_entities_by_components::<Q>()
    }

    /// All stored `T` values, in packing order.
    #[must_use]
    pub fn components<T: Component>(&self) -> &[T] {
        self.registry.components::<T>()
    }

    /// All stored `T` values, mutably.
    pub fn components_mut<T: Component>(&mut self) -> &mut [T] {
        self.registry.components_mut::<T>()
    }

    /// Total number of stored components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.registry.size()
    }

    /// Number of stored components of the types in `Q`.
    #[must_use]
    pub fn component_count_of<Q: ComponentTuple>(&self) -> usize {
        self.registry.size_of::<Q>()
    }

    /// Drops all data of the types in `Q`. Entities stay active.
    pub fn clear_components<Q: ComponentTuple>(&mut self) {
        self.registry.clear_types::<Q>();
    }

    /// Resets entities and components to the initial empty state.
    pub fn clear(&mut self) {
        tracing::debug!(
            entities = self.entities.count(),
            components = self.registry.size(),
            "world cleared"
        );
        *self = Self::with_config(self.config.clone());
    }
}
