//! # Entity Management
//!
//! Entities are bare integer handles drawn from `[0, capacity)`.
//!
//! There are no generation counters: once an id is released it may be
//! reissued by a later allocation, and any handle a caller kept will then
//! alias the new entity. Callers must discard ids as soon as they remove
//! them.

use std::collections::{BTreeSet, VecDeque};

use crate::error::{EcsError, EcsResult};
use crate::storage::SparseKey;

/// Entity handle. 32 bits wide unless the `wide-entities` feature is on.
#[cfg(not(feature = "wide-entities"))]
pub type Entity = u32;

/// Entity handle. 64 bits wide because the `wide-entities` feature is on.
#[cfg(feature = "wide-entities")]
pub type Entity = u64;

/// Default maximum number of simultaneously active entities.
pub const MAX_ENTITIES: usize = 10_000;

/// Capacity-bounded entity id allocator with FIFO reuse.
///
/// Ids start out free, in ascending order. Released ids go to the back of
/// the free queue, so they are reissued in the order they were released.
///
/// Never-issued ids are handed out from a counter, so construction cost
/// does not depend on the capacity.
///
/// Releasing an id does not touch component data; purging it is the job
/// of [`World::remove_entity`](crate::World::remove_entity).
#[derive(Clone, Debug)]
pub struct EntityAllocator {
    /// Next never-issued id.
    next_fresh: usize,
    /// Ids at or above `next_fresh` that were active from construction.
    reserved: BTreeSet<Entity>,
    /// Released ids, front is reissued first.
    recycled: VecDeque<Entity>,
    /// Currently active ids.
    active: BTreeSet<Entity>,
    /// Maximum number of active ids.
    capacity: usize,
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityAllocator {
    /// Creates an allocator with [`MAX_ENTITIES`] free ids.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_ENTITIES)
    }

    /// Creates an allocator with ids `0..capacity` all free.
    ///
    /// `capacity` is clamped to what [`Entity`] can represent.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_active(capacity, std::iter::empty())
    }

    /// Creates an allocator where the given ids are already active.
    ///
    /// Every other id in `0..capacity` is free, in ascending order. Ids at
    /// or beyond `capacity` are ignored.
    #[must_use]
    pub fn from_active(capacity: usize, active: impl IntoIterator<Item = Entity>) -> Self {
        let capacity = capacity.min(Entity::ABSENT.to_index());
        let active: BTreeSet<Entity> = active
            .into_iter()
            .filter(|entity| entity.to_index() < capacity)
            .collect();

        Self {
            next_fresh: 0,
            reserved: active.clone(),
            recycled: VecDeque::new(),
            active,
            capacity,
        }
    }

    /// Returns the maximum number of active entities.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Issues the next free id and marks it active.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::CapacityExceeded`] when every id is active. The
    /// allocator is unchanged in that case.
    pub fn add_entity(&mut self) -> EcsResult<Entity> {
        let Some(entity) = self.next_free() else {
            tracing::warn!(limit = self.capacity, "entity capacity reached");
            return Err(EcsError::CapacityExceeded {
                limit: self.capacity,
            });
        };

        self.active.insert(entity);
        tracing::trace!(entity = entity.to_u64(), "entity allocated");
        Ok(entity)
    }

    /// Marks `entity` free and queues it for reuse.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotActive`] if `entity` is not active. The
    /// allocator is unchanged in that case.
    pub fn remove_entity(&mut self, entity: Entity) -> EcsResult<()> {
        if !self.active.remove(&entity) {
            return Err(EcsError::EntityNotActive(entity.to_u64()));
        }
        self.recycled.push_back(entity);
        tracing::trace!(entity = entity.to_u64(), "entity released");
        Ok(())
    }

    /// Checks whether `entity` is active.
    #[inline]
    #[must_use]
    pub fn has_entity(&self, entity: Entity) -> bool {
        self.active.contains(&entity)
    }

    /// Number of active entities.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.active.len()
    }

    /// The active ids, in ascending order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &BTreeSet<Entity> {
        &self.active
    }

    /// Fresh ids come before recycled ones: they were all free before the
    /// first release.
    fn next_free(&mut self) -> Option<Entity> {
        while self.next_fresh < self.capacity {
            let entity = Entity::from_index(self.next_fresh);
            self.next_fresh += 1;
            if !self.reserved.remove(&entity) {
                return Some(entity);
            }
        }
        self.recycled.pop_front()
    }
}
