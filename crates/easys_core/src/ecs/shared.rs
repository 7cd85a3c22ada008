//! # Shared World
//!
//! The core types have no internal synchronization. `SharedWorld` puts a
//! [`World`] behind a reader-writer lock so that several threads can use
//! it under a single-writer discipline: any number of readers, or exactly
//! one writer, for the duration of each guard.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::world::World;

/// Cloneable handle to a lock-protected [`World`].
///
/// # Example
///
/// ```rust
/// use easys_core::{SharedWorld, World};
///
/// let shared = SharedWorld::new(World::new());
/// let entity = shared.write().add_entity()?;
/// assert!(shared.read().has_entity(entity));
/// # Ok::<(), easys_core::EcsError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct SharedWorld {
    inner: Arc<RwLock<World>>,
}

impl SharedWorld {
    /// Wraps `world` for shared use.
    #[must_use]
    pub fn new(world: World) -> Self {
        Self {
            inner: Arc::new(RwLock::new(world)),
        }
    }

    /// Blocks until shared read access is available.
    pub fn read(&self) -> RwLockReadGuard<'_, World> {
        self.inner.read()
    }

    /// Blocks until exclusive write access is available.
    pub fn write(&self) -> RwLockWriteGuard<'_, World> {
        self.inner.write()
    }

    /// Returns read access if no writer holds the lock.
    pub fn try_read(&self) -> Option<RwLockReadGuard<'_, World>> {
        self.inner.try_read()
    }

    /// Returns write access if nobody holds the lock.
    pub fn try_write(&self) -> Option<RwLockWriteGuard<'_, World>> {
        self.inner.try_write()
    }

    /// Unwraps the world if this is the last handle.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged if other handles are still alive.
    pub fn into_inner(self) -> Result<World, Self> {
        Arc::try_unwrap(self.inner)
            .map(|lock| lock.into_inner())
            .map_err(|inner| Self { inner })
    }
}
