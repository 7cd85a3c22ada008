//! # Easys Core
//!
//! In-memory entity-component storage for simulation and game loops:
//! - O(1) amortized component insert, remove and lookup
//! - Hole-free iteration over every component type
//! - Multi-type intersection queries
//!
//! ## Architecture
//!
//! 1. **`SparseSet`** - generic dual-array container keyed by small integers
//! 2. **`Registry`** - one sparse set per component type, plus queries
//! 3. **`EntityAllocator`** - capacity-bounded ids with FIFO reuse
//! 4. **`World`** - the facade tying entity and component lifetimes together
//!
//! ## Example
//!
//! ```rust
//! use easys_core::World;
//!
//! struct Position(f32, f32);
//! struct Velocity(f32, f32);
//!
//! let mut world = World::new();
//! for i in 0..10u8 {
//!     let entity = world.add_entity()?;
//!     world.add_component(entity, Position(0.0, 0.0))?;
//!     if i % 2 == 0 {
//!         world.add_component(entity, Velocity(1.0, 0.0))?;
//!     }
//! }
//! assert_eq!(world.get_entities_by_components::<(Position, Velocity)>().len(), 5);
//! # Ok::<(), easys_core::EcsError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod storage;

pub use config::{ConfigError, StorageConfig};
pub use ecs::{
    Component, ComponentTuple, Entity, EntityAllocator, Registry, SharedWorld, World,
    MAX_ENTITIES,
};
pub use error::{EcsError, EcsResult};
pub use storage::{SparseKey, SparseSet};
