//! # Entity Component System
//!
//! Sparse-set backed entity-component storage.
//!
//! ## Design Philosophy
//!
//! - One sparse set per component type, created on first use
//! - Entity ids are bare indices, reissued in the order they were freed
//! - Removing an entity purges every component it carried
//! - No internal synchronization; see [`SharedWorld`] for a locked handle

mod component;
mod entity;
mod registry;
mod shared;
mod world;

pub use component::{Component, ComponentTuple};
pub use entity::{Entity, EntityAllocator, MAX_ENTITIES};
pub use registry::Registry;
pub use shared::SharedWorld;
pub use world::World;
