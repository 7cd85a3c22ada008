//! # Storage Error Types
//!
//! All errors that can occur in the storage engine.
//!
//! Single-item accessors are strict and fail with [`EcsError::KeyNotFound`]
//! or [`EcsError::ComponentNotFound`]. Aggregate and multi-type operations
//! never fail on unknown component types.

use thiserror::Error;

/// Errors that can occur in the storage engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// An entity population or a sparse key hit its configured bound.
    ///
    /// The rejected operation left all state unchanged.
    #[error("capacity exceeded: limit is {limit}")]
    CapacityExceeded {
        /// The bound that was hit.
        limit: usize,
    },

    /// A sparse set was asked for a key it does not contain.
    #[error("key not found: {key}")]
    KeyNotFound {
        /// The missing key.
        key: u64,
    },

    /// An entity does not carry the requested component.
    #[error("component {component} not found for entity {entity}")]
    ComponentNotFound {
        /// The entity that was queried.
        entity: u64,
        /// Type name of the requested component.
        component: &'static str,
    },

    /// The entity is not currently allocated.
    #[error("entity {0} is not active")]
    EntityNotActive(u64),
}

/// Result type for storage operations.
pub type EcsResult<T> = Result<T, EcsError>;
