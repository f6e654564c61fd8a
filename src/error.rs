//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

use crate::shapes::ShapeKind;

/// Errors raised by shape construction, narrow-phase dispatch, the index and configuration.
#[derive(Error, Debug)]
pub enum CollisionError {
    /// A constructor or setter received a value outside its domain
    /// (non-positive scale, degenerate polygon, bad cell size, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No narrow-phase test exists for this shape combination.
    #[error("Unsupported shape pair: {first:?} vs {second:?}")]
    UnsupportedShapePair { first: ShapeKind, second: ShapeKind },

    /// A handle that is not present in the collider set was passed to the world.
    #[error("Unknown collider handle: {0}")]
    UnknownCollider(String),

    /// Configuration could not be parsed or serialized.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error while reading a configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CollisionError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CollisionError>;
