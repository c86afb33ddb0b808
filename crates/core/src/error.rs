//! Error types for U-Packing.

use thiserror::Error;

/// Result type alias for U-Packing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during packing operations.
///
/// Failing to place an item and an operator declining a move are *not*
/// errors: those surface as `Option`/unpacked lists and fitness penalties.
#[derive(Debug, Error)]
pub enum Error {
    /// Rotation index outside `0..=5`.
    #[error("Invalid rotation index {0}: must be between 0 and 5")]
    InvalidRotation(usize),

    /// Invalid item geometry provided.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Invalid bin boundary provided.
    #[error("Invalid boundary: {0}")]
    InvalidBoundary(String),

    /// The same item id appears more than once in one input.
    #[error("Duplicate item id: {0}")]
    DuplicateItem(usize),

    /// Configuration values that cannot drive a search.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
