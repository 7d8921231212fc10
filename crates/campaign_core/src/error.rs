//! Error types for the campaign simulation.

use thiserror::Error;

use crate::registry::EntityId;
use crate::terrain::TerrainId;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all campaign simulation errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// A record file could not be read.
    #[error("Failed to read '{path}': {message}")]
    FileRead {
        /// Path to the file that failed to load.
        path: String,
        /// Underlying error message.
        message: String,
    },

    /// A record file could not be written.
    #[error("Failed to write '{path}': {message}")]
    FileWrite {
        /// Path to the file that failed to save.
        path: String,
        /// Underlying error message.
        message: String,
    },

    /// A persisted record is malformed or internally inconsistent.
    ///
    /// Fatal at load time: the load of the named file aborts and no
    /// partial registry is usable.
    #[error("Corrupt record in '{file}': {message}")]
    Corrupted {
        /// File containing the offending record.
        file: String,
        /// What was wrong with it.
        message: String,
    },

    /// A business-rule precondition was violated.
    ///
    /// The operation is rejected and the entity left unmodified. These
    /// are caller bugs and must not be retried automatically.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A cross-reference pointed at an ID with no live entity.
    #[error("{kind} not found: {id}")]
    EntityNotFound {
        /// Entity type that was looked up.
        kind: &'static str,
        /// The ID that failed to resolve.
        id: EntityId,
    },

    /// No adaptability cost is defined for a (kind, terrain) pair.
    #[error("No adaptability for military kind {kind} on terrain {terrain}")]
    AdaptabilityMissing {
        /// Military kind ID.
        kind: EntityId,
        /// Terrain type ID.
        terrain: TerrainId,
    },
}
