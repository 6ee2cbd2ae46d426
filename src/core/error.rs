//! Error types for playbook and catalog operations.

use thiserror::Error;

use super::{ItemKey, PipelineId};

/// Result type for dashboard operations.
pub type DeckResult<T> = Result<T, DeckError>;

/// Errors that can occur while editing the playbook or resolving pipelines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    /// No catalog pipeline matches the given id or name.
    #[error("No pipeline matching '{0}' in the catalog")]
    UnknownPipeline(String),

    /// A pipeline id that is not in the catalog.
    #[error("Pipeline {0} is not in the catalog")]
    MissingPipeline(PipelineId),

    /// A playbook key that no longer refers to an entry.
    #[error("Playbook entry {0} not found")]
    ItemNotFound(ItemKey),

    /// An index outside the playbook.
    #[error("Position {index} is out of range for a playbook of {len} entries")]
    OutOfRange { index: usize, len: usize },
}
