//! Common error types for the people service

use thiserror::Error;

use crate::enrich::{SourceError, Stage};

/// Common result type for people service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the storage layer, the enrichment pipeline
/// and the HTTP surface.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing required input (caller's fault)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Requested person does not exist
    #[error("person not found")]
    NotFound,

    /// Insert collided with the natural-key uniqueness constraint
    #[error("person already exists")]
    AlreadyExists,

    /// Update payload carried no fields to set
    #[error("nothing to update")]
    NothingToUpdate,

    /// Underlying store failure (wraps sqlx::Error, cause preserved)
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Enrichment aborted at the named stage
    #[error("{stage} enrichment failed: {source}")]
    Enrichment {
        stage: Stage,
        #[source]
        source: SourceError,
    },
}