//! Error types for the fictus pipeline.
//!
//! All fallible operations return `FictusResult<T>`. Whether an error aborts
//! a workflow or only skips one record is a property of the variant, exposed
//! through [`FictusError::is_fatal`] — callers never inspect message text to
//! decide whether to continue.
//!
//! Unparseable values and dates during randomization are NOT errors: they
//! are returned unchanged as a passthrough outcome by `fictus-rand`.

use thiserror::Error;

use crate::record::EntityKind;

/// The unified error type for the fictus crates.
#[derive(Debug, Error)]
pub enum FictusError {
    /// A source file or directory is missing or unreadable.
    ///
    /// Always fatal: the workflow aborts rather than retrying.
    #[error("input error at '{path}': {reason}")]
    InputFile { path: String, reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// The initial connectivity check against the remote API failed.
    ///
    /// Fatal: nothing is imported or deleted when the store is unreachable.
    #[error("remote API at '{base_url}' is unreachable: {reason}")]
    Connectivity { base_url: String, reason: String },

    /// Creating the patient itself failed.
    ///
    /// Fatal: every other record in the run would dangle without it.
    #[error("failed to create patient '{key}': {reason}")]
    PatientCreate { key: String, reason: String },

    /// A per-record remote call failed (create, find, or delete).
    ///
    /// Recoverable: the loop logs the offending key and continues.
    #[error("remote {entity} operation failed for '{key}': {reason}")]
    Api {
        entity: EntityKind,
        key: String,
        reason: String,
    },
}

impl FictusError {
    /// Whether this error aborts the whole workflow.
    ///
    /// Per-record `Api` failures are tolerated (the loop continues with the
    /// next record); everything else ends the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Api { .. })
    }
}

/// Convenience alias used throughout the fictus crates.
pub type FictusResult<T> = Result<T, FictusError>;
