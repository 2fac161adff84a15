//! Engine error types.

use std::path::PathBuf;

/// Error returned to the immediate caller of a [`Project`](crate::Project)
/// operation.
///
/// Only validation and protocol errors are surfaced. Duplicate entities,
/// unresolved links and flush failures are logged instead.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// The declared anchor name cannot be embedded in a page.
    #[error("invalid anchor name '{anchor_name}' for entity '{canonical_name}': {reason}")]
    InvalidAnchor {
        canonical_name: String,
        anchor_name: String,
        reason: &'static str,
    },

    /// A page was written after finalization began.
    #[error("cannot write page '{0}': project is already finalized")]
    PostFinalizeWrite(String),

    /// `finalize` was called more than once.
    #[error("project is already finalized")]
    AlreadyFinalized,

    /// A page with the same path was already written.
    #[error("page '{0}' was already written")]
    DuplicatePage(String),

    /// The engine was created outside a tokio runtime.
    #[error("no tokio runtime available to run page flushes: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// Error returned by a [`Flusher`](crate::Flusher).
#[derive(Debug, thiserror::Error)]
pub enum FlushError {
    /// Writing an output file failed.
    #[error("I/O error writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A page could not be converted to an output format.
    #[error("failed to serialize page '{page}' as {format}: {message}")]
    Serialize {
        page: String,
        format: &'static str,
        message: String,
    },

    /// Output location is unusable.
    #[error("{0}")]
    Output(String),
}
