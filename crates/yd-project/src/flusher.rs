//! Flush collaborator interface.

use yd_tree::Page;

use crate::error::FlushError;

/// Persists a finished page.
///
/// Called at most once per page, on tokio's blocking pool, possibly
/// concurrently with other flushes. Implementations decide formats and
/// locations; the engine only needs to know when each call has settled.
pub trait Flusher: Send + Sync {
    /// Write the page to durable output.
    fn flush(&self, page: &Page) -> Result<(), FlushError>;
}
