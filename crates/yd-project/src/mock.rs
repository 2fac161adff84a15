//! In-memory flusher for testing.

use std::collections::HashSet;
use std::sync::RwLock;

use yd_tree::Page;

use crate::error::FlushError;
use crate::flusher::Flusher;

/// Flusher that records pages in memory.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use yd_project::{MockFlusher, Project};
///
/// let flusher = Arc::new(MockFlusher::new().failing_on("/broken"));
/// let mut project: Project = Project::new(flusher.clone())?;
/// // ... write pages, finalize ...
/// assert_eq!(flusher.flushed_paths(), vec!["/index"]);
/// ```
#[derive(Debug, Default)]
pub struct MockFlusher {
    flushed: RwLock<Vec<Page>>,
    failing: RwLock<HashSet<String>>,
}

impl MockFlusher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make flushes of `path` fail with an output error.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn failing_on(self, path: impl Into<String>) -> Self {
        self.failing.write().unwrap().insert(path.into());
        self
    }

    /// Successfully flushed pages, in flush order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn flushed(&self) -> Vec<Page> {
        self.flushed.read().unwrap().clone()
    }

    /// Paths of successfully flushed pages, sorted.
    #[must_use]
    pub fn flushed_paths(&self) -> Vec<String> {
        let mut paths: Vec<_> = self
            .flushed()
            .iter()
            .map(|p| p.path().to_owned())
            .collect();
        paths.sort();
        paths
    }

    /// The flushed page with this path, if any.
    #[must_use]
    pub fn page(&self, path: &str) -> Option<Page> {
        self.flushed().into_iter().find(|p| p.path() == path)
    }

    /// How many times a page with this path was flushed.
    #[must_use]
    pub fn flush_count(&self, path: &str) -> usize {
        self.flushed().iter().filter(|p| p.path() == path).count()
    }
}

impl Flusher for MockFlusher {
    fn flush(&self, page: &Page) -> Result<(), FlushError> {
        if self.failing.read().unwrap().contains(page.path()) {
            return Err(FlushError::Output(format!(
                "mock failure for {}",
                page.path()
            )));
        }
        self.flushed.write().unwrap().push(page.clone());
        Ok(())
    }
}
