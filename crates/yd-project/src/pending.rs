//! Pages held back until their link targets are declared.

use std::collections::{BTreeMap, HashMap};

use yd_tree::Page;

/// Multi-map from unresolved canonical name to the pages waiting on it.
///
/// Each held page is stored once, however many names it waits on. A page
/// leaves every bucket as soon as it is drained for any one of them; if it
/// still has unresolved links, the scheduler registers it again.
#[derive(Debug, Default)]
pub struct PendingLinks {
    /// Target canonical name -> paths of waiting pages, in registration order.
    waiting: HashMap<String, Vec<String>>,
    /// Held pages by path.
    held: BTreeMap<String, Page>,
}

impl PendingLinks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `page` until one of `targets` is declared.
    ///
    /// Idempotent per (target, page path): registering the same page under
    /// the same name again does not duplicate it. The stored page is replaced
    /// with the latest version.
    pub fn register<I, S>(&mut self, page: Page, targets: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = page.path().to_owned();
        for target in targets {
            let bucket = self.waiting.entry(target.into()).or_default();
            if !bucket.contains(&path) {
                bucket.push(path.clone());
            }
        }
        self.held.insert(path, page);
    }

    /// Remove and return every page waiting on `target`.
    ///
    /// The returned pages are removed from all other buckets as well.
    pub fn drain_ready_for(&mut self, target: &str) -> Vec<Page> {
        let Some(paths) = self.waiting.remove(target) else {
            return Vec::new();
        };
        paths
            .into_iter()
            .filter_map(|path| self.release(&path))
            .collect()
    }

    /// Remove and return every held page, each exactly once, ordered by path.
    pub fn drain_all(&mut self) -> Vec<Page> {
        self.waiting.clear();
        std::mem::take(&mut self.held).into_values().collect()
    }

    /// True if a page with this path is held.
    #[must_use]
    pub fn is_held(&self, path: &str) -> bool {
        self.held.contains_key(path)
    }

    /// Number of pages waiting on `target`.
    #[must_use]
    pub fn waiting_on(&self, target: &str) -> usize {
        self.waiting.get(target).map_or(0, Vec::len)
    }

    /// Number of held pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.held.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    fn release(&mut self, path: &str) -> Option<Page> {
        let page = self.held.remove(path)?;
        self.waiting.retain(|_, bucket| {
            bucket.retain(|p| p != path);
            !bucket.is_empty()
        });
        Some(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yd_tree::builder as md;

    fn page(path: &str) -> Page {
        Page::new(path, md::root(vec![])).unwrap()
    }

    fn paths(pages: &[Page]) -> Vec<&str> {
        pages.iter().map(Page::path).collect()
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut pending = PendingLinks::new();
        pending.register(page("/a"), ["b"]);
        pending.register(page("/a"), ["b"]);

        assert_eq!(pending.waiting_on("b"), 1);
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_drain_ready_for_returns_waiting_pages_in_order() {
        let mut pending = PendingLinks::new();
        pending.register(page("/z"), ["b"]);
        pending.register(page("/a"), ["b"]);
        pending.register(page("/other"), ["c"]);

        let ready = pending.drain_ready_for("b");

        assert_eq!(paths(&ready), vec!["/z", "/a"]);
        assert_eq!(pending.waiting_on("b"), 0);
        assert!(pending.is_held("/other"));
    }

    #[test]
    fn test_drain_removes_page_from_other_buckets() {
        let mut pending = PendingLinks::new();
        pending.register(page("/a"), ["b", "c"]);

        let ready = pending.drain_ready_for("b");

        assert_eq!(paths(&ready), vec!["/a"]);
        assert_eq!(pending.waiting_on("c"), 0);
        assert!(pending.is_empty());
        assert!(pending.drain_ready_for("c").is_empty());
    }

    #[test]
    fn test_drain_unknown_target() {
        let mut pending = PendingLinks::new();
        assert!(pending.drain_ready_for("nothing").is_empty());
    }

    #[test]
    fn test_drain_all_deduplicates() {
        let mut pending = PendingLinks::new();
        pending.register(page("/b"), ["x", "y", "z"]);
        pending.register(page("/a"), ["x"]);

        let all = pending.drain_all();

        assert_eq!(paths(&all), vec!["/a", "/b"]);
        assert!(pending.is_empty());
        assert_eq!(pending.waiting_on("x"), 0);
    }

    #[test]
    fn test_register_replaces_stored_page() {
        let mut pending = PendingLinks::new();
        pending.register(page("/a"), ["b"]);
        let updated = Page::new("/a", md::root(vec![md::text("new")])).unwrap();
        pending.register(updated.clone(), ["c"]);

        assert_eq!(pending.len(), 1);
        assert_eq!(pending.drain_ready_for("b"), vec![updated]);
    }
}
