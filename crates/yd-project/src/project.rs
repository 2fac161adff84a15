//! Page flush scheduling and finalization.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinSet};
use yd_tree::{EntityAnchor, Node, Page, builder as md};

use crate::diagnostic::Diagnostic;
use crate::entity::Entity;
use crate::error::{FlushError, ProjectError};
use crate::flusher::Flusher;
use crate::pending::PendingLinks;
use crate::registry::EntityRegistry;
use crate::resolver;

/// Result of one flush task.
struct FlushOutcome {
    path: String,
    result: Result<(), FlushError>,
}

/// Summary returned by [`Project::finalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalizeReport {
    /// Pages written successfully over the whole run.
    pub pages_flushed: usize,
    /// Pages whose flush failed or panicked.
    pub flush_failures: usize,
    /// Pages still held when finalization started.
    pub pages_held: usize,
    /// Link targets that were never declared, sorted.
    pub unresolved_targets: Vec<String>,
}

/// A documentation site under construction.
///
/// Producers declare entities and write pages in any order. A page whose
/// links all resolve is flushed right away; otherwise it is held until the
/// missing entities are declared or until [`finalize`](Self::finalize),
/// which writes the remaining pages with unresolved links marked broken.
/// Every written page is flushed exactly once.
///
/// All bookkeeping happens on the caller's task through `&mut self`. Only the
/// flushes themselves run concurrently, on the blocking pool of the runtime
/// the project was created in.
pub struct Project<D = ()> {
    registry: EntityRegistry<D>,
    pending: PendingLinks,
    flusher: Arc<dyn Flusher>,
    runtime: Handle,
    flushes: JoinSet<FlushOutcome>,
    submitted: BTreeSet<String>,
    finalized: bool,
    flushed: usize,
    failed: usize,
}

impl<D: Clone> Project<D> {
    /// Create a project that flushes through `flusher`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::NoRuntime`] when called outside a tokio
    /// runtime.
    pub fn new(flusher: Arc<dyn Flusher>) -> Result<Self, ProjectError> {
        Self::with_registry(flusher, EntityRegistry::new())
    }

    /// Create a project with a preconfigured registry (transformers,
    /// duplicate reporting).
    pub fn with_registry(
        flusher: Arc<dyn Flusher>,
        registry: EntityRegistry<D>,
    ) -> Result<Self, ProjectError> {
        let runtime = Handle::try_current()?;
        Ok(Self {
            registry,
            pending: PendingLinks::new(),
            flusher,
            runtime,
            flushes: JoinSet::new(),
            submitted: BTreeSet::new(),
            finalized: false,
            flushed: 0,
            failed: 0,
        })
    }

    /// Declare an entity and return the anchor to place on its page.
    ///
    /// Pages held on this name are processed again and flushed if nothing
    /// else blocks them. If the anchor name is invalid the entity is still
    /// registered, but held pages are left for a later declaration or
    /// finalization.
    pub fn declare_entity(&mut self, entity: Entity<D>) -> Result<EntityAnchor, ProjectError> {
        let canonical_name = entity.canonical_name.clone();
        let anchor = self.registry.declare(entity)?;

        for page in self.pending.drain_ready_for(&canonical_name) {
            tracing::debug!(
                path = page.path(),
                entity = %canonical_name,
                "Reprocessing held page"
            );
            self.process_page(page);
        }

        Ok(anchor)
    }

    /// Build a pending link to an entity, to be placed in a page tree.
    #[must_use]
    pub fn link_to_entity(&self, canonical_name: &str, link_text: Option<&str>) -> Node {
        md::link_to_entity(canonical_name, link_text)
    }

    /// Submit a finished page.
    ///
    /// The page is flushed immediately if all its links resolve, and held
    /// otherwise. Callers do not wait for the flush.
    ///
    /// # Errors
    ///
    /// [`ProjectError::PostFinalizeWrite`] after [`finalize`](Self::finalize)
    /// and [`ProjectError::DuplicatePage`] if the path was already written.
    /// Neither flushes anything.
    pub fn write_page(&mut self, page: Page) -> Result<(), ProjectError> {
        if self.finalized {
            return Err(ProjectError::PostFinalizeWrite(page.path().to_owned()));
        }
        if !self.submitted.insert(page.path().to_owned()) {
            return Err(ProjectError::DuplicatePage(page.path().to_owned()));
        }
        self.process_page(page);
        Ok(())
    }

    /// Resolve what can be resolved, then flush or hold the page.
    fn process_page(&mut self, mut page: Page) {
        let pending = resolver::find_pending_links(&page).len();
        let resolved = resolver::resolve_links(&mut page, &self.registry);

        if resolved.len() < pending {
            let targets: BTreeSet<String> = resolver::find_pending_links(&page)
                .into_iter()
                .map(|link| link.target_canonical_name.clone())
                .collect();
            tracing::debug!(
                path = page.path(),
                waiting_on = ?targets,
                "Holding page until its links resolve"
            );
            self.pending.register(page, targets);
            return;
        }

        self.spawn_flush(page);
    }

    fn spawn_flush(&mut self, page: Page) {
        while let Some(joined) = self.flushes.try_join_next() {
            self.record(joined);
        }

        let flusher = Arc::clone(&self.flusher);
        self.flushes.spawn_blocking_on(
            move || {
                let result = flusher.flush(&page);
                if let Err(e) = &result {
                    tracing::error!(path = page.path(), error = %e, "Failed to flush page");
                }
                FlushOutcome {
                    path: page.path().to_owned(),
                    result,
                }
            },
            &self.runtime,
        );
    }

    fn record(&mut self, joined: Result<FlushOutcome, JoinError>) {
        match joined {
            Ok(FlushOutcome { result: Ok(()), path }) => {
                tracing::debug!(path = %path, "Flushed page");
                self.flushed += 1;
            }
            Ok(FlushOutcome { result: Err(_), .. }) => self.failed += 1,
            Err(e) => {
                tracing::error!(error = %e, "Page flush task did not complete");
                self.failed += 1;
            }
        }
    }

    /// Flush every held page and wait for all flushes to settle.
    ///
    /// Held pages get a last resolution attempt; links that still do not
    /// resolve become broken. Flush failures are counted in the report and
    /// never fail this call.
    ///
    /// # Errors
    ///
    /// [`ProjectError::AlreadyFinalized`] on a second call.
    pub async fn finalize(&mut self) -> Result<FinalizeReport, ProjectError> {
        if self.finalized {
            return Err(ProjectError::AlreadyFinalized);
        }
        self.finalized = true;

        let held = self.pending.drain_all();
        let pages_held = held.len();
        let mut unresolved = BTreeSet::new();

        for mut page in held {
            resolver::resolve_links(&mut page, &self.registry);
            for link in resolver::break_pending_links(&mut page) {
                unresolved.insert(link.target_canonical_name);
            }
            self.spawn_flush(page);
        }

        if !unresolved.is_empty() {
            let names: Vec<&str> = unresolved.iter().map(String::as_str).collect();
            Diagnostic::warning(format!(
                "{} unresolved entity link target(s) rendered as broken links: {}",
                names.len(),
                names.join(", ")
            ))
            .emit();
        }

        while let Some(joined) = self.flushes.join_next().await {
            self.record(joined);
        }

        let report = FinalizeReport {
            pages_flushed: self.flushed,
            flush_failures: self.failed,
            pages_held,
            unresolved_targets: unresolved.into_iter().collect(),
        };
        tracing::info!(
            pages_flushed = report.pages_flushed,
            flush_failures = report.flush_failures,
            pages_held = report.pages_held,
            "Finalized project"
        );
        Ok(report)
    }

    /// True once [`finalize`](Self::finalize) has started.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// True if the page with this path is held on unresolved links.
    #[must_use]
    pub fn is_held(&self, path: &str) -> bool {
        self.pending.is_held(path)
    }

    /// Number of pages currently held.
    #[must_use]
    pub fn held_count(&self) -> usize {
        self.pending.len()
    }

    /// Declared entities sorted by canonical name.
    ///
    /// Useful after finalization for building index pages.
    #[must_use]
    pub fn entities(&self) -> Vec<&Entity<D>> {
        self.registry.entities()
    }

    /// Look up an entity by name, including transformer matches.
    #[must_use]
    pub fn resolve_entity(&self, canonical_name: &str) -> Option<Cow<'_, Entity<D>>> {
        self.registry.resolve(canonical_name)
    }

    #[must_use]
    pub fn registry(&self) -> &EntityRegistry<D> {
        &self.registry
    }
}
