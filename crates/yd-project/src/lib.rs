//! Cross-reference resolution and deferred page flushing for Yokedox.
//!
//! A generator produces pages and entity declarations in whatever order it
//! likes. Pages link to entities that may not have been declared yet. This
//! crate makes sure every page is still written exactly once, with every link
//! that can be resolved resolved:
//!
//! - [`EntityRegistry`]: declared entities by canonical name, plus
//!   transformers for names documented elsewhere
//! - [`PendingLinks`]: pages held until a name they link to is declared
//! - [`resolver`]: finds and resolves links in a page tree
//! - [`Project`]: the producer-facing engine tying these together, with a
//!   one-shot [`Project::finalize`]
//! - [`Flusher`]: the output collaborator pages are handed to
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use yd_project::{Entity, MockFlusher, Project};
//! use yd_tree::{Page, builder as md};
//!
//! let mut project: Project = Project::new(Arc::new(MockFlusher::new()))?;
//! let link = project.link_to_entity("b", None);
//! project.write_page(Page::new("/a", md::root(vec![md::paragraph(vec![link])]))?)?;
//! let anchor = project.declare_entity(Entity::new("b", "/c", "b"))?; // flushes /a
//! project.write_page(Page::new("/c", md::root(vec![anchor.into()]))?)?;
//! let report = project.finalize().await?;
//! ```

mod diagnostic;
mod entity;
mod error;
mod flusher;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod pending;
mod project;
mod registry;
pub mod resolver;

pub use diagnostic::{Diagnostic, Severity};
pub use entity::{Entity, EntityKind};
pub use error::{FlushError, ProjectError};
pub use flusher::Flusher;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockFlusher;
pub use pending::PendingLinks;
pub use project::{FinalizeReport, Project};
pub use registry::{EntityRegistry, EntityTransformer, ExternalEntityPattern};
