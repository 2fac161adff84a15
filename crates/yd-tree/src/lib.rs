//! Document tree for Yokedox pages.
//!
//! The tree is a superset of mdast. On top of the usual block and inline
//! nodes it adds:
//!
//! - [`EntityAnchor`]: the in-page marker for a declared entity
//! - [`EntityLink`]: a cross-reference to an entity by canonical name, which
//!   moves from pending to resolved (or broken) as the site is assembled
//! - [`ToctreeItem`]: entries of a table of contents
//!
//! GFM tables, strikethrough and images are supported as well.
//!
//! A [`Page`] pairs a tree with its output path.
//!
//! # Example
//!
//! ```
//! use yd_tree::{Page, builder as md};
//!
//! let root = md::root(vec![md::paragraph(vec![
//!     md::text("See "),
//!     md::link_to_entity("com.example.Widget", None),
//! ])]);
//! let page = Page::new("/guide", root).unwrap();
//! assert_eq!(page.pending_link_count(), 1);
//! ```

pub mod builder;
mod link;
mod node;
mod page;

pub use link::{EntityAnchor, EntityLink, LinkState};
pub use node::{Node, TableAlign, ToctreeItem};
pub use page::{Page, PageError};
