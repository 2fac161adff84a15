//! Pages: a document tree bound to an output path.

use crate::link::EntityLink;
use crate::node::Node;

/// Error returned when a page path is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PageError {
    #[error("expected page path '{0}' to begin with slash (/)")]
    MissingLeadingSlash(String),
    #[error("invalid page path: {0}")]
    InvalidPath(String),
}

/// A page of the site.
///
/// The path is the page's identity and its output location without file
/// extension, e.g. `/com/example/Widget`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Page {
    path: String,
    /// Root of the document tree.
    pub root: Node,
}

impl Page {
    /// Create a page, validating its path.
    ///
    /// The path must start with `/` and consist of non-empty segments that
    /// are neither `.` nor `..`. Backslashes, NUL and a trailing slash are
    /// rejected.
    pub fn new(path: impl Into<String>, root: Node) -> Result<Self, PageError> {
        let path = path.into();
        validate_path(&path)?;
        Ok(Self { path, root })
    }

    /// Page path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Entity links still awaiting resolution, in document order.
    ///
    /// Broken links are terminal and are not included.
    #[must_use]
    pub fn pending_links(&self) -> Vec<&EntityLink> {
        let mut links = Vec::new();
        self.root.walk(&mut |node| {
            if let Node::LinkToEntity(link) = node
                && link.is_pending()
                && !link.is_broken()
            {
                links.push(link);
            }
        });
        links
    }

    /// Number of pending entity links.
    #[must_use]
    pub fn pending_link_count(&self) -> usize {
        self.pending_links().len()
    }
}

fn validate_path(path: &str) -> Result<(), PageError> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err(PageError::MissingLeadingSlash(path.to_owned()));
    };
    if rest.is_empty() || path.contains(['\\', '\0']) {
        return Err(PageError::InvalidPath(path.to_owned()));
    }
    if rest
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(PageError::InvalidPath(path.to_owned()));
    }
    Ok(())
}
