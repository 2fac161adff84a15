//! Entities: documentable link targets.

use crate::error::ProjectError;

/// Where an entity is documented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum EntityKind {
    /// Documented on a page of this site.
    #[default]
    Internal,
    /// Documented on an external site.
    External,
    /// Language built-in with no page of its own.
    BuiltIn,
}

/// Anything that can be documented and linked to.
///
/// `D` is a payload owned by the producer (e.g. the category of a Java
/// symbol); the engine never looks at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity<D = ()> {
    /// Complete, unique name of the entity.
    pub canonical_name: String,
    /// Page the entity is documented on.
    pub page_uri: String,
    /// Fragment of the entity's anchor on that page. Empty for whole-page
    /// and external targets.
    pub anchor_name: String,
    /// Where the entity lives.
    pub kind: EntityKind,
    /// Producer payload.
    pub data: Option<D>,
}

impl<D> Entity<D> {
    /// Internal entity documented at `page_uri#anchor_name`.
    pub fn new(
        canonical_name: impl Into<String>,
        page_uri: impl Into<String>,
        anchor_name: impl Into<String>,
    ) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            page_uri: page_uri.into(),
            anchor_name: anchor_name.into(),
            kind: EntityKind::Internal,
            data: None,
        }
    }

    /// External entity documented at `page_uri`, without an anchor.
    pub fn external(canonical_name: impl Into<String>, page_uri: impl Into<String>) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            page_uri: page_uri.into(),
            anchor_name: String::new(),
            kind: EntityKind::External,
            data: None,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }

    /// Link target: the page URI, plus `#anchor` when the anchor is set.
    #[must_use]
    pub fn url(&self) -> String {
        if self.anchor_name.is_empty() {
            self.page_uri.clone()
        } else {
            format!("{}#{}", self.page_uri, self.anchor_name)
        }
    }
}

/// Check that an anchor name can be embedded in a page.
///
/// Anchor names must be non-empty and free of whitespace and double quotes.
pub(crate) fn validate_anchor_name(anchor_name: &str, canonical_name: &str) -> Result<(), ProjectError> {
    let reason = if anchor_name.is_empty() {
        "anchor name is empty"
    } else if anchor_name.chars().any(char::is_whitespace) {
        "anchor name contains whitespace"
    } else if anchor_name.contains('"') {
        "anchor name contains a double quote"
    } else {
        return Ok(());
    };
    Err(ProjectError::InvalidAnchor {
        canonical_name: canonical_name.to_owned(),
        anchor_name: anchor_name.to_owned(),
        reason,
    })
}
