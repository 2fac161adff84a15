//! Entity links and anchors.

/// Resolution state of an [`EntityLink`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "camelCase"))]
pub enum LinkState {
    /// Target entity not known yet.
    #[default]
    Pending,
    /// Target entity found; the link points at its location.
    Resolved {
        url: String,
        #[cfg_attr(
            feature = "serde",
            serde(default, skip_serializing_if = "Option::is_none")
        )]
        title: Option<String>,
    },
    /// Target never appeared. Renders as inert emphasized text.
    Broken,
}

/// A cross-reference to an entity, addressed by canonical name.
///
/// Links are created pending and are replaced in the tree by their resolved
/// or broken form. The target name and link text survive every transition so
/// broken links can still be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EntityLink {
    /// Canonical name of the entity this link points at.
    pub target_canonical_name: String,
    /// Text shown for the link.
    pub link_text: String,
    /// Current resolution state.
    #[cfg_attr(feature = "serde", serde(default))]
    pub state: LinkState,
}

impl EntityLink {
    /// Create a pending link. The link text defaults to the canonical name.
    #[must_use]
    pub fn pending(target_canonical_name: impl Into<String>, link_text: Option<&str>) -> Self {
        let target_canonical_name = target_canonical_name.into();
        let link_text = link_text.map_or_else(|| target_canonical_name.clone(), str::to_owned);
        Self {
            target_canonical_name,
            link_text,
            state: LinkState::Pending,
        }
    }

    /// True until the link is resolved. Broken links stay pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        !matches!(self.state, LinkState::Resolved { .. })
    }

    /// True if the link was terminalized by finalization.
    #[must_use]
    pub fn is_broken(&self) -> bool {
        matches!(self.state, LinkState::Broken)
    }

    /// Resolved URL, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match &self.state {
            LinkState::Resolved { url, .. } => Some(url),
            _ => None,
        }
    }

    /// The same link in resolved form.
    #[must_use]
    pub fn to_resolved(&self, url: String, title: Option<String>) -> Self {
        Self {
            target_canonical_name: self.target_canonical_name.clone(),
            link_text: self.link_text.clone(),
            state: LinkState::Resolved { url, title },
        }
    }

    /// The same link in broken form.
    #[must_use]
    pub fn to_broken(&self) -> Self {
        Self {
            target_canonical_name: self.target_canonical_name.clone(),
            link_text: self.link_text.clone(),
            state: LinkState::Broken,
        }
    }
}

/// In-page marker for a declared entity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EntityAnchor {
    /// Fragment name of the anchor on its page.
    pub anchor_name: String,
    /// Canonical name of the entity the anchor marks.
    pub canonical_name: String,
}
