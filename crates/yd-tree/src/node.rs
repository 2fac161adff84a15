//! Tree nodes.

use crate::link::{EntityAnchor, EntityLink};

/// Entry of a table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToctreeItem {
    /// Text shown for the entry.
    pub value: String,
    /// Page the entry points at.
    pub url: String,
}

/// Column alignment of a GFM table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TableAlign {
    Left,
    Right,
    Center,
}

/// A node of the document tree.
///
/// Serialized as JSON objects tagged by `type`, matching mdast names
/// (`"paragraph"`, `"inlineCode"`, ...) plus the Yokedox extensions
/// `"entityAnchor"`, `"linkToEntity"` and `"toctree"`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "camelCase"))]
pub enum Node {
    Root {
        children: Vec<Node>,
    },
    Paragraph {
        children: Vec<Node>,
    },
    Heading {
        depth: u8,
        children: Vec<Node>,
    },
    Text {
        value: String,
    },
    Emphasis {
        children: Vec<Node>,
    },
    Strong {
        children: Vec<Node>,
    },
    InlineCode {
        value: String,
    },
    Code {
        #[cfg_attr(
            feature = "serde",
            serde(default, skip_serializing_if = "Option::is_none")
        )]
        lang: Option<String>,
        value: String,
    },
    Link {
        url: String,
        #[cfg_attr(
            feature = "serde",
            serde(default, skip_serializing_if = "Option::is_none")
        )]
        title: Option<String>,
        children: Vec<Node>,
    },
    List {
        #[cfg_attr(feature = "serde", serde(default))]
        ordered: bool,
        #[cfg_attr(
            feature = "serde",
            serde(default, skip_serializing_if = "Option::is_none")
        )]
        start: Option<u32>,
        children: Vec<Node>,
    },
    ListItem {
        children: Vec<Node>,
    },
    Blockquote {
        children: Vec<Node>,
    },
    Break,
    ThematicBreak,
    Html {
        value: String,
    },
    Image {
        url: String,
        #[cfg_attr(
            feature = "serde",
            serde(default, skip_serializing_if = "Option::is_none")
        )]
        title: Option<String>,
        #[cfg_attr(
            feature = "serde",
            serde(default, skip_serializing_if = "Option::is_none")
        )]
        alt: Option<String>,
    },
    /// Strikethrough (GFM).
    Delete {
        children: Vec<Node>,
    },
    /// GFM table. The first row is the header.
    Table {
        /// Per-column alignment; `None` for unaligned columns.
        #[cfg_attr(feature = "serde", serde(default))]
        align: Vec<Option<TableAlign>>,
        children: Vec<Node>,
    },
    TableRow {
        children: Vec<Node>,
    },
    TableCell {
        children: Vec<Node>,
    },
    EntityAnchor(EntityAnchor),
    LinkToEntity(EntityLink),
    Toctree {
        children: Vec<ToctreeItem>,
    },
}

impl From<EntityAnchor> for Node {
    fn from(anchor: EntityAnchor) -> Self {
        Self::EntityAnchor(anchor)
    }
}

impl From<EntityLink> for Node {
    fn from(link: EntityLink) -> Self {
        Self::LinkToEntity(link)
    }
}

impl Node {
    /// Child nodes, empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Root { children }
            | Self::Paragraph { children }
            | Self::Heading { children, .. }
            | Self::Emphasis { children }
            | Self::Strong { children }
            | Self::Link { children, .. }
            | Self::List { children, .. }
            | Self::ListItem { children }
            | Self::Blockquote { children }
            | Self::Delete { children }
            | Self::Table { children, .. }
            | Self::TableRow { children }
            | Self::TableCell { children } => children,
            _ => &[],
        }
    }

    /// Mutable child nodes, `None` for leaves.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Self::Root { children }
            | Self::Paragraph { children }
            | Self::Heading { children, .. }
            | Self::Emphasis { children }
            | Self::Strong { children }
            | Self::Link { children, .. }
            | Self::List { children, .. }
            | Self::ListItem { children }
            | Self::Blockquote { children }
            | Self::Delete { children }
            | Self::Table { children, .. }
            | Self::TableRow { children }
            | Self::TableCell { children } => Some(children),
            _ => None,
        }
    }

    /// Visit this node and its descendants depth-first, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Mutable depth-first visit, parents before children.
    ///
    /// The visitor may replace the node it is given; the walk then continues
    /// into the children of the replacement.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Node)) {
        visit(self);
        if let Some(children) = self.children_mut() {
            for child in children {
                child.walk_mut(visit);
            }
        }
    }

    /// True for inline (phrasing) content, including entity links.
    #[must_use]
    pub fn is_phrasing(&self) -> bool {
        matches!(
            self,
            Self::Text { .. }
                | Self::Emphasis { .. }
                | Self::Strong { .. }
                | Self::InlineCode { .. }
                | Self::Link { .. }
                | Self::Break
                | Self::Html { .. }
                | Self::Image { .. }
                | Self::Delete { .. }
                | Self::LinkToEntity(_)
        )
    }

    /// Concatenated text content of this node and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.walk(&mut |node| match node {
            Self::Text { value } | Self::InlineCode { value } => out.push_str(value),
            Self::LinkToEntity(link) => out.push_str(&link.link_text),
            _ => {}
        });
        out
    }
}
