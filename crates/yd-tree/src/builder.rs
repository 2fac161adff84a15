//! Shorthand constructors for tree nodes.
//!
//! Intended to be imported as `md`:
//!
//! ```
//! use yd_tree::builder as md;
//!
//! let root = md::root(vec![md::heading(1, vec![md::text("Widgets")])]);
//! assert_eq!(root.text_content(), "Widgets");
//! ```

use crate::link::EntityLink;
use crate::node::{Node, TableAlign, ToctreeItem};

pub fn root(children: Vec<Node>) -> Node {
    Node::Root { children }
}

pub fn paragraph(children: Vec<Node>) -> Node {
    Node::Paragraph { children }
}

pub fn heading(depth: u8, children: Vec<Node>) -> Node {
    Node::Heading { depth, children }
}

pub fn text(value: impl Into<String>) -> Node {
    Node::Text {
        value: value.into(),
    }
}

pub fn emphasis(children: Vec<Node>) -> Node {
    Node::Emphasis { children }
}

pub fn strong(children: Vec<Node>) -> Node {
    Node::Strong { children }
}

pub fn inline_code(value: impl Into<String>) -> Node {
    Node::InlineCode {
        value: value.into(),
    }
}

pub fn code(lang: Option<&str>, value: impl Into<String>) -> Node {
    Node::Code {
        lang: lang.map(str::to_owned),
        value: value.into(),
    }
}

pub fn link(url: impl Into<String>, title: Option<&str>, children: Vec<Node>) -> Node {
    Node::Link {
        url: url.into(),
        title: title.map(str::to_owned),
        children,
    }
}

pub fn list(ordered: bool, children: Vec<Node>) -> Node {
    Node::List {
        ordered,
        start: None,
        children,
    }
}

pub fn list_item(children: Vec<Node>) -> Node {
    Node::ListItem { children }
}

pub fn blockquote(children: Vec<Node>) -> Node {
    Node::Blockquote { children }
}

pub fn html(value: impl Into<String>) -> Node {
    Node::Html {
        value: value.into(),
    }
}

pub fn image(url: impl Into<String>, alt: Option<&str>) -> Node {
    Node::Image {
        url: url.into(),
        title: None,
        alt: alt.map(str::to_owned),
    }
}

pub fn delete(children: Vec<Node>) -> Node {
    Node::Delete { children }
}

pub fn table(align: Vec<Option<TableAlign>>, rows: Vec<Node>) -> Node {
    Node::Table {
        align,
        children: rows,
    }
}

pub fn table_row(cells: Vec<Node>) -> Node {
    Node::TableRow { children: cells }
}

pub fn table_cell(children: Vec<Node>) -> Node {
    Node::TableCell { children }
}

pub fn thematic_break() -> Node {
    Node::ThematicBreak
}

pub fn toctree(children: Vec<ToctreeItem>) -> Node {
    Node::Toctree { children }
}

pub fn toctree_item(value: impl Into<String>, url: impl Into<String>) -> ToctreeItem {
    ToctreeItem {
        value: value.into(),
        url: url.into(),
    }
}

/// Pending link to an entity. Link text defaults to the canonical name.
pub fn link_to_entity(canonical_name: impl Into<String>, link_text: Option<&str>) -> Node {
    Node::LinkToEntity(EntityLink::pending(canonical_name, link_text))
}
