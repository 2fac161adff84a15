//! reStructuredText rendering of page trees.
//!
//! Entity anchors become internal hyperlink targets, so Sphinx can link to
//! them by label. Links are written as anonymous hyperlinks to avoid
//! duplicate target name warnings when the same text appears twice. Tables
//! become `list-table` directives.

use yd_tree::{EntityAnchor, LinkState, Node};

/// Underline characters for heading depths 1 through 6.
const ADORNMENTS: [char; 6] = ['^', '=', '-', '~', '_', '`'];

const INDENT: usize = 3;

/// Render a tree as reStructuredText, with a trailing newline unless empty.
#[must_use]
pub fn to_rst(root: &Node) -> String {
    let mut out = block(root);
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

fn blocks(nodes: &[Node]) -> String {
    let mut parts = Vec::new();
    let mut run: Vec<&Node> = Vec::new();
    for node in nodes {
        if node.is_phrasing() {
            run.push(node);
            continue;
        }
        if !run.is_empty() {
            parts.push(inline(run.drain(..)));
        }
        let rendered = block(node);
        if !rendered.is_empty() {
            parts.push(rendered);
        }
    }
    if !run.is_empty() {
        parts.push(inline(run));
    }
    parts.join("\n\n")
}

fn block(node: &Node) -> String {
    match node {
        Node::Root { children } | Node::ListItem { children } => blocks(children),
        Node::Paragraph { children } => match children.as_slice() {
            [Node::Image { url, alt, .. }] => image(url, alt.as_deref()),
            _ => inline(children),
        },
        Node::Heading { depth, children } => {
            let title = inline(children);
            let adornment = ADORNMENTS[usize::from((*depth).clamp(1, 6)) - 1];
            let underline = adornment.to_string().repeat(title.chars().count().max(4));
            format!("{title}\n{underline}")
        }
        Node::Code { lang, value } => {
            let directive = match lang {
                Some(lang) => format!(".. code-block:: {lang}"),
                None => ".. code-block::".to_owned(),
            };
            format!("{directive}\n\n{}", indent(value, INDENT))
        }
        Node::List {
            ordered,
            start,
            children,
        } => list(*ordered, start.unwrap_or(1), children),
        Node::Blockquote { children } => indent(&blocks(children), INDENT),
        Node::Table { children, .. } => table(children),
        Node::ThematicBreak => "----".to_owned(),
        Node::Html { value } => format!(".. raw:: html\n\n{}", indent(value, INDENT)),
        Node::EntityAnchor(anchor) => format!(".. _{}:", label(anchor)),
        Node::Toctree { children } => {
            let entries: Vec<_> = children
                .iter()
                .map(|item| format!("{} <{}>", item.value, item.url))
                .collect();
            format!(".. toctree::\n\n{}", indent(&entries.join("\n"), INDENT))
        }
        other => inline([other]),
    }
}

fn list(ordered: bool, start: u32, items: &[Node]) -> String {
    let mut rendered = Vec::with_capacity(items.len());
    let mut number = u64::from(start);
    for item in items {
        let marker = if ordered {
            format!("{number}.")
        } else {
            "-".to_owned()
        };
        let content = block(item);
        let mut lines = content.lines();
        let mut out = format!("{marker} {}", lines.next().unwrap_or_default());
        out.truncate(out.trim_end().len());
        let rest: Vec<_> = lines.collect();
        if !rest.is_empty() {
            out.push('\n');
            out.push_str(&indent(&rest.join("\n"), marker.len() + 1));
        }
        rendered.push(out);
        number += 1;
    }
    rendered.join("\n")
}

/// `list-table` directive; the first row is the header.
fn table(rows: &[Node]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let mut body = Vec::new();
    for row in rows {
        for (column, cell) in row.children().iter().enumerate() {
            let marker = if column == 0 { "* -" } else { "  -" };
            let content = inline(cell.children()).replace('\n', " ");
            body.push(format!("{marker} {content}").trim_end().to_owned());
        }
    }
    format!(
        ".. list-table::\n   :header-rows: 1\n\n{}",
        indent(&body.join("\n"), INDENT)
    )
}

fn image(url: &str, alt: Option<&str>) -> String {
    match alt {
        Some(alt) if !alt.is_empty() => format!(".. image:: {url}\n   :alt: {alt}"),
        _ => format!(".. image:: {url}"),
    }
}

fn inline<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> String {
    let mut out = String::new();
    for node in nodes {
        push_inline(node, &mut out);
    }
    out
}

fn push_inline(node: &Node, out: &mut String) {
    match node {
        Node::Text { value } => out.push_str(&escape(value)),
        Node::Emphasis { children } => {
            out.push('*');
            out.push_str(&inline(children));
            out.push('*');
        }
        Node::Strong { children } => {
            out.push_str("**");
            out.push_str(&inline(children));
            out.push_str("**");
        }
        // No strikethrough in reStructuredText.
        Node::Delete { children } => out.push_str(&inline(children)),
        Node::Image { url, alt, .. } => {
            let text = alt.as_deref().filter(|a| !a.is_empty()).unwrap_or(url);
            out.push_str(&link(&escape(text), url));
        }
        Node::InlineCode { value } | Node::Code { value, .. } => {
            out.push_str("``");
            out.push_str(value);
            out.push_str("``");
        }
        Node::Link { url, children, .. } => out.push_str(&link(&inline(children), url)),
        Node::Break => out.push('\n'),
        Node::Html { value } => out.push_str(value),
        // Inline internal target.
        Node::EntityAnchor(anchor) => {
            out.push_str("_`");
            out.push_str(&anchor.anchor_name);
            out.push('`');
        }
        Node::LinkToEntity(entity_link) => {
            let text = escape(&entity_link.link_text);
            match &entity_link.state {
                LinkState::Resolved { url, .. } => out.push_str(&link(&text, url)),
                LinkState::Broken => {
                    out.push('*');
                    out.push_str(&text);
                    out.push('*');
                }
                LinkState::Pending => out.push_str(&text),
            }
        }
        Node::Toctree { children } => {
            let titles: Vec<_> = children.iter().map(|item| escape(&item.value)).collect();
            out.push_str(&titles.join(", "));
        }
        other => out.push_str(&inline(other.children())),
    }
}

fn link(text: &str, url: &str) -> String {
    format!("`{} <{url}>`__", text.replace('<', "\\<"))
}

/// Target label, quoted unless it is a simple reference name.
fn label(anchor: &EntityAnchor) -> String {
    let name = &anchor.anchor_name;
    let simple = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+'));
    if simple {
        name.clone()
    } else {
        format!("`{name}`")
    }
}

fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '`' | '_' | '|') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use yd_tree::{EntityLink, builder as md};

    fn anchor(name: &str) -> Node {
        Node::EntityAnchor(EntityAnchor {
            anchor_name: name.to_owned(),
            canonical_name: name.to_owned(),
        })
    }

    #[test]
    fn test_heading_underline_matches_title() {
        let root = md::root(vec![
            md::heading(1, vec![md::text("Widget")]),
            md::heading(2, vec![md::text("A")]),
        ]);

        assert_eq!(to_rst(&root), "Widget\n^^^^^^\n\nA\n====\n");
    }

    #[test]
    fn test_resolved_and_broken_links() {
        let resolved: Node = EntityLink::pending("Gadget", None)
            .to_resolved("/gadget#Gadget".to_owned(), None)
            .into();
        let broken: Node = EntityLink::pending("never", None).to_broken().into();
        let root = md::root(vec![md::paragraph(vec![
            md::text("See "),
            resolved,
            md::text(" and "),
            broken,
        ])]);

        assert_eq!(
            to_rst(&root),
            "See `Gadget </gadget#Gadget>`__ and *never*\n"
        );
    }

    #[test]
    fn test_anchor_label() {
        let root = md::root(vec![anchor("Widget"), anchor("run(int, String)")]);

        assert_eq!(
            to_rst(&root),
            ".. _Widget:\n\n.. _`run(int, String)`:\n"
        );
    }

    #[test]
    fn test_code_block() {
        let root = md::root(vec![md::code(Some("java"), "int x;\nint y;")]);

        assert_eq!(
            to_rst(&root),
            ".. code-block:: java\n\n   int x;\n   int y;\n"
        );
    }

    #[test]
    fn test_toctree() {
        let root = md::root(vec![md::toctree(vec![
            md::toctree_item("Widget", "/widget"),
            md::toctree_item("Gadget", "/gadget"),
        ])]);

        assert_eq!(
            to_rst(&root),
            ".. toctree::\n\n   Widget </widget>\n   Gadget </gadget>\n"
        );
    }

    #[test]
    fn test_list_continuation_is_indented() {
        let root = md::root(vec![md::list(
            true,
            vec![md::list_item(vec![
                md::paragraph(vec![md::text("first")]),
                md::paragraph(vec![md::text("more")]),
            ])],
        )]);

        assert_eq!(to_rst(&root), "1. first\n\n   more\n");
    }

    #[test]
    fn test_ordered_list_starting_at_max_start() {
        let root = md::root(vec![Node::List {
            ordered: true,
            start: Some(u32::MAX),
            children: vec![
                md::list_item(vec![md::text("a")]),
                md::list_item(vec![md::text("b")]),
            ],
        }]);

        assert_eq!(to_rst(&root), "4294967295. a\n4294967296. b\n");
    }

    #[test]
    fn test_list_table() {
        let root = md::root(vec![md::table(
            vec![],
            vec![
                md::table_row(vec![
                    md::table_cell(vec![md::text("Name")]),
                    md::table_cell(vec![md::text("Type")]),
                ]),
                md::table_row(vec![
                    md::table_cell(vec![md::inline_code("size")]),
                    md::table_cell(vec![md::text("int")]),
                ]),
            ],
        )]);

        assert_eq!(
            to_rst(&root),
            ".. list-table::\n   :header-rows: 1\n\n   * - Name\n     - Type\n   * - ``size``\n     - int\n"
        );
    }

    #[test]
    fn test_image_and_strikethrough() {
        let root = md::root(vec![
            md::paragraph(vec![md::image("/logo.png", Some("logo"))]),
            md::paragraph(vec![md::delete(vec![md::text("old")])]),
        ]);

        assert_eq!(
            to_rst(&root),
            ".. image:: /logo.png\n   :alt: logo\n\nold\n"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let root = md::root(vec![md::paragraph(vec![md::text("MAX_VALUE * 2")])]);

        assert_eq!(to_rst(&root), "MAX\\_VALUE \\* 2\n");
    }
}
