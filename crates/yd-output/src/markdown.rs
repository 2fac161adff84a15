//! CommonMark rendering of page trees.
//!
//! Entity anchors become empty named HTML anchors. Resolved entity links
//! become ordinary links; broken ones are emphasized text. Tables and
//! strikethrough use the GFM syntax.

use yd_tree::{EntityAnchor, LinkState, Node, TableAlign};

/// Render a tree as Markdown, with a trailing newline unless empty.
#[must_use]
pub fn to_markdown(root: &Node) -> String {
    let mut out = block(root);
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Block sequence separated by blank lines. Runs of phrasing content form an
/// implicit paragraph.
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
        Node::Paragraph { children } => inline(children),
        Node::Heading { depth, children } => {
            let level = usize::from((*depth).clamp(1, 6));
            format!("{} {}", "#".repeat(level), inline(children))
        }
        Node::Code { lang, value } => {
            let fence = fence_for(value);
            format!(
                "{fence}{}\n{value}\n{fence}",
                lang.as_deref().unwrap_or_default()
            )
        }
        Node::List {
            ordered,
            start,
            children,
        } => list(*ordered, start.unwrap_or(1), children),
        Node::Blockquote { children } => blocks(children)
            .lines()
            .map(|line| {
                if line.is_empty() {
                    ">".to_owned()
                } else {
                    format!("> {line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Node::Table { align, children } => table(align, children),
        Node::ThematicBreak => "---".to_owned(),
        Node::EntityAnchor(anchor) => anchor_html(anchor),
        Node::Toctree { children } => children
            .iter()
            .map(|item| format!("- [{}]({})", escape(&item.value), item.url))
            .collect::<Vec<_>>()
            .join("\n"),
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
        let pad = " ".repeat(marker.len() + 1);
        let content = block(item);
        let mut lines = content.lines();
        let mut out = format!("{marker} {}", lines.next().unwrap_or_default());
        out.truncate(out.trim_end().len());
        for line in lines {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&pad);
                out.push_str(line);
            }
        }
        rendered.push(out);
        number += 1;
    }
    rendered.join("\n")
}

/// GFM table; the first row is the header.
fn table(align: &[Option<TableAlign>], rows: &[Node]) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row.children()
                .iter()
                .map(|cell| inline(cell.children()).replace('|', "\\|").replace('\n', " "))
                .collect()
        })
        .collect();
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0).max(align.len());
    if columns == 0 {
        return String::new();
    }

    let separator: Vec<String> = (0..columns)
        .map(|i| {
            match align.get(i).copied().flatten() {
                Some(TableAlign::Left) => ":---",
                Some(TableAlign::Right) => "---:",
                Some(TableAlign::Center) => ":---:",
                None => "---",
            }
            .to_owned()
        })
        .collect();

    let mut rows = rows.into_iter();
    let header = rows.next().unwrap_or_default();
    let mut lines = vec![table_line(&header, columns), table_line(&separator, columns)];
    lines.extend(rows.map(|row| table_line(&row, columns)));
    lines.join("\n")
}

fn table_line(cells: &[String], columns: usize) -> String {
    let mut line = String::from("|");
    for i in 0..columns {
        line.push(' ');
        line.push_str(cells.get(i).map_or("", String::as_str));
        line.push_str(" |");
    }
    line
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
        Node::Delete { children } => {
            out.push_str("~~");
            out.push_str(&inline(children));
            out.push_str("~~");
        }
        Node::Image { url, title, alt } => {
            out.push('!');
            out.push_str(&link(
                &escape(alt.as_deref().unwrap_or_default()),
                url,
                title.as_deref(),
            ));
        }
        Node::InlineCode { value } | Node::Code { value, .. } => out.push_str(&code_span(value)),
        Node::Link {
            url,
            title,
            children,
        } => out.push_str(&link(&inline(children), url, title.as_deref())),
        Node::Break => out.push_str("\\\n"),
        Node::Html { value } => out.push_str(value),
        Node::EntityAnchor(anchor) => out.push_str(&anchor_html(anchor)),
        Node::LinkToEntity(entity_link) => {
            let text = escape(&entity_link.link_text);
            match &entity_link.state {
                LinkState::Resolved { url, title } => {
                    out.push_str(&link(&text, url, title.as_deref()));
                }
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

fn link(text: &str, url: &str, title: Option<&str>) -> String {
    match title {
        Some(title) => format!("[{text}]({url} \"{}\")", title.replace('"', "\\\"")),
        None => format!("[{text}]({url})"),
    }
}

fn anchor_html(anchor: &EntityAnchor) -> String {
    format!("<a name=\"{}\"></a>", anchor.anchor_name)
}

fn code_span(value: &str) -> String {
    if value.contains('`') {
        format!("`` {value} ``")
    } else {
        format!("`{value}`")
    }
}

/// A backtick fence longer than any backtick run inside the code.
fn fence_for(value: &str) -> String {
    let mut longest = 0;
    let mut current = 0;
    for c in value.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    "`".repeat(longest.max(2) + 1)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
