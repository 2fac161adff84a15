//! Page to text conversion, one implementation per output format.

use yd_project::FlushError;
use yd_tree::Page;

/// Converts a page to the text of one output file.
pub trait PageStringifier: Send + Sync {
    /// Extension appended to the page path, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Render the page.
    fn stringify(&self, page: &Page) -> Result<String, FlushError>;
}

/// Built-in output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Markdown,
    /// The page tree as pretty-printed JSON.
    MdastJson,
    Rst,
}

impl OutputFormat {
    #[must_use]
    pub fn stringifier(self) -> Box<dyn PageStringifier> {
        match self {
            Self::Markdown => Box::new(MarkdownStringifier),
            Self::MdastJson => Box::new(JsonStringifier),
            Self::Rst => Box::new(RstStringifier),
        }
    }
}

/// CommonMark output (`.md`).
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownStringifier;

impl PageStringifier for MarkdownStringifier {
    fn file_extension(&self) -> &'static str {
        "md"
    }

    fn stringify(&self, page: &Page) -> Result<String, FlushError> {
        Ok(crate::markdown::to_markdown(&page.root))
    }
}

/// reStructuredText output (`.rst`).
#[derive(Debug, Clone, Copy, Default)]
pub struct RstStringifier;

impl PageStringifier for RstStringifier {
    fn file_extension(&self) -> &'static str {
        "rst"
    }

    fn stringify(&self, page: &Page) -> Result<String, FlushError> {
        Ok(crate::rst::to_rst(&page.root))
    }
}

/// Serialized page tree (`.json`).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStringifier;

impl PageStringifier for JsonStringifier {
    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn stringify(&self, page: &Page) -> Result<String, FlushError> {
        serde_json::to_string_pretty(page).map_err(|e| FlushError::Serialize {
            page: page.path().to_owned(),
            format: "json",
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use yd_tree::builder as md;

    #[test]
    fn test_extensions() {
        assert_eq!(OutputFormat::Markdown.stringifier().file_extension(), "md");
        assert_eq!(OutputFormat::MdastJson.stringifier().file_extension(), "json");
        assert_eq!(OutputFormat::Rst.stringifier().file_extension(), "rst");
    }

    #[test]
    fn test_json_contains_path_and_tree() {
        let page = Page::new("/a", md::root(vec![md::link_to_entity("b", None)])).unwrap();
        let json = JsonStringifier.stringify(&page).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["path"], "/a");
        assert_eq!(value["root"]["type"], "root");
        assert_eq!(value["root"]["children"][0]["type"], "linkToEntity");
        assert_eq!(value["root"]["children"][0]["targetCanonicalName"], "b");
    }
}
