//! Filesystem flusher.
//!
//! Directory layout for a page at `/widgets/gadget` with Markdown and JSON
//! enabled:
//!
//! ```text
//! {output}/
//! +-- widgets/
//!     +-- gadget.md
//!     +-- gadget.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use yd_project::{FlushError, Flusher};
use yd_tree::Page;

use crate::stringifier::{OutputFormat, PageStringifier};

/// [`Flusher`] writing each page once per output format under a root
/// directory.
pub struct FsFlusher {
    output_dir: PathBuf,
    stringifiers: Vec<Box<dyn PageStringifier>>,
}

impl FsFlusher {
    /// Create a flusher rooted at `output_dir`, creating the directory if
    /// needed.
    ///
    /// Fails if `output_dir` exists and is not a directory.
    pub fn new(output_dir: PathBuf, formats: &[OutputFormat]) -> Result<Self, FlushError> {
        ensure_directory(&output_dir)?;
        Ok(Self {
            output_dir,
            stringifiers: formats.iter().map(|f| f.stringifier()).collect(),
        })
    }

    /// Add a custom output format.
    #[must_use]
    pub fn with_stringifier(mut self, stringifier: Box<dyn PageStringifier>) -> Self {
        self.stringifiers.push(stringifier);
        self
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File the page is written to for the given extension.
    #[must_use]
    pub fn output_path(&self, page: &Page, extension: &str) -> PathBuf {
        let relative = page.path().trim_start_matches('/');
        self.output_dir.join(format!("{relative}.{extension}"))
    }
}

impl Flusher for FsFlusher {
    fn flush(&self, page: &Page) -> Result<(), FlushError> {
        for stringifier in &self.stringifiers {
            let contents = stringifier.stringify(page)?;
            let path = self.output_path(page, stringifier.file_extension());

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|source| FlushError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            fs::write(&path, contents).map_err(|source| FlushError::Io {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "wrote page");
        }
        Ok(())
    }
}

fn ensure_directory(path: &Path) -> Result<(), FlushError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(FlushError::Output(format!(
            "output path {} is not a directory",
            path.display()
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::create_dir_all(path).map_err(|source| FlushError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
        Err(source) => Err(FlushError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use yd_tree::builder as md;

    fn page(path: &str) -> Page {
        Page::new(
            path,
            md::root(vec![md::heading(1, vec![md::text("Gadget")])]),
        )
        .unwrap()
    }

    #[test]
    fn test_writes_every_format_under_page_path() {
        let dir = TempDir::new().unwrap();
        let flusher = FsFlusher::new(
            dir.path().to_path_buf(),
            &[OutputFormat::Markdown, OutputFormat::Rst, OutputFormat::MdastJson],
        )
        .unwrap();

        flusher.flush(&page("/widgets/gadget")).unwrap();

        let base = dir.path().join("widgets");
        assert_eq!(
            fs::read_to_string(base.join("gadget.md")).unwrap(),
            "# Gadget\n"
        );
        assert_eq!(
            fs::read_to_string(base.join("gadget.rst")).unwrap(),
            "Gadget\n^^^^^^\n"
        );
        assert!(base.join("gadget.json").is_file());
    }

    #[test]
    fn test_creates_missing_output_dir() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested/out");

        let flusher = FsFlusher::new(out.clone(), &[OutputFormat::Markdown]).unwrap();
        flusher.flush(&page("/index")).unwrap();

        assert!(out.join("index.md").is_file());
    }

    #[test]
    fn test_rejects_file_as_output_dir() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("out");
        fs::write(&file, "not a dir").unwrap();

        let result = FsFlusher::new(file, &[OutputFormat::Markdown]);

        assert!(matches!(result, Err(FlushError::Output(_))));
    }

    #[test]
    fn test_io_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let flusher = FsFlusher::new(dir.path().to_path_buf(), &[OutputFormat::Markdown]).unwrap();
        // A file where the page's parent directory should go.
        fs::write(dir.path().join("blocked"), "").unwrap();

        let result = flusher.flush(&page("/blocked/page"));

        assert!(matches!(result, Err(FlushError::Io { .. })));
    }

    #[test]
    fn test_custom_stringifier() {
        struct Plain;

        impl PageStringifier for Plain {
            fn file_extension(&self) -> &'static str {
                "txt"
            }

            fn stringify(&self, page: &Page) -> Result<String, FlushError> {
                Ok(page.root.text_content())
            }
        }

        let dir = TempDir::new().unwrap();
        let flusher = FsFlusher::new(dir.path().to_path_buf(), &[])
            .unwrap()
            .with_stringifier(Box::new(Plain));

        flusher.flush(&page("/index")).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("index.txt")).unwrap(),
            "Gadget"
        );
        assert_eq!(flusher.output_dir(), dir.path());
    }
}
