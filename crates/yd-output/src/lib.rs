//! Writes finished Yokedox pages to disk.
//!
//! [`FsFlusher`] implements [`yd_project::Flusher`]. Each page is written
//! once per configured [`OutputFormat`], at `<output dir><page path>.<ext>`.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use yd_output::{FsFlusher, OutputFormat};
//!
//! let flusher = FsFlusher::new(
//!     PathBuf::from("docs-out"),
//!     &[OutputFormat::Markdown, OutputFormat::MdastJson],
//! )?;
//! # Ok::<(), yd_project::FlushError>(())
//! ```

mod fs;
pub mod markdown;
pub mod rst;
mod stringifier;

pub use fs::FsFlusher;
pub use stringifier::{
    JsonStringifier, MarkdownStringifier, OutputFormat, PageStringifier, RstStringifier,
};
