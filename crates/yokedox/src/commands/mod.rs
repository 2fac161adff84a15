//! CLI command implementations.

pub(crate) mod replay;
pub(crate) mod run;

use std::path::PathBuf;

use clap::Args;
use yd_config::{CliSettings, Config};

pub(crate) use replay::ReplayArgs;
pub(crate) use run::RunArgs;

use crate::error::CliError;
use crate::output::Output;
use crate::session::Summary;

/// Options shared by every command that builds a site.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover yokedox.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long, env = "YOKEDOX_OUT")]
    out: Option<PathBuf>,

    /// Write Markdown pages (default: enabled).
    #[arg(long)]
    markdown: bool,

    /// Do not write Markdown pages.
    #[arg(long, conflicts_with = "markdown")]
    no_markdown: bool,

    /// Write the page trees as JSON.
    #[arg(long)]
    mdast_json: bool,

    /// Write reStructuredText pages.
    #[arg(long)]
    rst: bool,

    /// Enable verbose output (info level logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl SiteArgs {
    fn cli_settings(&self) -> CliSettings {
        let markdown = if self.no_markdown {
            Some(false)
        } else {
            self.markdown.then_some(true)
        };
        CliSettings {
            output_dir: self.out.clone(),
            markdown,
            mdast_json: self.mdast_json.then_some(true),
            rst: self.rst.then_some(true),
        }
    }

    /// Load configuration with command line overrides applied.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        Ok(Config::load(
            self.config.as_deref(),
            Some(&self.cli_settings()),
        )?)
    }
}

/// Print the end-of-run summary.
pub(crate) fn print_summary(output: &Output, summary: &Summary) {
    let stats = &summary.stats;
    let report = &summary.report;
    output.info(&format!(
        "{} page(s), {} entit{} received",
        stats.pages,
        stats.entities,
        if stats.entities == 1 { "y" } else { "ies" }
    ));
    if stats.skipped > 0 {
        output.warning(&format!("{} event(s) skipped", stats.skipped));
    }
    if stats.producer_errors > 0 {
        output.error(&format!(
            "generator reported {} error(s)",
            stats.producer_errors
        ));
    }
    if !report.unresolved_targets.is_empty() {
        output.warning(&format!(
            "{} unresolved link target(s): {}",
            report.unresolved_targets.len(),
            report.unresolved_targets.join(", ")
        ));
    }
    if report.flush_failures > 0 {
        output.error(&format!(
            "{} page(s) failed to write",
            report.flush_failures
        ));
    }
    output.success(&format!("{} page(s) written", report.pages_flushed));
}
