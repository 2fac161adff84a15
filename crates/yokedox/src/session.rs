//! Drives a [`Project`] from a producer event stream.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use yd_config::{Config, OutputConfig};
use yd_output::{FsFlusher, OutputFormat};
use yd_project::{
    Diagnostic, EntityKind, EntityRegistry, ExternalEntityPattern, FinalizeReport, Flusher,
    Project, ProjectError, Severity,
};
use yd_tree::Page;

use crate::error::CliError;
use crate::event::{EntityEvent, ProducerEvent};

/// Counts of what the producer sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SessionStats {
    pub(crate) entities: usize,
    pub(crate) pages: usize,
    /// Malformed lines and rejected declarations or pages.
    pub(crate) skipped: usize,
    /// Diagnostics reported with error severity.
    pub(crate) producer_errors: usize,
}

/// Result of a finished session.
#[derive(Debug)]
pub(crate) struct Summary {
    pub(crate) stats: SessionStats,
    pub(crate) report: FinalizeReport,
}

/// A producer run feeding one project.
pub(crate) struct Session {
    project: Project<Value>,
    stats: SessionStats,
}

impl Session {
    pub(crate) fn new(project: Project<Value>) -> Self {
        Self {
            project,
            stats: SessionStats::default(),
        }
    }

    /// Build a session writing to the configured output directory.
    ///
    /// Must be called inside a tokio runtime.
    pub(crate) fn from_config(config: &Config) -> Result<Self, CliError> {
        let flusher: Arc<dyn Flusher> = Arc::new(FsFlusher::new(
            config.output_resolved.directory.clone(),
            &output_formats(&config.output_resolved),
        )?);
        Ok(Self::new(Project::with_registry(
            flusher,
            registry_from_config(config)?,
        )?))
    }

    /// Apply one event.
    ///
    /// Invalid anchors and invalid page paths are logged and skipped.
    /// Protocol errors, such as writing the same page twice, are returned.
    pub(crate) fn apply(&mut self, event: ProducerEvent) -> Result<(), CliError> {
        match event {
            ProducerEvent::Entity(entity) => self.declare(entity)?,
            ProducerEvent::Page { path, root } => match Page::new(path, root) {
                Ok(page) => {
                    self.project.write_page(page)?;
                    self.stats.pages += 1;
                }
                Err(e) => {
                    tracing::warn!("Skipping page: {e}");
                    self.stats.skipped += 1;
                }
            },
            ProducerEvent::Diagnostic { severity, message } => {
                if severity == Severity::Error {
                    self.stats.producer_errors += 1;
                }
                Diagnostic { severity, message }.emit();
            }
        }
        Ok(())
    }

    fn declare(&mut self, event: EntityEvent) -> Result<(), CliError> {
        // External and built-in targets have no anchor on any page of ours.
        let anchorless = event.kind != EntityKind::Internal && event.anchor_name.is_empty();
        match self.project.declare_entity(event.into_entity()) {
            Ok(_) => {}
            Err(ProjectError::InvalidAnchor { .. }) if anchorless => {}
            Err(e @ ProjectError::InvalidAnchor { .. }) => {
                tracing::warn!("{e}");
                self.stats.skipped += 1;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
        self.stats.entities += 1;
        Ok(())
    }

    /// Read newline-delimited events until end of input.
    ///
    /// Blank lines are ignored; lines that are not valid events are logged
    /// and skipped.
    pub(crate) async fn consume<R>(&mut self, reader: R) -> Result<(), CliError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        let mut line_number = 0usize;
        while let Some(line) = lines.next_line().await? {
            line_number += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<ProducerEvent>(line) {
                Ok(event) => self.apply(event)?,
                Err(e) => {
                    tracing::warn!(line = line_number, "Skipping malformed event: {e}");
                    self.stats.skipped += 1;
                }
            }
        }
        Ok(())
    }

    /// Finalize the project and wait for every page to be written.
    pub(crate) async fn finish(mut self) -> Result<Summary, CliError> {
        let report = self.project.finalize().await?;
        Ok(Summary {
            stats: self.stats,
            report,
        })
    }
}

fn registry_from_config(config: &Config) -> Result<EntityRegistry<Value>, CliError> {
    let mut registry = EntityRegistry::new();
    registry.set_duplicate_warning(config.entities.duplicate_warning);
    for external in &config.external_entities {
        let pattern = ExternalEntityPattern::new(
            &external.from,
            external.to_prefix.clone(),
            external.to_suffix.as_deref(),
        )
        .map_err(|e| {
            CliError::Validation(format!(
                "invalid external_entities pattern '{}': {e}",
                external.from
            ))
        })?;
        registry.add_external_pattern(pattern);
    }
    Ok(registry)
}

fn output_formats(output: &OutputConfig) -> Vec<OutputFormat> {
    [
        (output.markdown, OutputFormat::Markdown),
        (output.mdast_json, OutputFormat::MdastJson),
        (output.rst, OutputFormat::Rst),
    ]
    .into_iter()
    .filter_map(|(enabled, format)| enabled.then_some(format))
    .collect()
}
