//! `yokedox run` command implementation.

use std::process::Stdio;

use clap::Args;
use tokio::io::BufReader;
use tokio::process::Command;

use super::{SiteArgs, print_summary};
use crate::error::CliError;
use crate::output::Output;
use crate::session::Session;

/// Arguments for the run command.
#[derive(Args)]
pub(crate) struct RunArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Generator executable writing events to stdout.
    generator: String,

    /// Arguments passed to the generator (after `--`).
    #[arg(last = true)]
    args: Vec<String>,
}

impl RunArgs {
    /// Run the generator and build the site from its events.
    ///
    /// Pages are finalized even when the generator fails, so everything it
    /// produced is written before the failure is reported.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load_config()?;
        output.info(&format!(
            "Output: {}",
            config.output_resolved.directory.display()
        ));

        let mut session = Session::from_config(&config)?;

        let mut child = Command::new(&self.generator)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CliError::Generator(format!("'{}' failed to start: {e}", self.generator)))?;
        let stdout = child.stdout.take().ok_or_else(|| {
            CliError::Generator(format!("'{}' stdout is not captured", self.generator))
        })?;
        tracing::info!(generator = %self.generator, "Started generator");

        session.consume(BufReader::new(stdout)).await?;
        let status = child.wait().await?;

        let summary = session.finish().await?;
        print_summary(&output, &summary);

        if !status.success() {
            return Err(CliError::Generator(format!(
                "'{}' exited with {status}",
                self.generator
            )));
        }
        Ok(())
    }
}
