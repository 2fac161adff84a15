//! `yokedox replay` command implementation.

use std::path::PathBuf;

use clap::Args;
use tokio::fs::File;
use tokio::io::BufReader;

use super::{SiteArgs, print_summary};
use crate::error::CliError;
use crate::output::Output;
use crate::session::Session;

/// Arguments for the replay command.
#[derive(Args)]
pub(crate) struct ReplayArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Recorded event file, or `-` for stdin.
    input: PathBuf,
}

impl ReplayArgs {
    /// Build the site from a recorded event stream.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load_config()?;
        output.info(&format!(
            "Output: {}",
            config.output_resolved.directory.display()
        ));

        let mut session = Session::from_config(&config)?;
        if self.input.as_os_str() == "-" {
            session.consume(BufReader::new(tokio::io::stdin())).await?;
        } else {
            let file = File::open(&self.input).await?;
            session.consume(BufReader::new(file)).await?;
        }

        let summary = session.finish().await?;
        print_summary(&output, &summary);
        Ok(())
    }
}
