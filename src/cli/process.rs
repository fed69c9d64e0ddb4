use std::path::PathBuf;

use flashcards::{Config, Dialect, Pipeline, Quoting, format::write_records};
use tracing::instrument;

use super::{
    run_pipeline, summary,
    terminal::{Colorize, Stream},
    write_output,
};

#[derive(Debug, clap::Parser)]
pub struct Process {
    /// Delimited input file (question, answer, tags, mnemonic, category, hint)
    input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Treat the first line as a record rather than a header
    #[arg(long)]
    no_header: bool,

    /// Quoting style for written fields (overrides the configuration)
    #[arg(long, value_enum)]
    quoting: Option<Quoting>,
}

impl Process {
    #[instrument]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let has_header = config.has_header && !self.no_header;
        let pipeline = Pipeline::new(config).with_header(has_header);
        let outcome = run_pipeline(&self.input, &pipeline)?;

        let quoting = self.quoting.unwrap_or(config.quoting);
        let content = write_records(&outcome.records, Dialect::CSV, quoting);
        write_output(self.output.as_deref(), &content)?;

        // stdout may carry the cards
        summary::print(&outcome, Stream::Stderr)?;
        if let Some(output) = &self.output {
            eprintln!(
                "{}",
                format!("Wrote {}", output.display()).success(Stream::Stderr)
            );
        }

        Ok(())
    }
}
