use std::path::PathBuf;

use flashcards::{AnkiText, Config, Pipeline};
use tracing::instrument;

use super::{
    run_pipeline, summary,
    terminal::{Colorize, Stream},
    write_output,
};

#[derive(Debug, clap::Parser)]
pub struct Export {
    /// Delimited input file
    input: PathBuf,

    /// Destination of the import file
    #[arg(short, long)]
    output: PathBuf,

    /// Target deck (overrides the configuration)
    #[arg(long)]
    deck: Option<String>,

    /// Target note type (overrides the configuration)
    #[arg(long)]
    note_type: Option<String>,

    /// Treat the first line as a record rather than a header
    #[arg(long)]
    no_header: bool,
}

impl Export {
    #[instrument]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let has_header = config.has_header && !self.no_header;
        let pipeline = Pipeline::new(config).with_header(has_header);
        let outcome = run_pipeline(&self.input, &pipeline)?;

        let renderer = AnkiText::new(
            self.deck.unwrap_or_else(|| config.deck.clone()),
            self.note_type.unwrap_or_else(|| config.note_type.clone()),
            config.tag_root.clone(),
        );
        write_output(Some(&self.output), &renderer.render(&outcome.records))?;

        summary::print(&outcome, Stream::Stdout)?;
        println!(
            "{}",
            format!("Wrote {}", self.output.display()).success(Stream::Stdout)
        );

        Ok(())
    }
}
