use std::path::PathBuf;

use flashcards::{
    Config, Pipeline,
    connect::{API_VERSION, Client, ImportSummary, Importer},
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::instrument;

use super::{
    run_pipeline, summary,
    terminal::{Colorize, Stream},
};

#[derive(Debug, clap::Parser)]
pub struct Import {
    /// Delimited input file
    input: PathBuf,

    /// Show what would be imported without contacting Anki
    #[arg(long)]
    dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Treat the first line as a record rather than a header
    #[arg(long)]
    no_header: bool,
}

impl Import {
    #[instrument]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let out = Stream::Stdout;
        let has_header = config.has_header && !self.no_header;
        let pipeline = Pipeline::new(config).with_header(has_header);
        let outcome = run_pipeline(&self.input, &pipeline)?;
        summary::print(&outcome, out)?;

        if outcome.records.is_empty() {
            println!("{}", "Nothing to import".warning(out));
            return Ok(());
        }

        let client = Client::from_config(config)?;
        let importer = Importer::new(&client, config);

        if self.dry_run {
            println!();
            println!("Dry run: {} note(s) would be sent", outcome.records.len());
            for record in outcome.records.iter().take(3) {
                let note = importer.note(record);
                println!(
                    "  {} {}",
                    format!("[{}]", note.deck_name).dim(out),
                    record.question()
                );
            }
            if outcome.records.len() > 3 {
                println!("  {}", format!("… and {} more", outcome.records.len() - 3).dim(out));
            }
            return Ok(());
        }

        let version = client.version()?;
        if version != u64::from(API_VERSION) {
            tracing::warn!(
                version,
                expected = API_VERSION,
                "AnkiConnect reports a different API version"
            );
        }

        if !self.yes {
            let proceed = dialoguer::Confirm::new()
                .with_prompt(format!(
                    "Import {} note(s) into '{}' at {}?",
                    outcome.records.len(),
                    config.deck,
                    client.endpoint()
                ))
                .default(false)
                .interact()?;
            if !proceed {
                println!("Import cancelled");
                return Ok(());
            }
        }

        let progress = ProgressBar::new(outcome.records.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );

        let result = importer.import(&outcome.records, |batch, batch_summary| {
            progress.set_message(format!("batch {batch}"));
            progress.inc(batch_summary.attempted as u64);
        });
        progress.finish_and_clear();

        match result {
            Ok(summary) => {
                print_import_summary(summary, out);
                Ok(())
            }
            Err(e) => {
                print_import_summary(e.summary, out);
                Err(e.into())
            }
        }
    }
}

fn print_import_summary(summary: ImportSummary, out: Stream) {
    println!(
        "{}",
        format!(
            "Imported {} of {} note(s)",
            summary.accepted, summary.attempted
        )
        .success(out)
    );
    if summary.duplicates > 0 {
        println!(
            "{}",
            format!("  {} duplicate(s) not inserted", summary.duplicates).warning(out)
        );
    }
}
