use flashcards::{Config, Pipeline, Tags, ValidatedRecord};
use tracing::instrument;

use super::terminal::{self, Colorize, Stream};

#[derive(Debug, clap::Parser)]
pub struct Classify {
    /// The question text
    question: String,

    /// Comma-separated tags
    #[arg(long, default_value = "")]
    tags: String,

    /// Mnemonic attached to the card
    #[arg(long, default_value = "")]
    mnemonic: String,
}

impl Classify {
    #[instrument]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        // The answer plays no part in classification.
        let record = ValidatedRecord::new(
            self.question,
            "-",
            Tags::parse(&self.tags),
            self.mnemonic,
        )?;

        let pipeline = Pipeline::new(config);
        let (category, rule) = pipeline.classifier().explain(&record);
        let finished = pipeline.process(record);

        let out = Stream::Stdout;
        println!(
            "{} ({})",
            terminal::category(category, category.label(), out),
            category.code()
        );
        println!("  {} {rule}", "rule:".dim(out));
        if !finished.hint().is_empty() {
            println!("  {} {}", "hint:".dim(out), finished.hint());
        }

        Ok(())
    }
}
