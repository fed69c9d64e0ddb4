use flashcards::{Config, domain::DeckPreset};
use tracing::instrument;

use super::terminal::{self, Colorize, Stream};

#[derive(Debug, clap::Parser)]
pub struct Presets {
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

impl Presets {
    #[instrument]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let presets = DeckPreset::all(&config.deck, config.split_by_category);

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&presets)?);
            }
            OutputFormat::Table if terminal::is_narrow() => output_list(&presets),
            OutputFormat::Table => output_table(&presets),
        }
        Ok(())
    }
}

fn output_table(presets: &[DeckPreset]) {
    let out = Stream::Stdout;
    let deck_width = presets
        .iter()
        .map(|preset| preset.deck.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    println!(
        "{}",
        format!(
            "{:<10} {:<deck_width$} {:>5} {:>7} {:>9} {:>8}",
            "Category", "Deck", "New", "Reviews", "Retention", "Max days"
        )
        .dim(out)
    );

    for preset in presets {
        let label = format!("{:<10}", preset.category.label());
        println!(
            "{} {:<deck_width$} {:>5} {:>7} {:>9.2} {:>8}",
            terminal::category(preset.category, &label, out),
            preset.deck,
            preset.new_per_day,
            preset.reviews_per_day,
            preset.desired_retention,
            preset.maximum_interval_days
        );
    }
}

fn output_list(presets: &[DeckPreset]) {
    let out = Stream::Stdout;
    for preset in presets {
        println!(
            "{} {}",
            terminal::category(preset.category, preset.category.label(), out),
            preset.deck.dim(out)
        );
        println!(
            "  new {}/day, reviews {}/day",
            preset.new_per_day, preset.reviews_per_day
        );
        println!(
            "  retention {:.2}, max interval {} days",
            preset.desired_retention, preset.maximum_interval_days
        );
    }
}
