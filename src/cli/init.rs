use std::path::Path;

use tracing::instrument;

#[derive(Debug, clap::Parser)]
pub struct Init {
    /// Target deck written into the new configuration
    #[arg(long)]
    deck: Option<String>,
}

impl Init {
    #[instrument]
    pub fn run(self, path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            anyhow::bail!(
                "Configuration already exists (found {}); remove it first to start over",
                path.display()
            );
        }

        let mut config = flashcards::Config::default();
        if let Some(deck) = self.deck {
            config.deck = deck;
        }

        config
            .save(path)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", path.display()))?;

        println!("Initialized flashcard configuration");
        println!("  Created: {}", path.display());
        println!();
        println!("Next steps:");
        println!("  fc process cards.csv -o classified.csv");
        println!("  fc import classified.csv --dry-run");

        Ok(())
    }
}
