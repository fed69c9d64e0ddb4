use std::path::{Path, PathBuf};

mod classify;
mod export;
mod import;
mod init;
mod presets;
mod process;
mod summary;
mod terminal;

use anyhow::Context;
use clap::ArgAction;
use classify::Classify;
use export::Export;
use flashcards::{Config, Outcome, Pipeline};
use import::Import;
use presets::Presets;
use process::Process;

/// Default configuration file, looked up in the working directory.
const DEFAULT_CONFIG: &str = "flashcards.toml";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file
    ///
    /// Defaults to `flashcards.toml` in the working directory. A missing
    /// default file means built-in defaults; a missing explicit file is an
    /// error.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        self.command.run(self.config.as_deref())
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // stdout may carry generated cards
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Write a default configuration file
    Init(init::Init),

    /// Classify cards and write them back as delimited text
    Process(Process),

    /// Write cards in Anki's text import format
    Export(Export),

    /// Push cards into Anki through AnkiConnect
    Import(Import),

    /// Classify a single question and show the deciding rule
    Classify(Classify),

    /// Show the deck option presets for each category
    Presets(Presets),
}

impl Command {
    fn run(self, config_path: Option<&Path>) -> anyhow::Result<()> {
        match self {
            Self::Init(command) => {
                command.run(config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG)))?;
            }
            Self::Process(command) => command.run(&load_config(config_path)?)?,
            Self::Export(command) => command.run(&load_config(config_path)?)?,
            Self::Import(command) => command.run(&load_config(config_path)?)?,
            Self::Classify(command) => command.run(&load_config(config_path)?)?,
            Self::Presets(command) => command.run(&load_config(config_path)?)?,
        }
        Ok(())
    }
}

/// Loads the configuration.
///
/// An explicitly requested file must exist. The default file is optional.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        return Config::load(path)
            .map_err(|e| anyhow::anyhow!(e))
            .with_context(|| format!("Failed to load configuration from {}", path.display()));
    }

    let path = Path::new(DEFAULT_CONFIG);
    Ok(Config::load(path).unwrap_or_else(|e| {
        tracing::debug!("Using default configuration: {e}");
        Config::default()
    }))
}

/// Reads an input file and runs the pipeline over it.
fn run_pipeline(input: &Path, pipeline: &Pipeline) -> anyhow::Result<Outcome> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    Ok(pipeline.run(&content))
}

/// Writes `content` to `path`, or to stdout when no path is given.
fn write_output(path: Option<&Path>, content: &str) -> anyhow::Result<()> {
    use std::io::Write;

    match path {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}
