use std::io::Write;

use flashcards::{Category, Outcome};

use super::terminal::{self, Colorize, Stream};

/// Prints the per-category totals and any skipped lines.
///
/// Goes to stderr when stdout carries the generated cards.
pub fn print(outcome: &Outcome, stream: Stream) -> std::io::Result<()> {
    let mut out: Box<dyn Write> = match stream {
        Stream::Stdout => Box::new(std::io::stdout().lock()),
        Stream::Stderr => Box::new(std::io::stderr().lock()),
    };

    let stats = &outcome.stats;
    writeln!(
        out,
        "Processed {} of {} record(s)",
        stats.accepted(),
        stats.attempted()
    )?;

    for category in Category::ALL {
        let name = format!("{:>8}", category.label());
        writeln!(
            out,
            "  {} ({}): {}",
            terminal::category(category, &name, stream),
            category.code(),
            stats.count(category)
        )?;
    }

    if outcome.rejections.is_empty() {
        return Ok(());
    }

    writeln!(
        out,
        "{}",
        format!("Skipped {} line(s):", outcome.skipped()).warning(stream)
    )?;
    for rejection in &outcome.rejections {
        writeln!(out, "  {}", rejection.to_string().dim(stream))?;
    }
    Ok(())
}
