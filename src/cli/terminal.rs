//! Terminal capability detection and colouring

use flashcards::Category;
use owo_colors::{OwoColorize, colors::css};

/// Output stream a piece of text is destined for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Detects whether colored output should be enabled on `stream`
pub fn supports_color(stream: Stream) -> bool {
    let stream = match stream {
        Stream::Stdout => supports_color::Stream::Stdout,
        Stream::Stderr => supports_color::Stream::Stderr,
    };
    supports_color::on(stream).is_some()
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Check if terminal is narrow (< 60 columns)
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < 60)
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self, stream: Stream) -> String;
    /// Color as warning (amber)
    fn warning(&self, stream: Stream) -> String;
    /// Color as error (red)
    fn failure(&self, stream: Stream) -> String;
    /// Dim the text
    fn dim(&self, stream: Stream) -> String;
}

impl Colorize for str {
    fn success(&self, stream: Stream) -> String {
        if supports_color(stream) {
            self.fg::<css::Green>().to_string()
        } else {
            self.to_string()
        }
    }

    fn warning(&self, stream: Stream) -> String {
        if supports_color(stream) {
            self.fg::<css::Orange>().to_string()
        } else {
            self.to_string()
        }
    }

    fn failure(&self, stream: Stream) -> String {
        if supports_color(stream) {
            self.fg::<css::Crimson>().to_string()
        } else {
            self.to_string()
        }
    }

    fn dim(&self, stream: Stream) -> String {
        if supports_color(stream) {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }
}

impl Colorize for String {
    fn success(&self, stream: Stream) -> String {
        self.as_str().success(stream)
    }

    fn warning(&self, stream: Stream) -> String {
        self.as_str().warning(stream)
    }

    fn failure(&self, stream: Stream) -> String {
        self.as_str().failure(stream)
    }

    fn dim(&self, stream: Stream) -> String {
        self.as_str().dim(stream)
    }
}

/// Colours a category by difficulty
pub fn category(category: Category, text: &str, stream: Stream) -> String {
    match category {
        Category::Easy => text.success(stream),
        Category::Medium => text.warning(stream),
        Category::Difficult => text.failure(stream),
    }
}
