//! Quoted-field tokenizer and serializer for delimited text.
//!
//! A line is scanned left to right with a single "inside quotes" flag:
//!
//! - a quote toggles the flag, except that two adjacent quotes inside a quoted
//!   span collapse to one literal quote;
//! - a delimiter ends the current field only outside quotes;
//! - the end of the line always ends the last field, even if a quoted span was
//!   never closed.
//!
//! The serializer is the mirror image, so any field written by
//! [`Dialect::serialize_field`] parses back to the same value.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// How fields are quoted on output.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Quoting {
    /// Quote only fields containing the delimiter, a quote or a line break.
    #[default]
    Minimal,
    /// Quote every field.
    Always,
}

/// The delimiter and quote characters of a delimited text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    delimiter: char,
    quote: char,
}

impl Default for Dialect {
    fn default() -> Self {
        Self::CSV
    }
}

impl Dialect {
    /// Comma separated, double-quote escaped.
    pub const CSV: Self = Self {
        delimiter: ',',
        quote: '"',
    };

    /// Creates a dialect with the given delimiter and quote characters.
    ///
    /// # Panics
    ///
    /// Panics if the delimiter and quote are the same character.
    #[must_use]
    pub const fn new(delimiter: char, quote: char) -> Self {
        assert!(
            delimiter != quote,
            "delimiter and quote must be different characters"
        );
        Self { delimiter, quote }
    }

    /// The field delimiter.
    #[must_use]
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    /// The quote character.
    #[must_use]
    pub const fn quote(&self) -> char {
        self.quote
    }

    /// Splits one line into its fields.
    ///
    /// Never fails: an empty line yields a single empty field, and an
    /// unterminated quoted span simply runs to the end of the line.
    ///
    /// ```
    /// use flashcards::format::Dialect;
    ///
    /// let fields = Dialect::CSV.parse_line(r#"a,"b, ""c""",d"#);
    /// assert_eq!(fields, ["a", r#"b, "c""#, "d"]);
    /// ```
    #[must_use]
    pub fn parse_line(&self, line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            if c == self.quote {
                if in_quotes && chars.peek() == Some(&self.quote) {
                    current.push(self.quote);
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            } else if c == self.delimiter && !in_quotes {
                fields.push(std::mem::take(&mut current));
            } else {
                current.push(c);
            }
        }

        if in_quotes {
            tracing::trace!("unterminated quoted field at end of line");
        }
        fields.push(current);

        fields
    }

    /// Whether a field must be quoted under [`Quoting::Minimal`].
    fn needs_quotes(&self, field: &str) -> bool {
        field
            .chars()
            .any(|c| c == self.delimiter || c == self.quote || c == '\n' || c == '\r')
    }

    /// Serializes a single field under the given quoting policy.
    ///
    /// Returns the field unchanged (borrowed) when no quoting is required.
    #[must_use]
    pub fn serialize_field<'a>(&self, field: &'a str, quoting: Quoting) -> Cow<'a, str> {
        match quoting {
            Quoting::Minimal if !self.needs_quotes(field) => Cow::Borrowed(field),
            Quoting::Minimal | Quoting::Always => {
                let mut out = String::with_capacity(field.len() + 2);
                out.push(self.quote);
                for c in field.chars() {
                    if c == self.quote {
                        out.push(self.quote);
                    }
                    out.push(c);
                }
                out.push(self.quote);
                Cow::Owned(out)
            }
        }
    }

    /// Serializes a sequence of fields into one line (without a terminator).
    #[must_use]
    pub fn join_fields<I, S>(&self, fields: I, quoting: Quoting) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut line = String::new();
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                line.push(self.delimiter);
            }
            line.push_str(&self.serialize_field(field.as_ref(), quoting));
        }
        line
    }

    /// Parses a whole document.
    ///
    /// Blank and whitespace-only lines are skipped. When `has_header` is set,
    /// the first remaining line becomes the header. Every other line is parsed
    /// independently into a [`Row`].
    #[must_use]
    pub fn parse_records(&self, content: &str, has_header: bool) -> Table {
        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| (idx + 1, line));

        let header = if has_header {
            lines.next().map(|(_, line)| self.parse_line(line))
        } else {
            None
        };

        let rows = lines
            .map(|(line, text)| Row {
                line,
                fields: self.parse_line(text),
            })
            .collect();

        Table { header, rows }
    }
}

/// The raw fields of one input line, before any validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based line number in the source document.
    pub line: usize,
    /// The parsed field values, in column order.
    pub fields: Vec<String>,
}

/// A parsed document: an optional header and the data rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    /// The header fields, if the document was parsed with a header.
    pub header: Option<Vec<String>>,
    /// Data rows in source order.
    pub rows: Vec<Row>,
}
