//! Study records and the stages they pass through.
//!
//! A record moves through three types, each produced only by the previous
//! stage:
//!
//! 1. [`ValidatedRecord`], built from the raw fields of one input line;
//! 2. [`ClassifiedRecord`], once a [`Category`] has been assigned;
//! 3. [`FinalRecord`], once the hint (if any) has been derived.
//!
//! A hint can only be attached to a record classified as
//! [`Category::Difficult`].

use std::fmt;

use non_empty_string::NonEmptyString;

use crate::domain::{Category, UnknownCategory};

/// Column names of the delimited record format, in order.
pub const COLUMNS: [&str; 6] = ["question", "answer", "tags", "mnemonic", "category", "hint"];

/// An ordered list of tags.
///
/// Stored as text in the record (comma-joined), but exposed as individual
/// trimmed tokens. Duplicates are not removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<String>);

impl Tags {
    /// Parses comma-joined tag text. Empty tokens are dropped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self(
            text.split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(ToString::to_string)
                .collect(),
        )
    }

    /// Iterates the tags in their original order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Whether the given tag is present (ASCII case-insensitive).
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Whether any of the given tags is present.
    #[must_use]
    pub fn contains_any(&self, tags: &[&str]) -> bool {
        tags.iter().any(|tag| self.contains(tag))
    }

    /// Returns `true` if there are no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The tags joined back into their textual form.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.0.join(",")
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Reasons a row of fields cannot become a record.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RecordError {
    /// A required column is absent or blank.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// The category column holds an unknown token.
    #[error(transparent)]
    Category(#[from] UnknownCategory),
}

/// A record whose required fields have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecord {
    question: NonEmptyString,
    answer: NonEmptyString,
    tags: Tags,
    mnemonic: String,
}

impl ValidatedRecord {
    /// Builds a record from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingField`] if the question or answer is
    /// empty or whitespace-only.
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        tags: Tags,
        mnemonic: impl Into<String>,
    ) -> Result<Self, RecordError> {
        Ok(Self {
            question: required("question", question.into())?,
            answer: required("answer", answer.into())?,
            tags,
            mnemonic: mnemonic.into(),
        })
    }

    /// Builds a record from the raw fields of one line.
    ///
    /// Columns follow [`COLUMNS`]. Missing trailing columns are treated as
    /// empty and columns past the sixth are ignored. A non-empty category
    /// column must hold a known token, but its value is otherwise discarded:
    /// every record is classified afresh. The hint column is discarded for
    /// the same reason.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or the category token
    /// is unknown.
    pub fn from_fields(fields: &[String]) -> Result<Self, RecordError> {
        let column = |idx: usize| fields.get(idx).map_or("", String::as_str);

        let category = column(4);
        if !category.trim().is_empty() {
            let _: Category = category.parse()?;
        }

        if fields.len() > COLUMNS.len() {
            tracing::debug!(
                "ignoring {} extra column(s)",
                fields.len() - COLUMNS.len()
            );
        }

        Self::new(column(0), column(1), Tags::parse(column(2)), column(3))
    }

    /// The question text.
    #[must_use]
    pub fn question(&self) -> &str {
        self.question.as_str()
    }

    /// The answer text.
    #[must_use]
    pub fn answer(&self) -> &str {
        self.answer.as_str()
    }

    /// The record's tags.
    #[must_use]
    pub const fn tags(&self) -> &Tags {
        &self.tags
    }

    /// The mnemonic, possibly empty.
    #[must_use]
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// Attaches a category.
    #[must_use]
    pub const fn classify_as(self, category: Category) -> ClassifiedRecord {
        ClassifiedRecord {
            record: self,
            category,
        }
    }
}

fn required(name: &'static str, value: String) -> Result<NonEmptyString, RecordError> {
    if value.trim().is_empty() {
        return Err(RecordError::MissingField(name));
    }
    NonEmptyString::new(value).map_err(|_| RecordError::MissingField(name))
}

/// A record with a category but no hint yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRecord {
    record: ValidatedRecord,
    category: Category,
}

impl ClassifiedRecord {
    /// The assigned category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// The underlying record.
    #[must_use]
    pub const fn record(&self) -> &ValidatedRecord {
        &self.record
    }

    /// Completes the record.
    ///
    /// `derive` is called only when the category is
    /// [`Category::Difficult`]; every other record gets an empty hint.
    pub fn finish<F>(self, derive: F) -> FinalRecord
    where
        F: FnOnce(&ValidatedRecord) -> String,
    {
        let hint = if self.category == Category::Difficult {
            derive(&self.record)
        } else {
            String::new()
        };

        FinalRecord {
            record: self.record,
            category: self.category,
            hint,
        }
    }
}

/// A fully enriched record, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalRecord {
    record: ValidatedRecord,
    category: Category,
    hint: String,
}

impl FinalRecord {
    /// The question text.
    #[must_use]
    pub fn question(&self) -> &str {
        self.record.question()
    }

    /// The answer text.
    #[must_use]
    pub fn answer(&self) -> &str {
        self.record.answer()
    }

    /// The record's tags.
    #[must_use]
    pub const fn tags(&self) -> &Tags {
        self.record.tags()
    }

    /// The mnemonic, possibly empty.
    #[must_use]
    pub fn mnemonic(&self) -> &str {
        self.record.mnemonic()
    }

    /// The assigned category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// The derived hint; empty unless the record is difficult.
    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }

    /// The record's columns in [`COLUMNS`] order.
    #[must_use]
    pub fn to_fields(&self) -> [String; 6] {
        [
            self.question().to_string(),
            self.answer().to_string(),
            self.tags().to_text(),
            self.mnemonic().to_string(),
            self.category.code().to_string(),
            self.hint.clone(),
        ]
    }
}
