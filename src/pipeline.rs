//! The batch pipeline: parse, validate, classify, derive.
//!
//! Malformed rows never abort a run; they are counted and reported as
//! [`Rejection`]s while the remaining rows carry on.

use std::{collections::BTreeMap, fmt};

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::Serialize;

use crate::{
    domain::{Category, Classifier, Config, FinalRecord, HintDeriver, RecordError, ValidatedRecord},
    format::Dialect,
};

/// Drives records through every stage.
#[derive(Debug, Clone)]
pub struct Pipeline {
    dialect: Dialect,
    has_header: bool,
    parallel: bool,
    classifier: Classifier,
    deriver: HintDeriver,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Pipeline {
    /// Creates a pipeline with the standard rules.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            dialect: Dialect::CSV,
            has_header: config.has_header,
            parallel: config.parallel,
            classifier: Classifier::default(),
            deriver: HintDeriver::default(),
        }
    }

    /// Replaces the classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replaces the hint deriver.
    #[must_use]
    pub fn with_deriver(mut self, deriver: HintDeriver) -> Self {
        self.deriver = deriver;
        self
    }

    /// Sets whether the first non-blank line is a header.
    #[must_use]
    pub const fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// The classifier in use.
    #[must_use]
    pub const fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// The hint deriver in use.
    #[must_use]
    pub const fn deriver(&self) -> &HintDeriver {
        &self.deriver
    }

    /// Runs the pipeline over a whole document.
    ///
    /// Output order matches input order.
    #[must_use]
    pub fn run(&self, content: &str) -> Outcome {
        let table = self.dialect.parse_records(content, self.has_header);

        let mut rejections = Vec::new();
        let mut validated = Vec::with_capacity(table.rows.len());
        for row in table.rows {
            match ValidatedRecord::from_fields(&row.fields) {
                Ok(record) => validated.push(record),
                Err(reason) => {
                    tracing::debug!(line = row.line, "skipping row: {reason}");
                    rejections.push(Rejection {
                        line: row.line,
                        reason,
                    });
                }
            }
        }

        let records: Vec<FinalRecord> = if self.parallel {
            validated
                .into_par_iter()
                .map(|record| self.process(record))
                .collect()
        } else {
            validated
                .into_iter()
                .map(|record| self.process(record))
                .collect()
        };

        let mut stats = Stats {
            skipped: rejections.len(),
            ..Stats::default()
        };
        for record in &records {
            stats.record(record.category());
        }

        tracing::info!(
            accepted = stats.accepted(),
            skipped = stats.skipped,
            "pipeline finished"
        );

        Outcome {
            records,
            stats,
            rejections,
        }
    }

    /// Classifies one record and, if difficult, derives its hint.
    #[must_use]
    pub fn process(&self, record: ValidatedRecord) -> FinalRecord {
        let category = self.classifier.classify(&record);
        record
            .classify_as(category)
            .finish(|record| self.deriver.derive(record))
    }
}

/// A row that did not become a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// 1-based source line.
    pub line: usize,
    /// Why the row was skipped.
    pub reason: RecordError,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// Per-category counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Records classified as easy.
    pub easy: usize,
    /// Records classified as medium.
    pub medium: usize,
    /// Records classified as difficult.
    pub difficult: usize,
    /// Rows skipped as malformed.
    pub skipped: usize,
}

impl Stats {
    const fn record(&mut self, category: Category) {
        match category {
            Category::Easy => self.easy += 1,
            Category::Medium => self.medium += 1,
            Category::Difficult => self.difficult += 1,
        }
    }

    /// The count for one category.
    #[must_use]
    pub const fn count(&self, category: Category) -> usize {
        match category {
            Category::Easy => self.easy,
            Category::Medium => self.medium,
            Category::Difficult => self.difficult,
        }
    }

    /// Records that made it through.
    #[must_use]
    pub const fn accepted(&self) -> usize {
        self.easy + self.medium + self.difficult
    }

    /// Rows considered, accepted or not.
    #[must_use]
    pub const fn attempted(&self) -> usize {
        self.accepted() + self.skipped
    }

    /// Counts keyed by category code, for reporting.
    #[must_use]
    pub fn by_code(&self) -> BTreeMap<&'static str, usize> {
        Category::ALL
            .into_iter()
            .map(|category| (category.code(), self.count(category)))
            .collect()
    }
}

/// The result of [`Pipeline::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Enriched records, in input order.
    pub records: Vec<FinalRecord>,
    /// Counts per category and skipped rows.
    pub stats: Stats,
    /// Skipped rows with their reasons, in input order.
    pub rejections: Vec<Rejection>,
}

impl Outcome {
    /// Number of skipped rows.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.rejections.len()
    }
}
