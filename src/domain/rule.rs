//! Ordered first-match rule lists.
//!
//! Both the classifier and the hint deriver are a list of named rules, each
//! pairing a [`Predicate`] with an outcome. Rules are tried in order and the
//! first matching rule decides.

use regex::Regex;

use crate::domain::ValidatedRecord;

/// A test against a record's question text or tags.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// The question text matches the pattern.
    Question(Regex),
    /// At least one tag matches the pattern.
    Tags(Regex),
    /// At least one of the listed tags is present.
    AnyTag(&'static [&'static str]),
    /// Either predicate holds.
    Either(Box<Self>, Box<Self>),
}

impl Predicate {
    /// Builds a case-insensitive [`Predicate::Question`].
    ///
    /// # Panics
    ///
    /// Panics if the pattern is not a valid regular expression. Patterns are
    /// compile-time constants, so this is a programming error.
    #[must_use]
    pub fn question(pattern: &str) -> Self {
        Self::Question(case_insensitive(pattern))
    }

    /// Builds a case-insensitive [`Predicate::Tags`].
    ///
    /// # Panics
    ///
    /// Panics if the pattern is not a valid regular expression.
    #[must_use]
    pub fn tags(pattern: &str) -> Self {
        Self::Tags(case_insensitive(pattern))
    }

    /// Combines two predicates; the result holds if either does.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::Either(Box::new(self), Box::new(other))
    }

    /// Evaluates the predicate.
    #[must_use]
    pub fn matches(&self, record: &ValidatedRecord) -> bool {
        match self {
            Self::Question(re) => re.is_match(record.question()),
            Self::Tags(re) => record.tags().iter().any(|tag| re.is_match(tag)),
            Self::AnyTag(tags) => record.tags().contains_any(tags),
            Self::Either(a, b) => a.matches(record) || b.matches(record),
        }
    }
}

fn case_insensitive(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}"))
        .unwrap_or_else(|e| panic!("invalid rule pattern '{pattern}': {e}"))
}

/// A named predicate with the outcome it selects.
#[derive(Debug, Clone)]
pub struct Rule<T> {
    name: &'static str,
    predicate: Predicate,
    outcome: T,
}

impl<T> Rule<T> {
    /// Creates a rule.
    #[must_use]
    pub const fn new(name: &'static str, predicate: Predicate, outcome: T) -> Self {
        Self {
            name,
            predicate,
            outcome,
        }
    }

    /// The rule's name, used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The outcome selected when the rule matches.
    #[must_use]
    pub const fn outcome(&self) -> &T {
        &self.outcome
    }

    /// Whether the rule applies to the record.
    #[must_use]
    pub fn matches(&self, record: &ValidatedRecord) -> bool {
        self.predicate.matches(record)
    }
}

/// Returns the first rule in `rules` that matches `record`.
pub fn first_match<'r, T>(rules: &'r [Rule<T>], record: &ValidatedRecord) -> Option<&'r Rule<T>> {
    rules.iter().find(|rule| rule.matches(record))
}
