//! Rule-based difficulty classification.
//!
//! Rules are evaluated in three groups, in order:
//!
//! 1. difficult signals (clinical cases, surgical approaches, comparisons,
//!    true/false framing, inherently hard topics);
//! 2. easy signals (reference tags, `SIGLA = ___` questions);
//! 3. fallbacks (quick review, percentages, list items).
//!
//! The first matching rule decides; a record matching nothing is
//! [`Category::Medium`].

use crate::domain::{
    Category, ValidatedRecord,
    rule::{Predicate, Rule, first_match},
};

/// Tags whose topics are always classified as difficult.
pub const HARD_TAGS: &[&str] = &[
    "acessos-cirurgicos",
    "hernias",
    "sindromes",
    "vascularizacao",
    "territorios-vasculares",
    "variacoes-anatomicas",
    "correlacao-clinica",
];

/// Tags marking reference material.
pub const EASY_TAGS: &[&str] = &["abreviacoes", "siglas", "mnemonicos", "referencia"];

/// Tag that keeps a card in the medium class.
pub const QUICK_REVIEW_TAG: &str = "revisao-rapida";

/// Tag carried by items split out of a longer list.
pub const LIST_ITEM_TAG: &str = "item-lista";

/// Name reported by [`Classifier::explain`] when no rule matched.
pub const DEFAULT_RULE: &str = "default";

/// Maps a record to a [`Category`].
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule<Category>>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(standard_rules())
    }
}

impl Classifier {
    /// Creates a classifier from an explicit rule list.
    #[must_use]
    pub const fn new(rules: Vec<Rule<Category>>) -> Self {
        Self { rules }
    }

    /// The rules, in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[Rule<Category>] {
        &self.rules
    }

    /// Classifies a record.
    #[must_use]
    pub fn classify(&self, record: &ValidatedRecord) -> Category {
        self.explain(record).0
    }

    /// Classifies a record, also returning the name of the deciding rule.
    #[must_use]
    pub fn explain(&self, record: &ValidatedRecord) -> (Category, &'static str) {
        first_match(&self.rules, record).map_or((Category::Medium, DEFAULT_RULE), |rule| {
            (*rule.outcome(), rule.name())
        })
    }
}

/// The standard rule cascade.
#[must_use]
pub fn standard_rules() -> Vec<Rule<Category>> {
    use Category::{Difficult, Easy, Medium};

    vec![
        // difficult signals
        Rule::new(
            "clinical case",
            Predicate::question(r"^\s*caso\b|caso cl[ií]nico|\bpaciente\b")
                .or(Predicate::tags(r"caso-clinico")),
            Difficult,
        ),
        Rule::new(
            "surgical approach",
            Predicate::question(r"\bacessos?\b|\babordage[mn]s?\b|via cir[uú]rgica|craniotomia")
                .or(Predicate::tags(r"\bacesso\b|\babordagem\b")),
            Difficult,
        ),
        Rule::new(
            "integrated reasoning",
            Predicate::question(
                r"\bcompare\b|\bcompara[çc][ãa]o\b|diferen[çc]as? entre|\bversus\b|\bvs\.?\s|\bintegrad[oa]s?\b",
            )
            .or(Predicate::tags(r"comparacao|integrad")),
            Difficult,
        ),
        Rule::new(
            "true or false",
            Predicate::question(r"verdadeiro ou falso|^\s*v\s+ou\s+f\b|\(\s*v\s*/\s*f\s*\)")
                .or(Predicate::tags(r"verdadeiro-falso")),
            Difficult,
        ),
        Rule::new("hard topic", Predicate::AnyTag(HARD_TAGS), Difficult),
        // easy signals
        Rule::new("reference tag", Predicate::AnyTag(EASY_TAGS), Easy),
        Rule::new(
            "abbreviation",
            Predicate::question(r"^\s*\S{1,15}\s*=\s*_{2,}\s*$"),
            Easy,
        ),
        // fallbacks
        Rule::new("quick review", Predicate::AnyTag(&[QUICK_REVIEW_TAG]), Medium),
        Rule::new("percentage", Predicate::question("%"), Medium),
        Rule::new("list item", Predicate::AnyTag(&[LIST_ITEM_TAG]), Easy),
    ]
}
