//! Domain models for study cards.
//!
//! This module contains the record types and the stages they pass through,
//! the difficulty classifier, the hint deriver, deck presets and
//! configuration.

mod category;
pub use category::{Category, UnknownCategory};

pub mod record;
pub use record::{ClassifiedRecord, FinalRecord, RecordError, Tags, ValidatedRecord};

pub mod rule;

pub mod classify;
pub use classify::Classifier;

pub mod hint;
pub use hint::HintDeriver;

mod preset;
pub use preset::{DeckPreset, deck_name};

mod config;
pub use config::Config;
