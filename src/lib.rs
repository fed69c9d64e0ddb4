//! Study card pipeline
//!
//! Question/answer cards are read from delimited text, classified by
//! difficulty, annotated with a hint when difficult, and written back out
//! either as delimited text or in Anki's import format. Cards can also be
//! pushed straight into Anki through AnkiConnect.

pub mod domain;
pub use domain::{Category, Classifier, Config, FinalRecord, HintDeriver, Tags, ValidatedRecord};

pub mod format;
pub use format::{AnkiText, Dialect, Quoting};

pub mod pipeline;
pub use pipeline::{Outcome, Pipeline, Stats};

pub mod connect;
