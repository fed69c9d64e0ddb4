//! Text formats read and written by the pipeline.

mod delimited;
pub use delimited::{Dialect, Quoting, Row, Table};

pub mod records;
pub use records::write_records;

pub mod anki;
pub use anki::AnkiText;
