//! Delimited output in the same shape as the input.

use crate::{
    domain::{FinalRecord, record::COLUMNS},
    format::{Dialect, Quoting},
};

/// Writes records as delimited text, preceded by a header line.
///
/// Every line, including the last, is terminated by `\n`.
#[must_use]
pub fn write_records(records: &[FinalRecord], dialect: Dialect, quoting: Quoting) -> String {
    let mut out = dialect.join_fields(COLUMNS, quoting);
    out.push('\n');

    for record in records {
        out.push_str(&dialect.join_fields(record.to_fields(), quoting));
        out.push('\n');
    }

    out
}
