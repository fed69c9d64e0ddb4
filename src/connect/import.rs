use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Value, json};

use super::{Error, Invoke};
use crate::{
    domain::{Config, FinalRecord, deck_name},
    format::anki::{answer_html, hierarchical_tags},
};

/// One note as submitted to `addNotes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Target deck.
    pub deck_name: String,
    /// Target note type.
    pub model_name: String,
    /// Field name to HTML content.
    pub fields: serde_json::Map<String, Value>,
    /// Hierarchical tags.
    pub tags: Vec<String>,
    /// Submission options.
    pub options: NoteOptions,
}

/// Duplicate handling for a submitted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteOptions {
    /// Whether an identical note may be added again.
    pub allow_duplicate: bool,
    /// Where duplicates are looked for.
    pub duplicate_scope: String,
}

/// Totals of an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Notes submitted.
    pub attempted: usize,
    /// Notes the remote side inserted.
    pub accepted: usize,
    /// Notes the remote side declined as duplicates.
    pub duplicates: usize,
}

impl ImportSummary {
    fn absorb(&mut self, other: Self) {
        self.attempted += other.attempted;
        self.accepted += other.accepted;
        self.duplicates += other.duplicates;
    }
}

/// A batch failed; earlier batches were already applied.
#[derive(Debug, thiserror::Error)]
#[error("import stopped at batch {batch}: {source}")]
pub struct ImportError {
    /// 1-based index of the failing batch (0 while creating decks).
    pub batch: usize,
    /// Totals of the batches that completed.
    pub summary: ImportSummary,
    /// The failure.
    #[source]
    pub source: Error,
}

/// Submits records to the remote side in fixed-size batches.
#[derive(Debug)]
pub struct Importer<'a, I> {
    invoker: &'a I,
    config: &'a Config,
}

impl<'a, I: Invoke> Importer<'a, I> {
    /// Creates an importer using the deck, note type and batch size from
    /// `config`.
    #[must_use]
    pub const fn new(invoker: &'a I, config: &'a Config) -> Self {
        Self { invoker, config }
    }

    /// Builds the note submitted for a record.
    ///
    /// The answer field carries the answer followed by the mnemonic and hint,
    /// when present, laid out as in the text export.
    #[must_use]
    pub fn note(&self, record: &FinalRecord) -> Note {
        let mut fields = serde_json::Map::new();
        fields.insert(
            self.config.question_field.clone(),
            Value::String(record.question().replace('\n', "<br>")),
        );
        fields.insert(
            self.config.answer_field.clone(),
            Value::String(answer_html(record)),
        );

        Note {
            deck_name: deck_name(
                &self.config.deck,
                record.category(),
                self.config.split_by_category,
            ),
            model_name: self.config.note_type.clone(),
            fields,
            tags: hierarchical_tags(&self.config.tag_root, record.tags(), record.category()),
            options: NoteOptions {
                allow_duplicate: false,
                duplicate_scope: "deck".to_string(),
            },
        }
    }

    /// Imports all records.
    ///
    /// Target decks are created first. Then each batch is submitted with
    /// `addNotes`; `on_batch` is called after every successful batch with
    /// that batch's totals. A failed batch ends the import and is not retried.
    ///
    /// # Errors
    ///
    /// Returns an [`ImportError`] carrying the totals of the completed batches
    /// if any remote call fails.
    pub fn import<F>(
        &self,
        records: &[FinalRecord],
        mut on_batch: F,
    ) -> Result<ImportSummary, ImportError>
    where
        F: FnMut(usize, ImportSummary),
    {
        let mut summary = ImportSummary::default();

        self.create_decks(records).map_err(|source| ImportError {
            batch: 0,
            summary,
            source,
        })?;

        for (idx, chunk) in records.chunks(self.config.batch_size().get()).enumerate() {
            let batch = idx + 1;
            let notes: Vec<Note> = chunk.iter().map(|record| self.note(record)).collect();

            let outcome = self.add_notes(&notes).map_err(|source| ImportError {
                batch,
                summary,
                source,
            })?;

            tracing::info!(
                batch,
                accepted = outcome.accepted,
                duplicates = outcome.duplicates,
                "batch imported"
            );
            summary.absorb(outcome);
            on_batch(batch, outcome);
        }

        Ok(summary)
    }

    fn create_decks(&self, records: &[FinalRecord]) -> Result<(), Error> {
        let decks: BTreeSet<String> = records
            .iter()
            .map(|record| {
                deck_name(
                    &self.config.deck,
                    record.category(),
                    self.config.split_by_category,
                )
            })
            .collect();

        for deck in decks {
            tracing::debug!(deck = %deck, "creating deck");
            self.invoker.invoke("createDeck", json!({ "deck": deck }))?;
        }
        Ok(())
    }

    fn add_notes(&self, notes: &[Note]) -> Result<ImportSummary, Error> {
        let params = json!({ "notes": notes });
        let result = self.invoker.invoke("addNotes", params)?;

        let outcomes: Vec<Option<u64>> =
            serde_json::from_value(result).map_err(|e| Error::Malformed {
                action: "addNotes".to_string(),
                detail: e.to_string(),
            })?;

        if outcomes.len() != notes.len() {
            return Err(Error::Malformed {
                action: "addNotes".to_string(),
                detail: format!(
                    "expected {} outcomes, got {}",
                    notes.len(),
                    outcomes.len()
                ),
            });
        }

        let accepted = outcomes.iter().filter(|id| id.is_some()).count();
        let duplicates = outcomes.len() - accepted;
        if duplicates > 0 {
            tracing::warn!(duplicates, "duplicate notes were not inserted");
        }

        Ok(ImportSummary {
            attempted: notes.len(),
            accepted,
            duplicates,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, num::NonZeroUsize};

    use super::*;
    use crate::pipeline::Pipeline;

    /// Records calls and replays scripted `addNotes` results.
    #[derive(Default)]
    struct Scripted {
        calls: RefCell<Vec<(String, Value)>>,
        add_results: RefCell<Vec<Result<Value, Error>>>,
    }

    impl Scripted {
        fn with_results(results: Vec<Result<Value, Error>>) -> Self {
            Self {
                calls: RefCell::default(),
                add_results: RefCell::new(results.into_iter().rev().collect()),
            }
        }

        fn actions(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|(a, _)| a.clone()).collect()
        }
    }

    impl Invoke for Scripted {
        fn invoke(&self, action: &str, params: Value) -> Result<Value, Error> {
            self.calls
                .borrow_mut()
                .push((action.to_string(), params.clone()));
            match action {
                "createDeck" => Ok(json!(1)),
                "addNotes" => {
                    let count = params["notes"].as_array().map_or(0, Vec::len);
                    self.add_results.borrow_mut().pop().unwrap_or_else(|| {
                        Ok(Value::Array((0..count).map(|i| json!(i + 1)).collect()))
                    })
                }
                other => panic!("unexpected action {other}"),
            }
        }
    }

    fn records(content: &str) -> Vec<FinalRecord> {
        Pipeline::default().with_header(false).run(content).records
    }

    fn config(batch_size: usize) -> Config {
        let mut config = Config::default();
        config.set_batch_size(NonZeroUsize::new(batch_size).unwrap());
        config
    }

    #[test]
    fn submits_in_fixed_size_batches() {
        let records = records("q1,a\nq2,a\nq3,a\nq4,a\nq5,a\n");
        let invoker = Scripted::default();
        let config = config(2);

        let mut batches = Vec::new();
        let summary = Importer::new(&invoker, &config)
            .import(&records, |batch, outcome| batches.push((batch, outcome.attempted)))
            .unwrap();

        assert_eq!(batches, [(1, 2), (2, 2), (3, 1)]);
        assert_eq!(
            summary,
            ImportSummary {
                attempted: 5,
                accepted: 5,
                duplicates: 0
            }
        );
        assert_eq!(
            invoker.actions(),
            ["createDeck", "addNotes", "addNotes", "addNotes"]
        );
    }

    #[test]
    fn null_outcomes_are_duplicates() {
        let records = records("q1,a\nq2,a\nq3,a\n");
        let invoker = Scripted::with_results(vec![Ok(json!([11, null, 13]))]);
        let config = config(10);

        let summary = Importer::new(&invoker, &config)
            .import(&records, |_, _| {})
            .unwrap();

        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.duplicates, 1);
    }

    #[test]
    fn failing_batch_stops_the_import() {
        let records = records("q1,a\nq2,a\nq3,a\n");
        let invoker = Scripted::with_results(vec![
            Ok(json!([1])),
            Err(Error::Timeout {
                action: "addNotes".to_string(),
                elapsed: std::time::Duration::from_secs(3),
            }),
        ]);
        let config = config(1);

        let error = Importer::new(&invoker, &config)
            .import(&records, |_, _| {})
            .unwrap_err();

        assert_eq!(error.batch, 2);
        assert_eq!(error.summary.accepted, 1);
        assert!(error.source.is_timeout());
        assert_eq!(invoker.actions().len(), 3);
    }

    #[test]
    fn outcome_count_mismatch_is_malformed() {
        let records = records("q1,a\nq2,a\n");
        let invoker = Scripted::with_results(vec![Ok(json!([1]))]);
        let config = config(10);

        let error = Importer::new(&invoker, &config)
            .import(&records, |_, _| {})
            .unwrap_err();

        assert!(matches!(error.source, Error::Malformed { .. }));
    }

    #[test]
    fn split_decks_are_created_once_each() {
        let records = records("CASO: x,a\nCASO: y,a\nq,a\n");
        let invoker = Scripted::default();
        let mut config = config(10);
        config.split_by_category = true;

        Importer::new(&invoker, &config)
            .import(&records, |_, _| {})
            .unwrap();

        let decks: Vec<_> = invoker
            .calls
            .borrow()
            .iter()
            .filter(|(action, _)| action == "createDeck")
            .map(|(_, params)| params["deck"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(decks, ["Neuroanatomia::Difícil", "Neuroanatomia::Médio"]);
    }

    #[test]
    fn note_answer_matches_text_export() {
        let records = records("CASO: x,Resposta,sindromes,,,");
        let config = Config::default();
        let invoker = Scripted::default();
        let note = Importer::new(&invoker, &config).note(&records[0]);

        assert!(!records[0].hint().is_empty());
        assert_eq!(note.fields["Back"], answer_html(&records[0]));
        assert!(
            note.fields["Back"]
                .as_str()
                .unwrap()
                .contains("<i>Dica:</i>")
        );
    }

    #[test]
    fn note_carries_mnemonic_hint_and_tags() {
        let records = records("CASO: x,Resposta,forame-monro,Monro une,,");
        let config = Config::default();
        let invoker = Scripted::default();
        let note = Importer::new(&invoker, &config).note(&records[0]);

        assert_eq!(note.deck_name, "Neuroanatomia");
        assert_eq!(note.model_name, "Basic");
        assert_eq!(note.fields["Front"], "CASO: x");
        assert_eq!(
            note.fields["Back"],
            "Resposta<br><br><i>Mnemônico:</i> Monro une"
        );
        assert_eq!(note.tags, ["neuro::forame-monro", "neuro::dificuldade::D"]);
        assert!(!note.options.allow_duplicate);

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["deckName"], "Neuroanatomia");
        assert_eq!(json["options"]["allowDuplicate"], false);
    }
}
