use std::{num::NonZeroUsize, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::format::Quoting;

/// Configuration for the card pipeline and the import client.
///
/// Passed explicitly to the components that need it; nothing reads it from
/// global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Address of the AnkiConnect endpoint.
    pub endpoint: String,

    /// Number of notes submitted per `addNotes` call.
    batch_size: NonZeroUsize,

    /// Request timeout, in seconds.
    timeout_secs: u64,

    /// Target deck name.
    pub deck: String,

    /// Target note type.
    pub note_type: String,

    /// Note field receiving the question.
    pub question_field: String,

    /// Note field receiving the answer (plus mnemonic and hint).
    pub answer_field: String,

    /// Root of the hierarchical tags written on export.
    ///
    /// An empty root writes bare tags.
    pub tag_root: String,

    /// Whether input files start with a header line.
    pub has_header: bool,

    /// Quoting policy of the delimited output.
    pub quoting: Quoting,

    /// Whether each category is filed under its own sub-deck.
    pub split_by_category: bool,

    /// Whether classification runs on the rayon thread pool.
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            batch_size: default_batch_size(),
            timeout_secs: default_timeout_secs(),
            deck: default_deck(),
            note_type: default_note_type(),
            question_field: default_question_field(),
            answer_field: default_answer_field(),
            tag_root: default_tag_root(),
            has_header: true,
            quoting: Quoting::Minimal,
            split_by_category: false,
            parallel: false,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Number of notes per import batch.
    #[must_use]
    pub const fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    /// Sets the import batch size.
    pub const fn set_batch_size(&mut self, batch_size: NonZeroUsize) {
        self.batch_size = batch_size;
    }

    /// The request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Sets the request timeout, rounded down to whole seconds.
    pub const fn set_timeout(&mut self, timeout: Duration) {
        self.timeout_secs = timeout.as_secs();
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8765".to_string()
}

const fn default_batch_size() -> NonZeroUsize {
    NonZeroUsize::new(50).expect("50 is non-zero")
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_deck() -> String {
    "Neuroanatomia".to_string()
}

fn default_note_type() -> String {
    "Basic".to_string()
}

fn default_question_field() -> String {
    "Front".to_string()
}

fn default_answer_field() -> String {
    "Back".to_string()
}

fn default_tag_root() -> String {
    "neuro".to_string()
}

const fn default_true() -> bool {
    true
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_endpoint")]
        endpoint: String,

        #[serde(default = "default_batch_size")]
        batch_size: NonZeroUsize,

        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,

        #[serde(default = "default_deck")]
        deck: String,

        #[serde(default = "default_note_type")]
        note_type: String,

        #[serde(default = "default_question_field")]
        question_field: String,

        #[serde(default = "default_answer_field")]
        answer_field: String,

        #[serde(default = "default_tag_root")]
        tag_root: String,

        #[serde(default = "default_true")]
        has_header: bool,

        #[serde(default)]
        quoting: Quoting,

        #[serde(default)]
        split_by_category: bool,

        #[serde(default)]
        parallel: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                endpoint,
                batch_size,
                timeout_secs,
                deck,
                note_type,
                question_field,
                answer_field,
                tag_root,
                has_header,
                quoting,
                split_by_category,
                parallel,
            } => Self {
                endpoint,
                batch_size,
                timeout_secs,
                deck,
                note_type,
                question_field,
                answer_field,
                tag_root,
                has_header,
                quoting,
                split_by_category,
                parallel,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            endpoint: config.endpoint,
            batch_size: config.batch_size,
            timeout_secs: config.timeout_secs,
            deck: config.deck,
            note_type: config.note_type,
            question_field: config.question_field,
            answer_field: config.answer_field,
            tag_root: config.tag_root,
            has_header: config.has_header,
            quoting: config.quoting,
            split_by_category: config.split_by_category,
            parallel: config.parallel,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nendpoint = \"http://anki:9000\"\nbatch_size = 10\ntimeout_secs = 5\ndeck = \"Neuro\"\nquoting = \"always\"\nsplit_by_category = true\nhas_header = false\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.endpoint, "http://anki:9000");
        assert_eq!(config.batch_size().get(), 10);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.deck, "Neuro");
        assert_eq!(config.quoting, Quoting::Always);
        assert!(config.split_by_category);
        assert!(!config.has_header);
        assert_eq!(config.note_type, "Basic");
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nbatch_size = \"many\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let result: Result<Config, _> = toml::from_str("_version = \"1\"\nbatch_size = 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("flashcards.toml");

        let mut config = Config::default();
        config.deck = "Outro".to_string();
        config.set_batch_size(NonZeroUsize::new(7).unwrap());
        config.set_timeout(Duration::from_secs(12));
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
