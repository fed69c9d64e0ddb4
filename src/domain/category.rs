use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The difficulty class assigned to a study record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Reference material, abbreviations and mnemonics.
    #[serde(rename = "E")]
    Easy,
    /// The default class.
    #[serde(rename = "M")]
    Medium,
    /// Clinical reasoning, surgical approaches and comparisons.
    #[serde(rename = "D")]
    Difficult,
}

impl Category {
    /// All categories, easiest first.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Difficult];

    /// The single-letter code used in the delimited formats.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Easy => "E",
            Self::Medium => "M",
            Self::Difficult => "D",
        }
    }

    /// Human readable label, also used for per-category deck names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Fácil",
            Self::Medium => "Médio",
            Self::Difficult => "Difícil",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a category token is not one of the known values.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Unknown category '{0}': expected one of E, M, D")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "e" | "easy" | "fácil" | "facil" => Ok(Self::Easy),
            "m" | "medium" | "médio" | "medio" => Ok(Self::Medium),
            "d" | "difficult" | "difícil" | "dificil" => Ok(Self::Difficult),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}
