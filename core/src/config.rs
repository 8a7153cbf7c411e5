use crate::field::Field;
use rust_stemmers::Algorithm;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static ALL_FIELDS: [Field; 5] = Field::ALL;
static SINGLE_FIELD: [Field; 2] = [Field::Article, Field::Date];

/// Build-time switches for one index. Fixed once the builder is created and
/// carried, read-only, by the finished `NewsIndex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Index every field instead of only `article` and `date`.
    pub multifield: bool,
    /// Record token offsets instead of occurrence counts; enables phrase queries.
    pub positional: bool,
    /// Derive the stem index after indexing.
    pub stemming: bool,
    /// Derive the permuterm index after indexing; enables wildcard queries.
    pub permuterm: bool,
    /// Expand plain terms through the stem index unless a query says otherwise.
    pub stem_queries: bool,
    pub language: Language,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            multifield: false,
            positional: false,
            stemming: false,
            permuterm: false,
            stem_queries: false,
            language: Language::Spanish,
        }
    }
}

impl IndexConfig {
    pub fn fields(&self) -> &'static [Field] {
        if self.multifield { &ALL_FIELDS[..] } else { &SINGLE_FIELD[..] }
    }

    pub fn search_options(&self) -> SearchOptions { SearchOptions { stem: self.stem_queries } }
}

/// Per-query switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Resolve plain terms through their stem.
    pub stem: bool,
}

/// Snowball stemming language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Spanish,
    English,
    French,
    Portuguese,
    Italian,
    German,
}

impl Language {
    pub fn algorithm(self) -> Algorithm {
        match self {
            Language::Spanish => Algorithm::Spanish,
            Language::English => Algorithm::English,
            Language::French => Algorithm::French,
            Language::Portuguese => Algorithm::Portuguese,
            Language::Italian => Algorithm::Italian,
            Language::German => Algorithm::German,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Language::Spanish => "spanish",
            Language::English => "english",
            Language::French => "french",
            Language::Portuguese => "portuguese",
            Language::Italian => "italian",
            Language::German => "german",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Language::Spanish,
            Language::English,
            Language::French,
            Language::Portuguese,
            Language::Italian,
            Language::German,
        ]
        .into_iter()
        .find(|l| l.name().eq_ignore_ascii_case(s))
        .ok_or_else(|| format!("unsupported stemming language '{s}'"))
    }
}
