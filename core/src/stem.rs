use crate::config::Language;
use crate::index::FieldIndex;
use rust_stemmers::Stemmer;
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};

/// Stem -> surface terms of one field that reduce to it.
pub struct StemIndex {
    stemmer: Stemmer,
    stems: HashMap<String, BTreeSet<String>>,
}

impl StemIndex {
    pub fn new(language: Language) -> Self {
        Self { stemmer: Stemmer::create(language.algorithm()), stems: HashMap::new() }
    }

    /// Group every term of a finished field index by its stem.
    pub fn build(language: Language, index: &FieldIndex) -> Self {
        let mut stems = Self::new(language);
        for term in index.terms() {
            stems.insert(term);
        }
        stems
    }

    /// Idempotent: inserting a term twice leaves the index unchanged.
    pub fn insert(&mut self, term: &str) {
        let stem = self.stemmer.stem(term).into_owned();
        self.stems.entry(stem).or_default().insert(term.to_owned());
    }

    pub fn stem<'a>(&self, term: &'a str) -> Cow<'a, str> { self.stemmer.stem(term) }

    /// Indexed terms sharing `term`'s stem.
    pub fn terms_for(&self, term: &str) -> Option<&BTreeSet<String>> { self.stems.get(self.stem(term).as_ref()) }

    pub fn len(&self) -> usize { self.stems.len() }

    pub fn is_empty(&self) -> bool { self.stems.is_empty() }
}
