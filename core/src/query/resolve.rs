//! Leaf resolution: turn one term, phrase or pattern into a posting list.
//!
//! Every resolver treats a missing term, an unindexed field or a disabled
//! feature as an empty result.

use crate::field::Field;
use crate::index::{FieldIndex, NewsIndex};
use crate::permuterm::RotatedPattern;
use crate::postings;
use crate::NewsId;

fn union_of<'a>(index: &FieldIndex, terms: impl IntoIterator<Item = &'a str>) -> Vec<NewsId> {
    terms.into_iter().fold(Vec::new(), |acc, term| postings::union(&acc, &index.news_ids(term)))
}

impl NewsIndex {
    /// Direct lookup of `term` in `field`.
    pub fn term_postings(&self, field: Field, term: &str) -> Vec<NewsId> {
        self.field(field).map(|index| index.news_ids(term)).unwrap_or_default()
    }

    /// Union of the postings of every indexed term sharing `term`'s stem.
    /// Untokenized fields are looked up directly.
    pub fn stem_postings(&self, field: Field, term: &str) -> Vec<NewsId> {
        if !field.is_tokenized() {
            return self.term_postings(field, term);
        }
        let (Some(index), Some(stems)) = (self.field(field), self.stems(field)) else {
            tracing::debug!(%field, "stem index not built");
            return Vec::new();
        };
        match stems.terms_for(term) {
            Some(group) => union_of(index, group.iter().map(String::as_str)),
            None => Vec::new(),
        }
    }

    /// News items where `terms` occur at consecutive positions of `field`.
    pub fn phrase_postings(&self, field: Field, terms: &[String]) -> Vec<NewsId> {
        let Some(index) = self.field(field) else { return Vec::new() };
        let Some((first, rest)) = terms.split_first() else { return Vec::new() };
        if !index.is_positional() {
            tracing::debug!(%field, "phrase query without positional index");
            return Vec::new();
        }
        let Some(first_postings) = index.postings(first) else { return Vec::new() };
        let rest: Option<Vec<_>> = rest.iter().map(|t| index.postings(t)).collect();
        let Some(rest) = rest else { return Vec::new() };

        let mut out = Vec::new();
        for (&news, posting) in first_postings {
            let starts = posting.positions().unwrap_or_default();
            let matched = starts.iter().any(|&start| {
                rest.iter().enumerate().all(|(k, postings)| {
                    postings.get(&news).is_some_and(|p| p.contains_position(start + k as u32 + 1))
                })
            });
            if matched {
                out.push(news);
            }
        }
        out
    }

    /// Union of the postings of every term matching a single-wildcard pattern.
    /// A pattern without a wildcard falls back to a direct lookup.
    pub fn wildcard_postings(&self, field: Field, pattern: &str) -> Vec<NewsId> {
        let Some(rotated) = RotatedPattern::new(pattern) else {
            return if crate::permuterm::wildcard_count(pattern) == 0 {
                self.term_postings(field, pattern)
            } else {
                Vec::new()
            };
        };
        let (Some(index), Some(permuterm)) = (self.field(field), self.permuterm(field)) else {
            tracing::debug!(%field, "permuterm index not built");
            return Vec::new();
        };
        union_of(index, permuterm.matching_terms(&rotated))
    }
}
