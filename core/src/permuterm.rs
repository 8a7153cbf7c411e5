//! Permuterm index: every rotation of `term$` points back at `term`, so a
//! pattern with one wildcard becomes a prefix scan over the rotations.

use crate::index::FieldIndex;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

/// Marks the end of a term inside its rotations.
pub const TERMINATOR: char = '$';

/// Wildcard characters understood by pattern queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wildcard {
    /// `*`: zero or more characters.
    Any,
    /// `?`: exactly one character.
    One,
}

impl Wildcard {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '*' => Some(Wildcard::Any),
            '?' => Some(Wildcard::One),
            _ => None,
        }
    }
}

/// Number of wildcard characters in `pattern`.
pub fn wildcard_count(pattern: &str) -> usize { pattern.chars().filter(|&c| Wildcard::from_char(c).is_some()).count() }

/// All `L + 1` left rotations of `term$`, ending with `term$` itself.
pub fn rotations(term: &str) -> Vec<String> {
    let mut chars: Vec<char> = term.chars().chain(std::iter::once(TERMINATOR)).collect();
    (0..chars.len())
        .map(|_| {
            chars.rotate_left(1);
            chars.iter().collect()
        })
        .collect()
}

/// A single-wildcard pattern rotated so that the wildcard is last, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotatedPattern {
    key: String,
    key_chars: usize,
    wildcard: Wildcard,
}

impl RotatedPattern {
    /// `None` unless the pattern holds exactly one wildcard character.
    pub fn new(pattern: &str) -> Option<Self> {
        if wildcard_count(pattern) != 1 {
            return None;
        }
        let mut chars: Vec<char> = pattern.chars().chain(std::iter::once(TERMINATOR)).collect();
        let at = chars.iter().position(|&c| Wildcard::from_char(c).is_some())?;
        chars.rotate_left(at + 1);
        let wildcard = chars.pop().and_then(Wildcard::from_char)?;
        Some(Self { key_chars: chars.len(), key: chars.into_iter().collect(), wildcard })
    }

    pub fn key(&self) -> &str { &self.key }

    pub fn wildcard(&self) -> Wildcard { self.wildcard }

    fn accepts(&self, rotation: &str) -> bool {
        match self.wildcard {
            Wildcard::Any => true,
            Wildcard::One => rotation.chars().count() == self.key_chars + 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PermutermIndex {
    rotations: BTreeMap<String, BTreeSet<String>>,
}

impl PermutermIndex {
    pub fn new() -> Self { Self::default() }

    pub fn build(index: &FieldIndex) -> Self {
        let mut permuterm = Self::new();
        for term in index.terms() {
            permuterm.insert(term);
        }
        permuterm
    }

    /// Idempotent, also when two rotations of the same term coincide.
    pub fn insert(&mut self, term: &str) {
        for rotation in rotations(term) {
            self.rotations.entry(rotation).or_default().insert(term.to_owned());
        }
    }

    /// Terms matched by a single-wildcard pattern, deduplicated and sorted.
    pub fn matching_terms(&self, pattern: &RotatedPattern) -> BTreeSet<&str> {
        self.rotations
            .range::<str, _>((Bound::Included(pattern.key()), Bound::Unbounded))
            .take_while(|(rotation, _)| rotation.starts_with(pattern.key()))
            .filter(|(rotation, _)| pattern.accepts(rotation))
            .flat_map(|(_, terms)| terms.iter().map(String::as_str))
            .collect()
    }

    /// Number of distinct rotations.
    pub fn len(&self) -> usize { self.rotations.len() }

    pub fn is_empty(&self) -> bool { self.rotations.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(terms: &[&str]) -> PermutermIndex {
        let mut p = PermutermIndex::new();
        for t in terms {
            p.insert(t);
        }
        p
    }

    fn matches<'a>(p: &'a PermutermIndex, pattern: &str) -> Vec<&'a str> {
        p.matching_terms(&RotatedPattern::new(pattern).unwrap()).into_iter().collect()
    }

    #[test]
    fn term_yields_length_plus_one_rotations() {
        let r = rotations("gato");
        assert_eq!(r, vec!["ato$g", "to$ga", "o$gat", "$gato", "gato$"]);
    }

    #[test]
    fn rotates_wildcard_to_the_end() {
        let p = RotatedPattern::new("ga*").unwrap();
        assert_eq!(p.key(), "$ga");
        let p = RotatedPattern::new("g?to").unwrap();
        assert_eq!(p.key(), "to$g");
        assert_eq!(p.wildcard(), Wildcard::One);
        assert!(RotatedPattern::new("gato").is_none());
        assert!(RotatedPattern::new("g*t*").is_none());
    }

    #[test]
    fn star_matches_prefix_suffix_and_infix() {
        let p = index_of(&["gato", "gasto", "perro", "gatito"]);
        assert_eq!(matches(&p, "ga*"), vec!["gasto", "gatito", "gato"]);
        assert_eq!(matches(&p, "*to"), vec!["gasto", "gatito", "gato"]);
        assert_eq!(matches(&p, "g*o"), vec!["gasto", "gatito", "gato"]);
        assert_eq!(matches(&p, "gato*"), vec!["gato"]);
        assert_eq!(matches(&p, "*").len(), 4);
    }

    #[test]
    fn question_mark_matches_exactly_one_char() {
        let p = index_of(&["gato", "pato", "plato", "ato"]);
        assert_eq!(matches(&p, "?ato"), vec!["gato", "pato"]);
        assert_eq!(matches(&p, "p?ato"), vec!["plato"]);
    }

    #[test]
    fn repetitive_terms_are_not_duplicated() {
        let p = index_of(&["aa", "aa"]);
        assert_eq!(matches(&p, "a*"), vec!["aa"]);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn multibyte_characters_rotate_by_char() {
        let p = index_of(&["árbol", "arbol"]);
        assert_eq!(matches(&p, "?rbol"), vec!["arbol", "árbol"]);
    }
}
