use crate::config::IndexConfig;
use crate::corpus::NewsRecord;
use crate::field::Field;
use crate::permuterm::PermutermIndex;
use crate::stats::{FieldStats, IndexStats};
use crate::stem::StemIndex;
use crate::tokenizer::{normalize, TokenStream};
use crate::{DocId, NewsId};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Occurrences of one term in one news item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Posting {
    /// Non-positional mode: number of occurrences.
    Count(u32),
    /// Positional mode: strictly increasing zero-based token offsets.
    Positions(Vec<u32>),
}

impl Posting {
    pub fn positions(&self) -> Option<&[u32]> {
        match self {
            Posting::Count(_) => None,
            Posting::Positions(p) => Some(p.as_slice()),
        }
    }

    pub fn contains_position(&self, offset: u32) -> bool {
        self.positions().is_some_and(|p| p.binary_search(&offset).is_ok())
    }
}

/// Postings of one term, keyed by news id (iteration is ascending).
pub type PostingMap = BTreeMap<NewsId, Posting>;

/// Inverted index of a single field.
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    positional: bool,
    terms: HashMap<String, PostingMap>,
}

impl FieldIndex {
    pub fn new(positional: bool) -> Self { Self { positional, terms: HashMap::new() } }

    /// Register one occurrence of `term` at `offset` inside news item `news`.
    /// Offsets for one (term, news) pair must arrive in increasing order.
    pub fn add_occurrence(&mut self, term: &str, news: NewsId, offset: u32) {
        if !self.terms.contains_key(term) {
            self.terms.insert(term.to_owned(), PostingMap::new());
        }
        let Some(postings) = self.terms.get_mut(term) else { return };
        let positional = self.positional;
        let posting = postings
            .entry(news)
            .or_insert_with(|| if positional { Posting::Positions(Vec::new()) } else { Posting::Count(0) });
        match posting {
            Posting::Count(n) => *n += 1,
            Posting::Positions(p) => p.push(offset),
        }
    }

    pub fn postings(&self, term: &str) -> Option<&PostingMap> { self.terms.get(term) }

    /// Sorted news ids containing `term`; empty on a miss.
    pub fn news_ids(&self, term: &str) -> Vec<NewsId> {
        self.terms.get(term).map(|p| p.keys().copied().collect()).unwrap_or_default()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ { self.terms.keys().map(String::as_str) }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    pub fn is_positional(&self) -> bool { self.positional }
}

/// Where a news record lives: its batch file and its offset inside that file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NewsLocation {
    pub doc_id: DocId,
    pub offset: usize,
}

/// Accumulates field indexes while batches are fed in. `finish` derives the
/// stem and permuterm indexes and hands back the read-only `NewsIndex`.
#[derive(Debug)]
pub struct IndexBuilder {
    config: IndexConfig,
    fields: BTreeMap<Field, FieldIndex>,
    docs: Vec<String>,
    news: Vec<NewsLocation>,
    tokens: u64,
}

impl IndexBuilder {
    /// Query-time stemming needs the stem index, so `stem_queries` turns
    /// `stemming` on.
    pub fn new(config: IndexConfig) -> Self {
        let config = IndexConfig { stemming: config.stemming || config.stem_queries, ..config };
        let fields = config.fields().iter().map(|&f| (f, FieldIndex::new(config.positional))).collect();
        Self { config, fields, docs: Vec::new(), news: Vec::new(), tokens: 0 }
    }

    /// Register one batch file and index every record in it, in order.
    pub fn add_document(&mut self, source: impl Into<String>, records: &[NewsRecord]) -> DocId {
        let doc_id = self.docs.len() as DocId;
        self.docs.push(source.into());
        for (offset, record) in records.iter().enumerate() {
            self.add_news(doc_id, offset, record);
        }
        tracing::debug!(doc_id, news = records.len(), "indexed batch");
        doc_id
    }

    fn add_news(&mut self, doc_id: DocId, offset: usize, record: &NewsRecord) -> NewsId {
        let news_id = self.news.len() as NewsId;
        self.news.push(NewsLocation { doc_id, offset });
        for (&field, index) in self.fields.iter_mut() {
            let text = record.field(field);
            if !field.is_tokenized() {
                let value = normalize(text.trim());
                if !value.is_empty() {
                    index.add_occurrence(&value, news_id, 0);
                    self.tokens += 1;
                }
                continue;
            }
            let stream = TokenStream::new(text);
            for (offset, token) in stream.iter().enumerate() {
                index.add_occurrence(token, news_id, offset as u32);
                self.tokens += 1;
            }
        }
        news_id
    }

    pub fn finish(self) -> NewsIndex {
        let IndexBuilder { config, fields, docs, news, tokens } = self;
        let stems = config.stemming.then(|| {
            fields.iter().map(|(&f, index)| (f, StemIndex::build(config.language, index))).collect()
        });
        let permuterms = config
            .permuterm
            .then(|| fields.iter().map(|(&f, index)| (f, PermutermIndex::build(index))).collect());
        let universe = (0..news.len() as NewsId).collect();
        let index = NewsIndex { config, fields, stems, permuterms, docs, news, universe, tokens };
        tracing::info!(
            news = index.news_count(),
            documents = index.docs.len(),
            tokens,
            terms = index.fields.values().map(FieldIndex::len).sum::<usize>(),
            "index build complete"
        );
        index
    }
}

/// A fully built, read-only index session.
pub struct NewsIndex {
    config: IndexConfig,
    fields: BTreeMap<Field, FieldIndex>,
    stems: Option<BTreeMap<Field, StemIndex>>,
    permuterms: Option<BTreeMap<Field, PermutermIndex>>,
    docs: Vec<String>,
    news: Vec<NewsLocation>,
    universe: Vec<NewsId>,
    tokens: u64,
}

impl NewsIndex {
    pub fn config(&self) -> &IndexConfig { &self.config }

    /// `None` when the field was not indexed under this config.
    pub fn field(&self, field: Field) -> Option<&FieldIndex> { self.fields.get(&field) }

    /// `None` when stemming was not enabled at build time.
    pub fn stems(&self, field: Field) -> Option<&StemIndex> { self.stems.as_ref()?.get(&field) }

    /// `None` when permuterm was not enabled at build time.
    pub fn permuterm(&self, field: Field) -> Option<&PermutermIndex> { self.permuterms.as_ref()?.get(&field) }

    pub fn news_count(&self) -> usize { self.news.len() }

    pub fn document_count(&self) -> usize { self.docs.len() }

    /// All registered news ids, ascending.
    pub fn universe(&self) -> &[NewsId] { &self.universe }

    pub fn location(&self, news_id: NewsId) -> Option<NewsLocation> { self.news.get(news_id as usize).copied() }

    /// Source label (file path) a batch was registered with.
    pub fn document(&self, doc_id: DocId) -> Option<&str> { self.docs.get(doc_id as usize).map(String::as_str) }

    pub fn token_count(&self) -> u64 { self.tokens }

    pub fn stats(&self) -> IndexStats {
        let fields = self
            .fields
            .iter()
            .map(|(&field, index)| FieldStats {
                field,
                terms: index.len(),
                permuterms: self.permuterm(field).map(PermutermIndex::len),
                stems: self.stems(field).map(StemIndex::len),
            })
            .collect();
        IndexStats {
            days: self.field(Field::Date).map_or(0, FieldIndex::len),
            news: self.news_count(),
            documents: self.document_count(),
            tokens: self.tokens,
            fields,
            multifield: self.config.multifield,
            positional: self.config.positional,
            stemming: self.config.stemming,
            permuterm: self.config.permuterm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(article: &str, date: &str) -> NewsRecord {
        NewsRecord { article: article.into(), date: date.into(), ..NewsRecord::default() }
    }

    #[test]
    fn counts_occurrences_without_positions() {
        let mut b = IndexBuilder::new(IndexConfig::default());
        b.add_document("a.json", &[record("rojo rojo azul", "2020-01-01")]);
        let idx = b.finish();
        let article = idx.field(Field::Article).unwrap();
        assert_eq!(article.postings("rojo").unwrap()[&0], Posting::Count(2));
        assert!(!article.is_positional());
        assert_eq!(idx.token_count(), 4);
    }

    #[test]
    fn records_positions_in_positional_mode() {
        let cfg = IndexConfig { positional: true, ..IndexConfig::default() };
        let mut b = IndexBuilder::new(cfg);
        b.add_document("a.json", &[record("rojo azul rojo", "")]);
        let idx = b.finish();
        let article = idx.field(Field::Article).unwrap();
        assert_eq!(article.postings("rojo").unwrap()[&0], Posting::Positions(vec![0, 2]));
        assert!(article.postings("azul").unwrap()[&0].contains_position(1));
    }

    #[test]
    fn dates_are_one_literal_token() {
        let mut b = IndexBuilder::new(IndexConfig::default());
        b.add_document("a.json", &[record("x", "2015-03-21"), record("y", "")]);
        let idx = b.finish();
        let date = idx.field(Field::Date).unwrap();
        assert_eq!(date.news_ids("2015-03-21"), vec![0]);
        assert_eq!(date.len(), 1);
    }

    #[test]
    fn locations_track_batch_and_offset() {
        let mut b = IndexBuilder::new(IndexConfig::default());
        b.add_document("a.json", &[record("x", ""), record("y", "")]);
        b.add_document("b.json", &[record("z", "")]);
        let idx = b.finish();
        assert_eq!(idx.location(2), Some(NewsLocation { doc_id: 1, offset: 0 }));
        assert_eq!(idx.document(1), Some("b.json"));
        assert_eq!(idx.universe(), &[0, 1, 2]);
        assert!(idx.location(3).is_none());
    }

    #[test]
    fn stem_queries_imply_a_stem_index() {
        let cfg = IndexConfig { stem_queries: true, ..IndexConfig::default() };
        let mut b = IndexBuilder::new(cfg);
        b.add_document("a.json", &[record("los gatos", ""), record("un gato", "")]);
        let idx = b.finish();
        assert!(idx.config().stemming);
        assert!(idx.stems(Field::Article).is_some());
        assert_eq!(idx.search("gato").unwrap(), vec![0, 1]);
    }

    #[test]
    fn derived_indexes_only_when_enabled() {
        let idx = IndexBuilder::new(IndexConfig::default()).finish();
        assert!(idx.stems(Field::Article).is_none());
        assert!(idx.permuterm(Field::Article).is_none());
        assert!(idx.field(Field::Title).is_none());
    }
}
