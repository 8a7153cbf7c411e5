//! Batch files on disk: JSON arrays of news records.

use crate::config::IndexConfig;
use crate::field::Field;
use crate::index::{IndexBuilder, NewsIndex};
use crate::{DocId, NewsId};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub article: String,
    #[serde(default)]
    pub summary: String,
}

impl NewsRecord {
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Date => &self.date,
            Field::Keywords => &self.keywords,
            Field::Article => &self.article,
            Field::Summary => &self.summary,
        }
    }
}

/// Parse one batch file.
pub fn load_batch(path: &Path) -> Result<Vec<NewsRecord>> {
    let f = File::open(path).with_context(|| format!("opening batch {}", path.display()))?;
    let records = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing batch {}", path.display()))?;
    Ok(records)
}

/// Batch files under `root` in a stable order. A file path is returned as is.
pub fn batch_files(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                tracing::warn!(%err, "skipping unreadable corpus entry");
                None
            }
        })
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    files.sort();
    files
}

/// Index every batch under `root` and finish the build.
pub fn index_corpus(root: &Path, config: IndexConfig) -> Result<NewsIndex> {
    if !root.exists() {
        return Err(anyhow!("corpus path {} does not exist", root.display()));
    }
    let mut builder = IndexBuilder::new(config);
    for file in batch_files(root) {
        let records = load_batch(&file)?;
        builder.add_document(file.to_string_lossy(), &records);
    }
    Ok(builder.finish())
}

/// Reads news records back from their batch files. Each batch is parsed at
/// most once per reader, so one reader should serve a whole result listing.
pub struct RecordReader<'a> {
    index: &'a NewsIndex,
    batches: HashMap<DocId, Vec<NewsRecord>>,
}

impl<'a> RecordReader<'a> {
    pub fn new(index: &'a NewsIndex) -> Self { Self { index, batches: HashMap::new() } }

    pub fn read(&mut self, news_id: NewsId) -> Result<NewsRecord> {
        let loc = self.index.location(news_id).ok_or_else(|| anyhow!("unknown news id {news_id}"))?;
        let records = match self.batches.entry(loc.doc_id) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let path = self.index.document(loc.doc_id).ok_or_else(|| anyhow!("unknown document {}", loc.doc_id))?;
                e.insert(load_batch(Path::new(path))?)
            }
        };
        records
            .get(loc.offset)
            .cloned()
            .ok_or_else(|| anyhow!("batch {} has no record at offset {}", loc.doc_id, loc.offset))
    }

    /// Batches parsed so far.
    pub fn loaded(&self) -> usize { self.batches.len() }
}

/// Re-read a single news record from its batch file.
pub fn read_record(index: &NewsIndex, news_id: NewsId) -> Result<NewsRecord> { RecordReader::new(index).read(news_id) }
