pub mod config;
pub mod corpus;
pub mod field;
pub mod index;
pub mod permuterm;
pub mod postings;
pub mod query;
pub mod rank;
pub mod snippet;
pub mod stats;
pub mod stem;
pub mod tokenizer;

/// Dense, sequential identifier of one news record across the whole corpus.
pub type NewsId = u32;
/// Dense, sequential identifier of one indexed batch file.
pub type DocId = u32;

pub use config::{IndexConfig, Language, SearchOptions};
pub use corpus::{index_corpus, NewsRecord};
pub use field::Field;
pub use index::{FieldIndex, IndexBuilder, NewsIndex, NewsLocation, Posting};
pub use query::{Query, QueryError};
pub use rank::{Ranker, ScoredNews, Unranked};
pub use stats::IndexStats;
