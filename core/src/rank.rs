use crate::index::NewsIndex;
use crate::query::Query;
use crate::NewsId;
use serde::Serialize;

/// Scoring strategy applied to a resolved result set.
pub trait Ranker: Send + Sync {
    fn score(&self, index: &NewsIndex, news_id: NewsId, query: &Query) -> f32;
}

/// Gives every result the same score, leaving id order untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unranked;

impl Ranker for Unranked {
    fn score(&self, _index: &NewsIndex, _news_id: NewsId, _query: &Query) -> f32 { 0.0 }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredNews {
    pub news_id: NewsId,
    pub score: f32,
}

/// Score `results` and order them by descending score; ties keep their input order.
pub fn rank(index: &NewsIndex, results: &[NewsId], query: &Query, ranker: &dyn Ranker) -> Vec<ScoredNews> {
    let mut scored: Vec<ScoredNews> =
        results.iter().map(|&news_id| ScoredNews { news_id, score: ranker.score(index, news_id, query) }).collect();
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexConfig;
    use crate::corpus::NewsRecord;
    use crate::index::IndexBuilder;

    struct ByIdDescending;

    impl Ranker for ByIdDescending {
        fn score(&self, _index: &NewsIndex, news_id: NewsId, _query: &Query) -> f32 { news_id as f32 }
    }

    fn index() -> NewsIndex {
        let mut b = IndexBuilder::new(IndexConfig::default());
        b.add_document("x.json", &vec![NewsRecord { article: "gato".into(), ..NewsRecord::default() }; 3]);
        b.finish()
    }

    #[test]
    fn unranked_keeps_order() {
        let idx = index();
        let q = Query::parse("gato").unwrap();
        let ranked = rank(&idx, &[0, 1, 2], &q, &Unranked);
        assert_eq!(ranked.iter().map(|s| s.news_id).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(ranked.iter().all(|s| s.score == 0.0));
    }

    #[test]
    fn custom_ranker_reorders() {
        let idx = index();
        let q = Query::parse("gato").unwrap();
        let ranked = rank(&idx, &[0, 1, 2], &q, &ByIdDescending);
        assert_eq!(ranked.iter().map(|s| s.news_id).collect::<Vec<_>>(), vec![2, 1, 0]);
    }
}
