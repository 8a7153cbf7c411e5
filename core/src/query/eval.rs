use super::ast::Query;
use crate::config::SearchOptions;
use crate::index::NewsIndex;
use crate::postings::{complement, difference, intersect, union};
use crate::NewsId;

enum Step<'q> {
    Visit(&'q Query),
    Combine(&'q Query),
}

/// For a binary operand, the node whose postings are actually computed:
/// negations are folded into the combining step.
fn operand(node: &Query) -> (&Query, bool) {
    match node {
        Query::Not(inner) => (&**inner, true),
        other => (other, false),
    }
}

impl NewsIndex {
    /// Evaluate a parsed query with an explicit work stack. Never mutates the index.
    pub fn evaluate(&self, query: &Query, options: SearchOptions) -> Vec<NewsId> {
        let mut work = vec![Step::Visit(query)];
        let mut values: Vec<Vec<NewsId>> = Vec::new();

        while let Some(step) = work.pop() {
            match step {
                Step::Visit(node) => match node {
                    Query::Not(inner) => {
                        work.push(Step::Combine(node));
                        work.push(Step::Visit(&**inner));
                    }
                    Query::And(l, r) | Query::Or(l, r) => {
                        work.push(Step::Combine(node));
                        work.push(Step::Visit(operand(r).0));
                        work.push(Step::Visit(operand(l).0));
                    }
                    leaf => values.push(self.resolve_leaf(leaf, options)),
                },
                Step::Combine(node) => {
                    let combined = match node {
                        Query::Not(_) => {
                            let a = values.pop().unwrap_or_default();
                            complement(self.universe(), &a)
                        }
                        Query::And(l, r) | Query::Or(l, r) => {
                            let b = values.pop().unwrap_or_default();
                            let a = values.pop().unwrap_or_default();
                            self.combine(node, operand(l).1, operand(r).1, &a, &b)
                        }
                        leaf => self.resolve_leaf(leaf, options),
                    };
                    values.push(combined);
                }
            }
        }

        let result = values.pop().unwrap_or_default();
        tracing::debug!(query = %query, hits = result.len(), "evaluated query");
        result
    }

    fn combine(&self, node: &Query, not_a: bool, not_b: bool, a: &[NewsId], b: &[NewsId]) -> Vec<NewsId> {
        let all = self.universe();
        match (node, not_a, not_b) {
            (Query::And(..), true, true) => complement(all, &union(a, b)),
            (Query::And(..), true, false) => difference(b, a),
            (Query::And(..), false, true) => difference(a, b),
            (Query::And(..), false, false) => intersect(a, b),
            (Query::Or(..), true, true) => complement(all, &intersect(a, b)),
            (Query::Or(..), true, false) => complement(all, &difference(a, b)),
            (Query::Or(..), false, true) => complement(all, &difference(b, a)),
            _ => union(a, b),
        }
    }

    fn resolve_leaf(&self, leaf: &Query, options: SearchOptions) -> Vec<NewsId> {
        match leaf {
            Query::Term { field, term } if options.stem => self.stem_postings(*field, term),
            Query::Term { field, term } => self.term_postings(*field, term),
            Query::Wildcard { field, pattern } => self.wildcard_postings(*field, pattern),
            Query::Phrase { field, terms } => self.phrase_postings(*field, terms),
            _ => Vec::new(),
        }
    }
}
