//! Boolean query language.
//!
//! ```text
//! expr    := unary ((AND | OR) unary)*        left to right, equal precedence
//! unary   := NOT unary | '(' expr? ')' | operand+
//! operand := [field ':'] (word | '"' words '"')
//! ```
//!
//! Two or more operands without an operator between them form a phrase.
//! A word holding `*` or `?` is a wildcard pattern.

mod ast;
mod error;
mod eval;
mod lexer;
mod parser;
mod resolve;

pub use ast::Query;
pub use error::QueryError;

use crate::config::SearchOptions;
use crate::index::NewsIndex;
use crate::NewsId;

impl NewsIndex {
    /// Parse and evaluate `query` with the index's default search options.
    pub fn search(&self, query: &str) -> Result<Vec<NewsId>, QueryError> {
        self.search_with(query, self.config().search_options())
    }

    pub fn search_with(&self, query: &str, options: SearchOptions) -> Result<Vec<NewsId>, QueryError> {
        let parsed = Query::parse(query)?;
        Ok(self.evaluate(&parsed, options))
    }

    /// Same as `search` for a query that was already split into operators,
    /// parentheses and literal operands.
    pub fn search_tokens<I, S>(&self, tokens: I) -> Result<Vec<NewsId>, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = Query::from_tokens(tokens)?;
        Ok(self.evaluate(&parsed, self.config().search_options()))
    }
}
