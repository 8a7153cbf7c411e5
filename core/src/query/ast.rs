use super::error::QueryError;
use super::{lexer, parser};
use crate::field::Field;
use crate::permuterm::wildcard_count;
use std::{fmt, mem};

/// Parsed boolean query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// `()` or an empty query string; matches nothing.
    Empty,
    Term { field: Field, term: String },
    /// A term holding exactly one `*` or `?`.
    Wildcard { field: Field, pattern: String },
    /// Words that must appear at consecutive positions.
    Phrase { field: Field, terms: Vec<String> },
    Not(Box<Query>),
    And(Box<Query>, Box<Query>),
    Or(Box<Query>, Box<Query>),
}

impl Query {
    pub fn parse(input: &str) -> Result<Query, QueryError> { parser::parse(lexer::lex(input)?) }

    /// Parse a query already split into operators, parentheses and literals.
    pub fn from_tokens<I, S>(items: I) -> Result<Query, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        parser::parse(lexer::lex_split(items)?)
    }

    pub fn term(field: Field, term: impl Into<String>) -> Query { Query::Term { field, term: term.into() } }

    pub fn and(lhs: Query, rhs: Query) -> Query { Query::And(Box::new(lhs), Box::new(rhs)) }

    pub fn or(lhs: Query, rhs: Query) -> Query { Query::Or(Box::new(lhs), Box::new(rhs)) }

    pub fn negate(inner: Query) -> Query { Query::Not(Box::new(inner)) }

    /// Words of the term and phrase leaves that are not under a `NOT`, in
    /// query order. Used to pick snippet windows.
    pub fn highlight_terms(&self) -> Vec<(Field, &str)> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Query::Term { field, term } => out.push((*field, term.as_str())),
                Query::Phrase { field, terms } => out.extend(terms.iter().map(|t| (*field, t.as_str()))),
                Query::And(l, r) | Query::Or(l, r) => {
                    stack.push(&**r);
                    stack.push(&**l);
                }
                Query::Empty | Query::Wildcard { .. } | Query::Not(_) => {}
            }
        }
        out
    }
}

/// Move the children of `node` out, leaving empty leaves behind.
fn detach_children(node: &mut Query, out: &mut Vec<Query>) {
    match node {
        Query::Not(inner) => out.push(mem::replace(&mut **inner, Query::Empty)),
        Query::And(l, r) | Query::Or(l, r) => {
            out.push(mem::replace(&mut **l, Query::Empty));
            out.push(mem::replace(&mut **r, Query::Empty));
        }
        _ => {}
    }
}

// A long `a AND b AND ...` chain is one box level per operator; the derived
// drop glue would recurse that deep.
impl Drop for Query {
    fn drop(&mut self) {
        let mut detached = Vec::new();
        detach_children(self, &mut detached);
        while let Some(mut node) = detached.pop() {
            detach_children(&mut node, &mut detached);
        }
    }
}

fn write_field(f: &mut fmt::Formatter<'_>, field: Field) -> fmt::Result {
    if field == Field::DEFAULT {
        Ok(())
    } else {
        write!(f, "{field}:")
    }
}

enum Piece<'q> {
    Node(&'q Query),
    Text(&'static str),
}

fn push_binary<'q>(pending: &mut Vec<Piece<'q>>, lhs: &'q Query, op: &'static str, rhs: &'q Query) {
    pending.push(Piece::Text(")"));
    pending.push(Piece::Node(rhs));
    pending.push(Piece::Text(op));
    pending.push(Piece::Node(lhs));
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![Piece::Node(self)];
        while let Some(piece) = pending.pop() {
            let node = match piece {
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Node(node) => node,
            };
            match node {
                Query::Empty => f.write_str("()")?,
                Query::Term { field, term } => {
                    write_field(f, *field)?;
                    // quoted so a literal `*` or `?` does not read back as a pattern
                    if wildcard_count(term) > 0 {
                        write!(f, "\"{term}\"")?;
                    } else {
                        f.write_str(term)?;
                    }
                }
                Query::Wildcard { field, pattern } => {
                    write_field(f, *field)?;
                    f.write_str(pattern)?;
                }
                Query::Phrase { field, terms } => {
                    write_field(f, *field)?;
                    write!(f, "\"{}\"", terms.join(" "))?;
                }
                Query::Not(inner) => {
                    f.write_str("NOT ")?;
                    pending.push(Piece::Node(&**inner));
                }
                Query::And(l, r) => {
                    f.write_str("(")?;
                    push_binary(&mut pending, &**l, " AND ", &**r);
                }
                Query::Or(l, r) => {
                    f.write_str("(")?;
                    push_binary(&mut pending, &**l, " OR ", &**r);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tall_trees_print_and_drop_without_recursing() {
        let worker = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(|| {
                let mut q = Query::term(Field::Article, "a");
                for _ in 0..200_000 {
                    q = Query::negate(q);
                }
                let shown = q.to_string();
                drop(q);
                shown.len()
            })
            .unwrap();
        assert_eq!(worker.join().unwrap(), 200_000 * "NOT ".len() + 1);
    }

    #[test]
    fn literal_wildcard_characters_print_quoted() {
        let q = Query::term(Field::Title, "a*");
        assert_eq!(q.to_string(), r#"title:"a*""#);
        assert_eq!(Query::parse(&q.to_string()), Ok(q));
    }
}
