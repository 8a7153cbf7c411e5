use super::ast::Query;
use super::error::QueryError;
use super::lexer::{Operand, OperandText, Token};
use crate::field::Field;
use crate::permuterm::wildcard_count;

const MAX_DEPTH: usize = 128;

/// Build a query tree from lexed tokens. No tokens at all is the empty query.
pub(crate) fn parse(tokens: Vec<Token>) -> Result<Query, QueryError> {
    if tokens.is_empty() {
        return Ok(Query::Empty);
    }
    let mut parser = Parser { tokens, pos: 0 };
    let query = parser.expr(0)?;
    match parser.peek() {
        None => Ok(query),
        Some(Token::Close) => Err(QueryError::UnexpectedCloseParen(parser.pos)),
        Some(_) => Err(QueryError::MissingOperator(parser.pos)),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> { self.tokens.get(self.pos) }

    /// expr := unary ((AND | OR) unary)*
    fn expr(&mut self, depth: usize) -> Result<Query, QueryError> {
        let mut lhs = self.unary(depth, None)?;
        loop {
            let op = match self.peek() {
                Some(Token::And) => "AND",
                Some(Token::Or) => "OR",
                _ => break,
            };
            self.pos += 1;
            let rhs = self.unary(depth, Some(op))?;
            lhs = if op == "AND" { Query::and(lhs, rhs) } else { Query::or(lhs, rhs) };
        }
        Ok(lhs)
    }

    /// unary := NOT unary | '(' expr? ')' | operand+
    ///
    /// `after` names the operator whose right operand is being parsed.
    fn unary(&mut self, depth: usize, after: Option<&'static str>) -> Result<Query, QueryError> {
        if depth > MAX_DEPTH {
            return Err(QueryError::TooDeep(MAX_DEPTH));
        }
        let at = self.pos;
        match self.peek() {
            None => Err(QueryError::MissingOperand(after.unwrap_or("NOT"))),
            Some(Token::Not) => {
                self.pos += 1;
                Ok(Query::negate(self.unary(depth + 1, Some("NOT"))?))
            }
            Some(Token::Open) => {
                self.pos += 1;
                match self.peek() {
                    None => return Err(QueryError::UnclosedParen(at)),
                    Some(Token::Close) => {
                        self.pos += 1;
                        return Ok(Query::Empty);
                    }
                    Some(_) => {}
                }
                let inner = self.expr(depth + 1)?;
                match self.peek() {
                    Some(Token::Close) => {
                        self.pos += 1;
                        Ok(inner)
                    }
                    None => Err(QueryError::UnclosedParen(at)),
                    Some(_) => Err(QueryError::MissingOperator(self.pos)),
                }
            }
            Some(Token::Close) => Err(QueryError::UnexpectedCloseParen(at)),
            Some(Token::And) => Err(QueryError::MisplacedOperator("AND", at)),
            Some(Token::Or) => Err(QueryError::MisplacedOperator("OR", at)),
            Some(Token::Operand(_)) => {
                let mut run = Vec::new();
                while let Some(Token::Operand(operand)) = self.tokens.get(self.pos) {
                    run.push(operand.clone());
                    self.pos += 1;
                }
                leaf(run)
            }
        }
    }
}

fn words_leaf(field: Field, words: Vec<String>) -> Query {
    match words.len() {
        0 => Query::Empty,
        1 => Query::Term { field, term: words.into_iter().next().unwrap_or_default() },
        _ => Query::Phrase { field, terms: words },
    }
}

fn phrase_words(operand: Operand, words: &mut Vec<String>) -> Result<(), QueryError> {
    let items = match operand.text {
        OperandText::Word(w) => vec![w],
        OperandText::Quoted(ws) => ws,
    };
    for w in items.into_iter().filter(|w| !w.is_empty()) {
        if wildcard_count(&w) > 0 {
            return Err(QueryError::WildcardInPhrase(w));
        }
        words.push(w);
    }
    Ok(())
}

/// Turn a run of adjacent operands into one leaf. More than one operand, or a
/// quoted operand, is a phrase in the field of the first operand.
fn leaf(run: Vec<Operand>) -> Result<Query, QueryError> {
    let mut run = run.into_iter();
    let Some(first) = run.next() else { return Ok(Query::Empty) };
    let field = first.field.unwrap_or(Field::DEFAULT);

    if run.len() == 0 {
        match &first.text {
            OperandText::Word(w) => {
                return match wildcard_count(w) {
                    _ if w.is_empty() => Ok(Query::Empty),
                    0 => Ok(Query::Term { field, term: w.clone() }),
                    1 => Ok(Query::Wildcard { field, pattern: w.clone() }),
                    _ => Err(QueryError::MultipleWildcards(w.clone())),
                };
            }
            // quoting one word makes it literal, `*` and `?` included
            OperandText::Quoted(words) if words.len() == 1 => {
                return Ok(Query::Term { field, term: words[0].clone() });
            }
            OperandText::Quoted(_) => {}
        }
    }

    let mut words = Vec::new();
    phrase_words(first, &mut words)?;
    for operand in run {
        if let Some(f) = operand.field {
            return Err(QueryError::FieldInPhrase(f.name().to_owned()));
        }
        phrase_words(operand, &mut words)?;
    }
    Ok(words_leaf(field, words))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(t: &str) -> Query { Query::term(Field::Article, t) }

    fn parse(q: &str) -> Result<Query, QueryError> { Query::parse(q) }

    #[test]
    fn empty_inputs() {
        assert_eq!(parse(""), Ok(Query::Empty));
        assert_eq!(parse("   "), Ok(Query::Empty));
        assert_eq!(parse("()"), Ok(Query::Empty));
        assert_eq!(parse("gato AND ()"), Ok(Query::and(term("gato"), Query::Empty)));
    }

    #[test]
    fn left_to_right_without_precedence() {
        let q = parse("a OR b AND c").unwrap();
        assert_eq!(q, Query::and(Query::or(term("a"), term("b")), term("c")));
        let q = parse("a AND (b OR c)").unwrap();
        assert_eq!(q, Query::and(term("a"), Query::or(term("b"), term("c"))));
    }

    #[test]
    fn not_binds_to_next_operand() {
        let q = parse("NOT a AND NOT b").unwrap();
        assert_eq!(q, Query::and(Query::negate(term("a")), Query::negate(term("b"))));
        let q = parse("NOT (a OR b)").unwrap();
        assert_eq!(q, Query::negate(Query::or(term("a"), term("b"))));
    }

    #[test]
    fn adjacent_operands_form_a_phrase() {
        let q = parse("title:sube al arbol OR x").unwrap();
        let phrase = Query::Phrase { field: Field::Title, terms: vec!["sube".into(), "al".into(), "arbol".into()] };
        assert_eq!(q, Query::or(phrase, term("x")));
        assert_eq!(parse(r#""gato""#).unwrap(), term("gato"));
    }

    #[test]
    fn wildcards() {
        assert_eq!(parse("ga*").unwrap(), Query::Wildcard { field: Field::Article, pattern: "ga*".into() });
        assert_eq!(parse("g*t?"), Err(QueryError::MultipleWildcards("g*t?".into())));
        assert_eq!(parse("el ga*"), Err(QueryError::WildcardInPhrase("ga*".into())));
        assert_eq!(parse(r#""ga*""#), Ok(term("ga*")));
        assert_eq!(parse(r#"title:"g?to""#), Ok(Query::term(Field::Title, "g?to")));
        assert_eq!(parse(r#""el ga*""#), Err(QueryError::WildcardInPhrase("ga*".into())));
    }

    #[test]
    fn malformed_queries() {
        assert_eq!(parse("(gato AND perro"), Err(QueryError::UnclosedParen(0)));
        assert_eq!(parse("gato)"), Err(QueryError::UnexpectedCloseParen(1)));
        assert_eq!(parse("gato AND"), Err(QueryError::MissingOperand("AND")));
        assert_eq!(parse("NOT"), Err(QueryError::MissingOperand("NOT")));
        assert_eq!(parse("OR gato"), Err(QueryError::MisplacedOperator("OR", 0)));
        assert_eq!(parse("(gato) perro"), Err(QueryError::MissingOperator(3)));
        assert_eq!(parse("gato title:perro"), Err(QueryError::FieldInPhrase("title".into())));
    }

    #[test]
    fn nesting_is_bounded() {
        let deep = format!("{}gato{}", "(".repeat(500), ")".repeat(500));
        assert_eq!(parse(&deep), Err(QueryError::TooDeep(MAX_DEPTH)));
        let fine = format!("{}gato{}", "(".repeat(20), ")".repeat(20));
        assert_eq!(parse(&fine), Ok(term("gato")));
    }

    #[test]
    fn display_is_canonical() {
        let q = parse(r#"NOT title:gato OR "sube al" AND ga*"#).unwrap();
        assert_eq!(q.to_string(), r#"((NOT title:gato OR "sube al") AND ga*)"#);
    }
}
