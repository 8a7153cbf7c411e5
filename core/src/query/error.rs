use thiserror::Error;

/// Reasons a query string cannot be turned into a query tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("unmatched '(' at token {0}")]
    UnclosedParen(usize),

    #[error("unmatched ')' at token {0}")]
    UnexpectedCloseParen(usize),

    #[error("operator {0} is missing its right operand")]
    MissingOperand(&'static str),

    #[error("operator {0} at token {1} has no left operand")]
    MisplacedOperator(&'static str, usize),

    #[error("missing operator before token {0}")]
    MissingOperator(usize),

    #[error("unterminated quoted phrase")]
    UnterminatedPhrase,

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("pattern '{0}' has more than one wildcard character")]
    MultipleWildcards(String),

    #[error("wildcard pattern '{0}' cannot be part of a phrase")]
    WildcardInPhrase(String),

    #[error("field qualifier '{0}' inside a phrase")]
    FieldInPhrase(String),

    #[error("query nesting exceeds {0} levels")]
    TooDeep(usize),
}
