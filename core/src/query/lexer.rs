use super::error::QueryError;
use crate::field::Field;
use crate::tokenizer::normalize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    And,
    Or,
    Not,
    Open,
    Close,
    Operand(Operand),
}

/// A literal operand, already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Operand {
    pub field: Option<Field>,
    pub text: OperandText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum OperandText {
    Word(String),
    Quoted(Vec<String>),
}

fn operator(word: &str) -> Option<Token> {
    match word {
        "AND" => Some(Token::And),
        "OR" => Some(Token::Or),
        "NOT" => Some(Token::Not),
        "(" => Some(Token::Open),
        ")" => Some(Token::Close),
        _ => None,
    }
}

fn quoted_words(body: &str) -> Vec<String> {
    normalize(body).split_whitespace().map(str::to_owned).collect()
}

/// Split an optional `field:` qualifier off a literal.
fn qualifier(literal: &str) -> Result<(Option<Field>, &str), QueryError> {
    match literal.split_once(':') {
        Some((prefix, rest)) if !prefix.is_empty() && !prefix.contains('"') => {
            let field = prefix.parse::<Field>().map_err(|_| QueryError::UnknownField(prefix.to_owned()))?;
            Ok((Some(field), rest))
        }
        _ => Ok((None, literal)),
    }
}

/// Interpret one pre-split literal: `word`, `field:word`, `"a b"`, `field:"a b"`.
/// Unquoted whitespace also makes a phrase.
fn literal_operand(literal: &str) -> Result<Operand, QueryError> {
    let (field, body) = qualifier(literal)?;
    let text = if let Some(inner) = body.strip_prefix('"') {
        let inner = inner.strip_suffix('"').ok_or(QueryError::UnterminatedPhrase)?;
        OperandText::Quoted(quoted_words(inner))
    } else if body.split_whitespace().nth(1).is_some() {
        OperandText::Quoted(quoted_words(body))
    } else {
        OperandText::Word(normalize(body.trim()))
    };
    Ok(Operand { field, text })
}

/// Tokenize a raw query string.
pub(crate) fn lex(input: &str) -> Result<Vec<Token>, QueryError> {
    let mut tokens = Vec::new();
    let mut rest = input;
    loop {
        rest = rest.trim_start();
        let Some(first) = rest.chars().next() else { break };
        match first {
            '(' | ')' => {
                tokens.extend(operator(&rest[..1]));
                rest = &rest[1..];
            }
            _ => {
                let (literal, tail) = split_literal(rest)?;
                tokens.push(match operator(literal) {
                    Some(op) => op,
                    None => Token::Operand(literal_operand(literal)?),
                });
                rest = tail;
            }
        }
    }
    Ok(tokens)
}

/// Take the next literal off `input`: a run of characters up to whitespace or a
/// parenthesis, where a double quote extends the literal to its closing quote.
fn split_literal(input: &str) -> Result<(&str, &str), QueryError> {
    let mut in_quotes = false;
    for (at, c) in input.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '(' | ')' if !in_quotes => return Ok(input.split_at(at)),
            c if c.is_whitespace() && !in_quotes => return Ok(input.split_at(at)),
            _ => {}
        }
    }
    if in_quotes {
        return Err(QueryError::UnterminatedPhrase);
    }
    Ok((input, ""))
}

/// Tokenize an already split query: each item is an operator, a parenthesis or
/// one literal operand.
pub(crate) fn lex_split<I, S>(items: I) -> Result<Vec<Token>, QueryError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .filter(|s| !s.as_ref().trim().is_empty())
        .map(|s| {
            let s = s.as_ref().trim();
            match operator(s) {
                Some(op) => Ok(op),
                None => literal_operand(s).map(Token::Operand),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(field: Option<Field>, w: &str) -> Token {
        Token::Operand(Operand { field, text: OperandText::Word(w.into()) })
    }

    fn quoted(field: Option<Field>, ws: &[&str]) -> Token {
        Token::Operand(Operand { field, text: OperandText::Quoted(ws.iter().map(|w| w.to_string()).collect()) })
    }

    #[test]
    fn operators_and_parentheses() {
        let t = lex("NOT (Gato OR perro)AND arbol").unwrap();
        assert_eq!(
            t,
            vec![
                Token::Not,
                Token::Open,
                word(None, "gato"),
                Token::Or,
                word(None, "perro"),
                Token::Close,
                Token::And,
                word(None, "arbol"),
            ]
        );
    }

    #[test]
    fn lowercase_operators_are_words() {
        assert_eq!(lex("gato and perro").unwrap().len(), 3);
        assert_eq!(lex("gato and perro").unwrap()[1], word(None, "and"));
    }

    #[test]
    fn quoted_phrases_keep_spaces() {
        let t = lex(r#""Sube al  arbol" OR title:"el gato""#).unwrap();
        assert_eq!(t[0], quoted(None, &["sube", "al", "arbol"]));
        assert_eq!(t[2], quoted(Some(Field::Title), &["el", "gato"]));
    }

    #[test]
    fn field_qualifiers() {
        let t = lex("date:2015-03-21 keywords:Gato").unwrap();
        assert_eq!(t[0], word(Some(Field::Date), "2015-03-21"));
        assert_eq!(t[1], word(Some(Field::Keywords), "gato"));
        assert_eq!(lex("body:x"), Err(QueryError::UnknownField("body".into())));
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        assert_eq!(lex(r#""sube al"#), Err(QueryError::UnterminatedPhrase));
    }

    #[test]
    fn pre_split_items() {
        let t = lex_split(["(", "gato", "OR", "sube al", ")", "NOT", "title:\"x y\""]).unwrap();
        assert_eq!(t[2], Token::Or);
        assert_eq!(t[3], quoted(None, &["sube", "al"]));
        assert_eq!(t[6], quoted(Some(Field::Title), &["x", "y"]));
    }
}
