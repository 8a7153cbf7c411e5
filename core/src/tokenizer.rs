use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+").expect("valid regex");
}

/// NFKC-normalize and lowercase. Applied to indexed text and to query operands alike.
pub fn normalize(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// Normalized field text that can be walked any number of times as a lazy
/// sequence of word tokens. Runs of non-word characters are discarded.
#[derive(Debug, Clone)]
pub struct TokenStream {
    normalized: String,
}

impl TokenStream {
    pub fn new(text: &str) -> Self { Self { normalized: normalize(text) } }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        WORD.find_iter(&self.normalized).map(|m| m.as_str())
    }
}

/// Tokenize text into owned lowercase word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    TokenStream::new(text).iter().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("El gato, sube; al ÁRBOL!");
        assert_eq!(t, vec!["el", "gato", "sube", "al", "árbol"]);
    }

    #[test]
    fn stream_is_restartable() {
        let stream = TokenStream::new("uno dos tres");
        assert_eq!(stream.iter().count(), 3);
        assert_eq!(stream.iter().next(), Some("uno"));
    }

    #[test]
    fn punctuation_only_yields_nothing() {
        assert!(tokenize(" -- ... !! ").is_empty());
    }
}
