use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named field of a news record. Each indexed field gets its own inverted index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Date,
    Keywords,
    Article,
    Summary,
}

impl Field {
    pub const ALL: [Field; 5] = [Field::Title, Field::Date, Field::Keywords, Field::Article, Field::Summary];

    /// Field used for unqualified query terms.
    pub const DEFAULT: Field = Field::Article;

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Date => "date",
            Field::Keywords => "keywords",
            Field::Article => "article",
            Field::Summary => "summary",
        }
    }

    /// Dates are indexed as one literal value instead of a token sequence.
    pub fn is_tokenized(self) -> bool { self != Field::Date }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown field '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Title".parse::<Field>().unwrap(), Field::Title);
        assert_eq!("article".parse::<Field>().unwrap(), Field::Article);
        assert!("body".parse::<Field>().is_err());
    }

    #[test]
    fn only_date_is_untokenized() {
        let untokenized: Vec<Field> = Field::ALL.into_iter().filter(|f| !f.is_tokenized()).collect();
        assert_eq!(untokenized, vec![Field::Date]);
    }
}
