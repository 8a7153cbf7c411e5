use crate::corpus::NewsRecord;
use crate::field::Field;
use crate::tokenizer::tokenize;

const BEFORE: usize = 4;
const AFTER: usize = 5;

/// Context windows around the first occurrence of each term, one per line,
/// wrapped in double quotes. Terms of untokenized fields are skipped.
pub fn snippet(record: &NewsRecord, terms: &[(Field, &str)]) -> String {
    let mut windows = Vec::new();
    for &(field, term) in terms {
        if !field.is_tokenized() {
            continue;
        }
        let tokens = tokenize(record.field(field));
        let Some(pos) = tokens.iter().position(|t| t == term) else { continue };
        let start = pos.saturating_sub(BEFORE);
        let end = (pos + AFTER).min(tokens.len() - 1);
        let mut window = String::new();
        if start > 0 {
            window.push_str("...");
        }
        window.push_str(&tokens[start..=end].join(" "));
        if end < tokens.len() - 1 {
            window.push_str("...");
        }
        windows.push(window);
    }
    format!("\"{}\"", windows.join("\n"))
}
