use anyhow::Result;
use newsdex_core::corpus::RecordReader;
use newsdex_core::snippet::snippet;
use newsdex_core::{IndexStats, NewsIndex, Query, ScoredNews};
use serde::Serialize;
use std::fmt;

/// Results printed per query unless every result is requested.
pub const SHOW_MAX: usize = 10;

const RULE: &str = "========================================";
const THIN_RULE: &str = "----------------------------------------";

pub struct StatsReport<'a>(pub &'a IndexStats);

impl fmt::Display for StatsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Number of indexed files: {}", s.documents)?;
        writeln!(f, "{THIN_RULE}")?;
        writeln!(f, "Number of indexed days: {}", s.days)?;
        writeln!(f, "{THIN_RULE}")?;
        writeln!(f, "Number of indexed news: {}", s.news)?;
        writeln!(f, "{THIN_RULE}")?;
        writeln!(f, "TOKENS ({} total):", s.tokens)?;
        for field in &s.fields {
            writeln!(f, "     # of tokens in '{}': {}", field.field, field.terms)?;
        }
        writeln!(f, "{THIN_RULE}")?;
        if s.permuterm {
            writeln!(f, "PERMUTERM:")?;
            for field in &s.fields {
                writeln!(f, "     # of permuterms in '{}': {}", field.field, field.permuterms.unwrap_or(0))?;
            }
            writeln!(f, "{THIN_RULE}")?;
        }
        if s.stemming {
            writeln!(f, "STEMS:")?;
            for field in &s.fields {
                writeln!(f, "     # of stems in '{}': {}", field.field, field.stems.unwrap_or(0))?;
            }
            writeln!(f, "{THIN_RULE}")?;
        }
        if s.positional {
            writeln!(f, "Positional queries are allowed.")?;
        } else {
            writeln!(f, "Positional queries are NOT allowed.")?;
        }
        write!(f, "{RULE}")
    }
}

#[derive(Debug, Serialize)]
pub struct ResultRow {
    pub rank: usize,
    pub news_id: u32,
    pub score: f32,
    pub date: String,
    pub title: String,
    pub keywords: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Load the records behind the first `limit` results.
pub fn result_rows(
    index: &NewsIndex,
    query: &Query,
    ranked: &[ScoredNews],
    limit: usize,
    with_snippet: bool,
) -> Result<Vec<ResultRow>> {
    let terms = query.highlight_terms();
    let mut reader = RecordReader::new(index);
    ranked
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, hit)| {
            let record = reader.read(hit.news_id)?;
            Ok(ResultRow {
                rank: i + 1,
                news_id: hit.news_id,
                score: hit.score,
                snippet: with_snippet.then(|| snippet(&record, &terms)),
                date: record.date,
                title: record.title,
                keywords: record.keywords,
            })
        })
        .collect()
}

pub fn print_results(query: &str, total: usize, rows: &[ResultRow]) {
    println!("{RULE}");
    println!("Query: {query}");
    println!("Number of results: {total}");
    for row in rows {
        match &row.snippet {
            None => println!(
                "#{}\t({}) ({}) ({}) {} ({})",
                row.rank, row.score, row.news_id, row.date, row.title, row.keywords
            ),
            Some(snippet) => {
                println!("#{}", row.rank);
                println!("Score: {}", row.score);
                println!("{}", row.news_id);
                println!("Date: {}", row.date);
                println!("Title: {}", row.title);
                println!("Keywords: {}", row.keywords);
                println!("{snippet}");
            }
        }
    }
    println!("{RULE}");
}

/// A line of a query test file: `query<TAB>expected count`.
pub fn parse_test_line(line: &str) -> Option<(&str, usize)> {
    let line = line.trim_end();
    if line.trim().is_empty() || line.starts_with('#') {
        return None;
    }
    let (query, expected) = line.rsplit_once('\t')?;
    Some((query, expected.trim().parse().ok()?))
}
