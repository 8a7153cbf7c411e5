mod report;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use newsdex_core::rank::rank;
use newsdex_core::{index_corpus, IndexConfig, Language, NewsIndex, Query, ScoredNews, SearchOptions, Unranked};
use report::{parse_test_line, print_results, result_rows, StatsReport, SHOW_MAX};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Index news batches and answer boolean queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a corpus and print index statistics
    Stats {
        #[command(flatten)]
        index: IndexArgs,
        /// Print statistics as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Index a corpus and run queries against it
    Search {
        #[command(flatten)]
        index: IndexArgs,
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Args, Clone)]
struct IndexArgs {
    /// Corpus directory of JSON batch files, or a single batch file
    #[arg(long)]
    corpus: PathBuf,
    /// Index title, date, keywords, article and summary (default: article and date)
    #[arg(short = 'M', long, default_value_t = false)]
    multifield: bool,
    /// Record token positions, enabling phrase queries
    #[arg(short = 'P', long, default_value_t = false)]
    positional: bool,
    /// Build the stem index
    #[arg(short = 'S', long, default_value_t = false)]
    stem: bool,
    /// Build the permuterm index, enabling wildcard queries
    #[arg(short = 'W', long, default_value_t = false)]
    permuterm: bool,
    /// Stemming language
    #[arg(long, default_value = "spanish")]
    language: Language,
}

#[derive(Args, Clone)]
struct SearchArgs {
    /// Run a single query
    #[arg(short = 'Q', long, conflicts_with_all = ["list", "test"])]
    query: Option<String>,
    /// Run every query of a file, one per line
    #[arg(short = 'L', long, conflicts_with = "test")]
    list: Option<PathBuf>,
    /// Check result counts against a file of `query<TAB>count` lines
    #[arg(short = 'T', long)]
    test: Option<PathBuf>,
    /// Only print the number of results per query
    #[arg(short = 'C', long, default_value_t = false)]
    count: bool,
    /// Print every result instead of the first few
    #[arg(short = 'A', long, default_value_t = false)]
    all: bool,
    /// Print a snippet for every result
    #[arg(short = 'N', long, default_value_t = false)]
    snippet: bool,
    /// Order results with the ranking hook
    #[arg(short = 'R', long, default_value_t = false)]
    rank: bool,
    /// Expand plain terms through their stem
    #[arg(short = 's', long, default_value_t = false)]
    stem_queries: bool,
    /// Print results as JSON lines
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl IndexArgs {
    fn config(&self, stem_queries: bool) -> IndexConfig {
        IndexConfig {
            multifield: self.multifield,
            positional: self.positional,
            stemming: self.stem,
            permuterm: self.permuterm,
            stem_queries,
            language: self.language,
        }
    }

    fn build(&self, stem_queries: bool) -> Result<NewsIndex> {
        let start = std::time::Instant::now();
        let index = index_corpus(&self.corpus, self.config(stem_queries))
            .with_context(|| format!("indexing {}", self.corpus.display()))?;
        tracing::info!(took_s = start.elapsed().as_secs_f64(), "corpus indexed");
        Ok(index)
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { index, json } => {
            let stats = index.build(false)?.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", StatsReport(&stats));
            }
            Ok(())
        }
        Commands::Search { index, search } => {
            let built = index.build(search.stem_queries)?;
            Searcher { index: &built, args: &search }.run()
        }
    }
}

struct Searcher<'a> {
    index: &'a NewsIndex,
    args: &'a SearchArgs,
}

impl Searcher<'_> {
    fn options(&self) -> SearchOptions { SearchOptions { stem: self.args.stem_queries } }

    fn run(&self) -> Result<()> {
        if let Some(path) = &self.args.test {
            return self.run_tests(path);
        }
        if let Some(query) = &self.args.query {
            return self.answer(query);
        }
        if let Some(path) = &self.args.list {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            for line in text.lines().filter(|l| !l.trim().is_empty()) {
                self.answer(line.trim())?;
            }
            return Ok(());
        }
        self.interactive()
    }

    fn interactive(&self) -> Result<()> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            print!(">> ");
            io::stdout().flush()?;
            let Some(line) = lines.next().transpose()? else { break };
            let query = line.trim();
            if query.is_empty() {
                break;
            }
            self.answer(query)?;
        }
        Ok(())
    }

    /// Resolve and print one query. Malformed queries are reported, not fatal.
    fn answer(&self, query: &str) -> Result<()> {
        let parsed = match Query::parse(query) {
            Ok(q) => q,
            Err(err) => {
                eprintln!("invalid query '{query}': {err}");
                return Ok(());
            }
        };
        let results = self.index.evaluate(&parsed, self.options());
        if self.args.count {
            println!("{query}\t{}", results.len());
            return Ok(());
        }

        let ranked: Vec<ScoredNews> = if self.args.rank {
            rank(self.index, &results, &parsed, &Unranked)
        } else {
            results.iter().map(|&news_id| ScoredNews { news_id, score: 0.0 }).collect()
        };
        let limit = if self.args.all { usize::MAX } else { SHOW_MAX };
        let rows = result_rows(self.index, &parsed, &ranked, limit, self.args.snippet)?;
        if self.args.json {
            for row in &rows {
                println!("{}", serde_json::to_string(row)?);
            }
        } else {
            print_results(query, results.len(), &rows);
        }
        Ok(())
    }

    fn run_tests(&self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let (mut total, mut failed) = (0usize, 0usize);
        for (query, expected) in text.lines().filter_map(parse_test_line) {
            total += 1;
            let got = match Query::parse(query) {
                Ok(parsed) => Some(self.index.evaluate(&parsed, self.options()).len()),
                Err(err) => {
                    eprintln!("invalid query '{query}': {err}");
                    None
                }
            };
            if got == Some(expected) {
                println!("{query}\t{expected}");
            } else {
                failed += 1;
                let got = got.map_or_else(|| "error".to_owned(), |n| n.to_string());
                println!(">>>>{query}\t{expected} != {got}<<<<");
            }
        }
        if failed > 0 {
            bail!("{failed} of {total} test queries failed");
        }
        println!("all {total} test queries passed");
        Ok(())
    }
}
