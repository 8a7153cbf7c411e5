use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use newsdex_core::{index_corpus, IndexConfig, Language};
use server::build_app;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Corpus directory of JSON batch files
    #[arg(long, default_value = "./corpus")]
    corpus: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Index every field instead of only article and date
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
    /// Expand plain terms through their stem by default
    #[arg(long, default_value_t = false)]
    stem_queries: bool,
    /// Stemming language
    #[arg(long, default_value = "spanish")]
    language: Language,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = IndexConfig {
        multifield: args.multifield,
        positional: args.positional,
        stemming: args.stem,
        permuterm: args.permuterm,
        stem_queries: args.stem_queries,
        language: args.language,
    };
    let index = index_corpus(&args.corpus, config).with_context(|| format!("indexing {}", args.corpus.display()))?;
    let app: Router = build_app(index);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
