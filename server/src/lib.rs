use axum::extract::{Path, Query as QueryParams, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use newsdex_core::corpus::{read_record, RecordReader};
use newsdex_core::rank::rank;
use newsdex_core::snippet::snippet;
use newsdex_core::{IndexStats, NewsId, NewsIndex, NewsRecord, Query, Ranker, SearchOptions, Unranked};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default)]
    pub snippet: bool,
    /// Overrides the index's query-time stemming default.
    pub stem: Option<bool>,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    /// Canonical, fully parenthesized form of the parsed query.
    pub parsed: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub news_id: NewsId,
    pub score: f32,
    pub date: String,
    pub title: String,
    pub keywords: String,
    pub snippet: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (status, Json(ErrorBody { error: error.to_string() }))
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<NewsIndex>,
    pub ranker: Arc<dyn Ranker>,
}

pub fn build_app(index: NewsIndex) -> Router {
    let state = AppState { index: Arc::new(index), ranker: Arc::new(Unranked) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/news/:news_id", get(news_handler))
        .route("/stats", get(stats_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let parsed = Query::parse(&params.q).map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;
    let options = SearchOptions { stem: params.stem.unwrap_or(state.index.config().stem_queries) };
    let k = params.k.clamp(1, 100);
    let with_snippet = params.snippet;

    // evaluation and batch re-reads block
    let (parsed, total_hits, results) = tokio::task::spawn_blocking(move || {
        let hits = state.index.evaluate(&parsed, options);
        let results = load_hits(&state, &parsed, &hits, k, with_snippet)?;
        anyhow::Ok((parsed, hits.len(), results))
    })
    .await
    .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?
    .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    let elapsed = start.elapsed();
    tracing::debug!(query = %parsed, total_hits, "search served");
    Ok(Json(SearchResponse {
        query: params.q,
        parsed: parsed.to_string(),
        took_s: elapsed.as_secs_f64(),
        total_hits,
        results,
    }))
}

/// Rank `hits` and load the records of the top `k`.
fn load_hits(
    state: &AppState,
    query: &Query,
    hits: &[NewsId],
    k: usize,
    with_snippet: bool,
) -> anyhow::Result<Vec<SearchHit>> {
    let ranked = rank(&state.index, hits, query, state.ranker.as_ref());
    let terms = query.highlight_terms();
    let mut reader = RecordReader::new(&state.index);
    ranked
        .into_iter()
        .take(k)
        .map(|hit| {
            let record = reader.read(hit.news_id)?;
            let excerpt = with_snippet.then(|| highlight_terms(&snippet(&record, &terms), &terms));
            Ok(SearchHit {
                news_id: hit.news_id,
                score: hit.score,
                date: record.date,
                title: record.title,
                keywords: record.keywords,
                snippet: excerpt,
            })
        })
        .collect()
}

pub async fn news_handler(
    State(state): State<AppState>,
    Path(news_id): Path<NewsId>,
) -> Result<Json<NewsRecord>, ApiError> {
    if state.index.location(news_id).is_none() {
        return Err(api_error(StatusCode::NOT_FOUND, format!("news {news_id} not found")));
    }
    read_record(&state.index, news_id)
        .map(Json)
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<IndexStats> { Json(state.index.stats()) }

fn highlight_terms(snippet: &str, terms: &[(newsdex_core::Field, &str)]) -> String {
    let mut s = snippet.to_string();
    for (_, t) in terms {
        if t.trim().is_empty() {
            continue;
        }
        let Ok(pat) = regex::RegexBuilder::new(&format!(r"\b{}\b", regex::escape(t))).case_insensitive(true).build()
        else {
            continue;
        };
        s = pat.replace_all(&s, |caps: &regex::Captures| format!("<em>{}</em>", &caps[0])).to_string();
    }
    s
}
