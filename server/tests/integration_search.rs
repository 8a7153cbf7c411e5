use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use newsdex_core::{index_corpus, IndexConfig};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tower::ServiceExt;

fn write_tiny_corpus(dir: &Path) {
    let batch = r#"[
      {"title": "Gato al rescate", "date": "2015-03-21", "keywords": "gato",
       "article": "El gato sube al arbol del parque.", "summary": "Un gato."},
      {"title": "Perro", "date": "2015-03-22", "keywords": "perro",
       "article": "El perro baja del arbol.", "summary": "Un perro."}
    ]"#;
    fs::write(dir.join("batch.json"), batch).unwrap();
}

fn app(dir: &Path) -> Router {
    let cfg = IndexConfig { multifield: true, positional: true, permuterm: true, ..IndexConfig::default() };
    server::build_app(index_corpus(dir, cfg).unwrap())
}

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[tokio::test]
async fn search_returns_matching_news() {
    let dir = tempdir().unwrap();
    write_tiny_corpus(dir.path());

    let (status, json) = call(app(dir.path()), "/search?q=arbol").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 2);
    let ids: Vec<u64> = json["results"].as_array().unwrap().iter().map(|r| r["news_id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![0, 1]);

    let (_, json) = call(app(dir.path()), "/search?q=gato%20AND%20NOT%20title:perro&snippet=true").await;
    assert_eq!(json["total_hits"], 1);
    assert_eq!(json["results"][0]["title"], "Gato al rescate");
    assert!(json["results"][0]["snippet"].as_str().unwrap().contains("<em>gato</em>"));

    let (_, json) = call(app(dir.path()), "/search?q=%22baja%20del%20arbol%22%20OR%20pa*").await;
    assert_eq!(json["total_hits"], 2);
}

#[tokio::test]
async fn malformed_query_is_a_bad_request() {
    let dir = tempdir().unwrap();
    write_tiny_corpus(dir.path());
    let (status, json) = call(app(dir.path()), "/search?q=(gato").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("unmatched"));
}

#[tokio::test]
async fn news_and_stats_endpoints() {
    let dir = tempdir().unwrap();
    write_tiny_corpus(dir.path());

    let (status, json) = call(app(dir.path()), "/news/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Perro");

    let (status, _) = call(app(dir.path()), "/news/7").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = call(app(dir.path()), "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["news"], 2);
    assert_eq!(json["days"], 2);
    assert_eq!(json["positional"], true);
}
