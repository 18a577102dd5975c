use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use search_core::{DocumentStore, Engine, EngineConfig};
use serde_json::Value;
use std::io::Cursor;
use tempfile::tempdir;
use tower::ServiceExt;

fn build_tiny_index(dir: &std::path::Path) -> EngineConfig {
    let config = EngineConfig::with_index_dir(dir);
    let catalog = DocumentStore::open(&config.catalog_path).unwrap();
    let mut engine = Engine::with_catalog(config.clone(), catalog);
    for (title, body) in [
        ("test1", "Do you quarrel, sir?"),
        ("test2", "No better."),
        ("test3", "Quarrel sir! no, sir!"),
    ] {
        engine.add_document(title, Cursor::new(body.as_bytes())).unwrap();
    }
    engine.flush().unwrap();
    config
}

async fn call(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    let config = build_tiny_index(dir.path());
    let app = server::build_app(config).unwrap();

    let (status, body) = call(app, "/search?q=quarrel%20sir&k=5").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 2);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["doc_id"], 3);
    assert_eq!(arr[0]["title"], "test3");
    assert_eq!(arr[0]["rank"], 1);
    assert_eq!(arr[1]["doc_id"], 1);
}

#[tokio::test]
async fn search_without_matches_is_empty() {
    let dir = tempdir().unwrap();
    let app = server::build_app(build_tiny_index(dir.path())).unwrap();

    let (status, body) = call(app, "/search?q=better%20quarrel").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 0);
    assert!(json["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn doc_lookup() {
    let dir = tempdir().unwrap();
    let app = server::build_app(build_tiny_index(dir.path())).unwrap();

    let (status, body) = call(app.clone(), "/doc/2").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["title"], "test2");
    assert_eq!(json["term_count"], 2);

    let (status, _) = call(app, "/doc/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_searches_agree() {
    let dir = tempdir().unwrap();
    let app = server::build_app(build_tiny_index(dir.path())).unwrap();

    let (a, b) = tokio::join!(call(app.clone(), "/search?q=sir"), call(app, "/search?q=quarrel%20sir&k=1"));
    assert_eq!(a.0, StatusCode::OK);
    assert_eq!(b.0, StatusCode::OK);
    let a: Value = serde_json::from_slice(&a.1).unwrap();
    let b: Value = serde_json::from_slice(&b.1).unwrap();
    assert_eq!(a["total_hits"], 2);
    assert_eq!(b["total_hits"], 2);
    assert_eq!(b["results"].as_array().unwrap().len(), 1);
    assert_eq!(b["results"][0]["title"], "test3");
}
