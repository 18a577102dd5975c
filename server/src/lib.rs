use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use search_core::tokenizer::query_terms;
use search_core::{DocumentId, DocumentStore, EngineConfig, Error, Searcher};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};

const MAX_K: usize = 100;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub rank: usize,
    pub doc_id: u64,
    pub score: f64,
    pub title: String,
}

#[derive(Clone)]
pub struct AppState {
    pub index_dir: PathBuf,
    pub catalog: DocumentStore,
}

type ApiError = (StatusCode, String);

pub fn build_app(config: EngineConfig) -> Result<Router> {
    let catalog = DocumentStore::open(&config.catalog_path)?;
    let app_state = AppState { index_dir: config.index_dir, catalog };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(app_state)
        .layer(cors);
    Ok(app)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let k = params.k.clamp(1, MAX_K);
    let query = params.q.clone();

    // Postings files and the catalog are read synchronously.
    let (total_hits, results) = tokio::task::spawn_blocking(move || run_search(&state, &query, k))
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "search task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        })??;

    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, total_hits, took_s = elapsed.as_secs_f64(), "search");
    Ok(Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results }))
}

fn run_search(state: &AppState, query: &str, k: usize) -> Result<(usize, Vec<SearchHit>), ApiError> {
    let terms = query_terms(query);
    // Fresh reader per request: its postings cache lives for this query only.
    let top = Searcher::new(&state.index_dir).search_top_k(&terms, k).map_err(internal)?;

    let mut results = Vec::with_capacity(top.score_docs.len());
    for (i, doc) in top.score_docs.into_iter().enumerate() {
        let title = state.catalog.fetch_title(doc.doc_id).map_err(internal)?;
        results.push(SearchHit { rank: i + 1, doc_id: doc.doc_id.0, score: doc.score, title });
    }
    Ok((top.total_hits, results))
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<u64>) -> Result<Json<serde_json::Value>, ApiError> {
    let doc_id = DocumentId(doc_id);
    let title = state.catalog.fetch_title(doc_id).map_err(not_found_or_internal)?;
    let term_count = state.catalog.fetch_term_count(doc_id).map_err(not_found_or_internal)?;
    Ok(Json(serde_json::json!({
        "doc_id": doc_id.0,
        "title": title,
        "term_count": term_count,
    })))
}

fn internal(err: Error) -> ApiError {
    tracing::error!(error = %err, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

fn not_found_or_internal(err: Error) -> ApiError {
    match err {
        Error::DocumentNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        err => internal(err),
    }
}
