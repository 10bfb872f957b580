use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use watson_core::persist::{load_index, IndexPaths};
use watson_core::{rank, DocId, DocumentStats, InvertedIndex, Normalizer, DEFAULT_TOP_K};

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { DEFAULT_TOP_K }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub tokens: Vec<String>,
    pub took_s: f64,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f32,
    pub title: String,
}

/// An immutable index generation. Queries rank against a cloned `Arc` so a
/// reload never blocks or disturbs searches already in flight. The normalizer
/// follows the settings the index was built with.
pub struct Snapshot {
    pub index: InvertedIndex,
    pub stats: DocumentStats,
    pub normalizer: Normalizer,
}

impl Snapshot {
    pub fn load(root: &std::path::Path) -> watson_core::Result<Self> {
        let loaded = load_index(&IndexPaths::new(root))?;
        Ok(Self {
            normalizer: Normalizer::with_config(loaded.meta.normalization),
            index: loaded.index,
            stats: loaded.stats,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub index_paths_root: PathBuf,
    pub snapshot: Arc<RwLock<Arc<Snapshot>>>,
    pub admin_token: Option<String>,
}

impl AppState {
    fn current(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }
}

pub fn build_app(index_dir: String) -> Result<Router> {
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    build_app_with_token(index_dir, admin_token)
}

pub fn build_app_with_token(index_dir: String, admin_token: Option<String>) -> Result<Router> {
    // Load the whole index at startup
    let snapshot = Snapshot::load(std::path::Path::new(&index_dir))?;
    let app_state = AppState {
        index_paths_root: PathBuf::from(&index_dir),
        snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
        admin_token,
    };

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
        .route("/index/reload", post(index_reload))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let snapshot = state.current();
    let tokens = snapshot.normalizer.normalize_query(&params.q);
    let k = params.k.clamp(1, 100);
    let results = rank(&tokens, &snapshot.index, &snapshot.stats, k)
        .into_iter()
        .map(|r| SearchHit { doc_id: r.doc_id, score: r.score, title: r.title })
        .collect();
    let elapsed = start.elapsed();
    Json(SearchResponse { query: params.q, tokens, took_s: elapsed.as_secs_f64(), results })
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<DocId>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let snapshot = state.current();
    match snapshot.index.document(doc_id) {
        Some(doc) => Ok(Json(serde_json::json!({
            "doc_id": doc_id,
            "title": doc.title,
            "length": snapshot.stats.doc_length(doc_id),
            "body": doc.body.join(" "),
        }))),
        None => Err((StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" })))),
    }
}

// --- Admin endpoints ---
async fn index_reload(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let snapshot = Snapshot::load(&state.index_paths_root)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let num_docs = snapshot.index.num_docs();
    *state.snapshot.write() = Arc::new(snapshot);
    tracing::info!(num_docs, "index reloaded");
    Ok(Json(serde_json::json!({ "num_docs": num_docs })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
