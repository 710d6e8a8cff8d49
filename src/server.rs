//! HTTP API server.
//!
//! Wires the configured store backend into an axum router:
//!
//! - `POST /memory` — store a memory record
//! - `GET /memory` — retrieve records for a lead (optional type/query/limit)
//! - `GET /memory/{id}` — inspect a single record
//! - `GET /memory/context/{lead_id}` — synthesize the lead context
//! - `POST /knowledge` / `GET /knowledge` — add and search knowledge items
//! - `GET /stats`, `GET /health`
//!
//! Store calls are synchronous (rusqlite behind a mutex), so every handler
//! runs them under `spawn_blocking`.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::config::DossierConfig;
use crate::error::Error;
use crate::knowledge::search::{self as knowledge_search, NewItem, SearchRequest};
use crate::knowledge::types::{ContentType, KnowledgeItem};
use crate::memory::retrieve::{self, RetrieveRequest};
use crate::memory::store::{store_memory as store_memory_op, StoreRequest};
use crate::memory::synthesis;
use crate::memory::types::{ContentMap, LeadContext, MemoryRecord, MemoryType};
use crate::store::{self, Store, StoreStats};

#[derive(Clone)]
struct AppState {
    store: Arc<dyn Store>,
    config: Arc<DossierConfig>,
}

/// Start the HTTP server with the configured backend.
pub async fn serve(config: DossierConfig) -> anyhow::Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(addr = %bind_addr, backend = %config.storage.backend, "starting dossier API server");

    let store: Arc<dyn Store> = Arc::from(store::create_store(&config)?);
    let state = AppState {
        store,
        config: Arc::new(config),
    };

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "listening at http://{bind_addr}");

    axum::serve(listener, api_router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to listen for ctrl-c");
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}

fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/memory", post(store_memory).get(retrieve_memories))
        .route("/memory/context/{lead_id}", get(lead_context))
        .route("/memory/{id}", get(get_memory))
        .route("/knowledge", post(add_knowledge).get(search_knowledge))
        .route("/stats", get(store_stats))
        .with_state(state)
}

// ── Error mapping ─────────────────────────────────────────────────────────────

struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Run a synchronous store operation off the async runtime.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, Error> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError(Error::Unavailable(format!("blocking task failed: {e}"))))?
        .map_err(ApiError)
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Deserialize)]
struct StoreMemoryBody {
    lead_id: String,
    memory_type: String,
    content: ContentMap,
    confidence: Option<f64>,
}

async fn store_memory(
    State(state): State<AppState>,
    Json(body): Json<StoreMemoryBody>,
) -> Result<(StatusCode, Json<MemoryRecord>), ApiError> {
    let memory_type: MemoryType = body.memory_type.parse()?;
    let req = StoreRequest {
        lead_id: body.lead_id,
        memory_type,
        content: body.content,
        confidence: body
            .confidence
            .or(Some(state.config.retrieval.default_confidence)),
    };

    let store = Arc::clone(&state.store);
    let record = run_blocking(move || store_memory_op(store.as_ref(), req)).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Deserialize)]
struct RetrieveParams {
    lead_id: String,
    memory_type: Option<String>,
    query: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, serde::Serialize)]
struct RetrieveResponse {
    results: Vec<MemoryRecord>,
    total: usize,
}

async fn retrieve_memories(
    State(state): State<AppState>,
    Query(params): Query<RetrieveParams>,
) -> Result<Json<RetrieveResponse>, ApiError> {
    let memory_type = params
        .memory_type
        .map(|s| s.parse::<MemoryType>())
        .transpose()?;
    let req = RetrieveRequest {
        lead_id: params.lead_id,
        memory_type,
        query: params.query,
        limit: params.limit.unwrap_or(state.config.retrieval.default_limit),
    };

    let store = Arc::clone(&state.store);
    let results = run_blocking(move || retrieve::retrieve(store.as_ref(), &req)).await?;
    let total = results.len();
    Ok(Json(RetrieveResponse { results, total }))
}

async fn get_memory(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MemoryRecord>, ApiError> {
    let store = Arc::clone(&state.store);
    let record = run_blocking(move || store.get_memory(&id)).await?;
    Ok(Json(record))
}

async fn lead_context(
    State(state): State<AppState>,
    Path(lead_id): Path<String>,
) -> Result<Json<LeadContext>, ApiError> {
    let store = Arc::clone(&state.store);
    let context = run_blocking(move || synthesis::synthesize(store.as_ref(), &lead_id)).await?;
    Ok(Json(context))
}

#[derive(Debug, Deserialize)]
struct AddItemBody {
    org_id: Option<String>,
    title: String,
    content: String,
    content_type: String,
}

async fn add_knowledge(
    State(state): State<AppState>,
    Json(body): Json<AddItemBody>,
) -> Result<(StatusCode, Json<KnowledgeItem>), ApiError> {
    let content_type: ContentType = body.content_type.parse()?;
    let req = NewItem {
        org_id: body
            .org_id
            .unwrap_or_else(|| state.config.storage.default_org.clone()),
        title: body.title,
        content: body.content,
        content_type,
    };

    let store = Arc::clone(&state.store);
    let item = run_blocking(move || knowledge_search::add_item(store.as_ref(), req)).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[derive(Debug, Deserialize)]
struct KnowledgeParams {
    org_id: Option<String>,
    query: Option<String>,
    content_type: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, serde::Serialize)]
struct KnowledgeResponse {
    results: Vec<KnowledgeItem>,
    total: usize,
}

async fn search_knowledge(
    State(state): State<AppState>,
    Query(params): Query<KnowledgeParams>,
) -> Result<Json<KnowledgeResponse>, ApiError> {
    let content_type = params
        .content_type
        .map(|s| s.parse::<ContentType>())
        .transpose()?;
    let req = SearchRequest {
        org_id: params
            .org_id
            .unwrap_or_else(|| state.config.storage.default_org.clone()),
        query: params.query.unwrap_or_default(),
        content_type,
        limit: params.limit.unwrap_or(state.config.retrieval.default_limit),
    };

    let store = Arc::clone(&state.store);
    let results = run_blocking(move || knowledge_search::search(store.as_ref(), &req)).await?;
    let total = results.len();
    Ok(Json(KnowledgeResponse { results, total }))
}

async fn store_stats(State(state): State<AppState>) -> Result<Json<StoreStats>, ApiError> {
    let store = Arc::clone(&state.store);
    let stats = run_blocking(move || store.stats()).await?;
    Ok(Json(stats))
}
