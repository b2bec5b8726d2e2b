//! API Handlers
//!
//! HTTP request handlers for each record store endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::json;

use crate::cache::{current_timestamp_ms, CacheEngine, Record};
use crate::error::{StoreError, StoreResult};
use crate::models::{
    CreateTableRequest, CreateTableResponse, EvictResponse, FlushParams, FlushResponse, GetParams,
    HealthResponse, InsertResponse, QueryParams, QueryResponse, RecordResponse, StatsResponse,
};

/// Default row bound for predicate queries without an explicit limit.
const DEFAULT_QUERY_LIMIT: i64 = 100;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache engine
    pub engine: Arc<CacheEngine>,
}

impl AppState {
    /// Creates a new AppState around an engine.
    pub fn new(engine: Arc<CacheEngine>) -> Self {
        Self { engine }
    }
}

/// Handler for POST /tables
///
/// Registers a table and ensures its backing table exists.
pub async fn create_table_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateTableRequest>,
) -> StoreResult<Json<CreateTableResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(StoreError::InvalidRequest(error_msg));
    }

    let schema = req.schema.unwrap_or_else(|| json!({}));
    state.engine.create_table(&req.name, schema).await?;

    Ok(Json(CreateTableResponse::new(req.name)))
}

/// Handler for PUT /records/:table/:key
///
/// Stores a record in memory; persistence happens on the next flush.
pub async fn insert_handler(
    State(state): State<AppState>,
    Path((table, key)): Path<(String, String)>,
    Json(payload): Json<Record>,
) -> StoreResult<Json<InsertResponse>> {
    state.engine.upsert(&table, &key, payload).await?;

    Ok(Json(InsertResponse::new(table, key)))
}

/// Handler for GET /records/:table/:key
///
/// Retrieves a record read-through; `use_cache=false` forces a backing
/// store read.
pub async fn get_handler(
    State(state): State<AppState>,
    Path((table, key)): Path<(String, String)>,
    Query(params): Query<GetParams>,
) -> StoreResult<Json<RecordResponse>> {
    let data = state
        .engine
        .get(&table, &key, params.use_cache())
        .await?
        .ok_or_else(|| StoreError::NotFound(key.clone()))?;

    Ok(Json(RecordResponse::new(key, data)))
}

/// Handler for GET /records/:table
///
/// Runs a predicate query against the backing store, bypassing the cache.
pub async fn query_handler(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Query(params): Query<QueryParams>,
) -> StoreResult<Json<QueryResponse>> {
    let records = state
        .engine
        .query(
            &table,
            params.predicate.as_deref().unwrap_or(""),
            params.limit.unwrap_or(DEFAULT_QUERY_LIMIT),
        )
        .await?;

    Ok(Json(QueryResponse::new(records)))
}

/// Handler for POST /flush
///
/// Persists dirty records for one table, or for all tables.
pub async fn flush_handler(
    State(state): State<AppState>,
    Query(params): Query<FlushParams>,
) -> StoreResult<Json<FlushResponse>> {
    let flushed = state.engine.flush(params.table.as_deref()).await?;

    Ok(Json(FlushResponse { flushed }))
}

/// Handler for POST /evict
///
/// Runs an idle-eviction pass immediately.
pub async fn evict_handler(State(state): State<AppState>) -> Json<EvictResponse> {
    let evicted = state.engine.evict_idle(current_timestamp_ms()).await;

    Json(EvictResponse { evicted })
}

/// Handler for GET /stats
///
/// Returns a snapshot of the store's counters and totals.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let snapshot = state.engine.stats().await;

    Json(StatsResponse::from(snapshot))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
