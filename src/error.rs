//! Error types for the record store
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Store Error Enum ==
/// Unified error type for the record store.
///
/// Cache-only state transitions never fail; every variant here originates
/// at the persistence gateway or at the API boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Record not found (API boundary only; the engine reports absence as
    /// `None`)
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Table name is not a plain identifier
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Connection pool could not be built
    #[error("Pool setup error: {0}")]
    PoolSetup(#[from] deadpool_postgres::CreatePoolError),

    /// Connection could not be acquired from the pool
    #[error("Connection pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// Backing store query failed
    #[error("Backing store error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            StoreError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            StoreError::InvalidTableName(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            StoreError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            StoreError::PoolSetup(_) | StoreError::Pool(_) | StoreError::Postgres(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            StoreError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the record store.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
