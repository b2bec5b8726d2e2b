//! Request and Response models for the record store API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CreateTableRequest, FlushParams, GetParams, QueryParams};
pub use responses::{
    CreateTableResponse, ErrorResponse, EvictResponse, FlushResponse, HealthResponse,
    InsertResponse, QueryResponse, RecordResponse, StatsResponse,
};
