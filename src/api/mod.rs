//! API Module
//!
//! HTTP handlers and routing for the record store REST API.
//!
//! # Endpoints
//! - `POST /tables` - Register a table
//! - `PUT /records/:table/:key` - Store a record (write-back)
//! - `GET /records/:table/:key` - Retrieve a record (read-through)
//! - `GET /records/:table` - Predicate query against the backing store
//! - `POST /flush` - Persist dirty records now
//! - `POST /evict` - Run an idle-eviction pass now
//! - `GET /stats` - Get store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
