//! Storage Module
//!
//! The persistence gateway contract and its backends: PostgreSQL for
//! durable deployments, an in-memory map for tests and embedded use.

mod gateway;
mod memory;
mod postgres;

pub use gateway::PersistenceGateway;
pub use memory::InMemoryGateway;
pub use postgres::PostgresGateway;
