//! Request DTOs for the record store API
//!
//! Defines the structure of incoming HTTP request bodies and query
//! parameters.

use serde::Deserialize;
use serde_json::Value;

/// Request body for table creation (POST /tables)
///
/// # Fields
/// - `name`: The table to register
/// - `schema`: Optional free-form schema description (not validated
///   against payload shape)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTableRequest {
    /// The table name
    pub name: String,
    /// Free-form schema description
    #[serde(default)]
    pub schema: Option<Value>,
}

impl CreateTableRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.name.is_empty() {
            return Some("Table name cannot be empty".to_string());
        }
        None
    }
}

/// Query parameters for record retrieval (GET /records/:table/:key)
#[derive(Debug, Clone, Deserialize)]
pub struct GetParams {
    /// Whether the cache is consulted and populated (default: true)
    #[serde(default)]
    pub use_cache: Option<bool>,
}

impl GetParams {
    /// Effective cache flag.
    pub fn use_cache(&self) -> bool {
        self.use_cache.unwrap_or(true)
    }
}

/// Query parameters for predicate queries (GET /records/:table)
#[derive(Debug, Clone, Deserialize)]
pub struct QueryParams {
    /// Opaque predicate fragment passed through to the backing store
    #[serde(default, rename = "where")]
    pub predicate: Option<String>,
    /// Maximum number of rows returned (default: 100)
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Query parameters for manual flush (POST /flush)
#[derive(Debug, Clone, Deserialize)]
pub struct FlushParams {
    /// Restrict the flush to one table; all dirty tables if absent
    #[serde(default)]
    pub table: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_table_request_deserialize() {
        let json = r#"{"name": "users"}"#;
        let req: CreateTableRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.name, "users");
        assert!(req.schema.is_none());
    }

    #[test]
    fn test_create_table_request_with_schema() {
        let json = r#"{"name": "users", "schema": {"name": "string"}}"#;
        let req: CreateTableRequest = serde_json::from_str(json).unwrap();
        assert!(req.schema.is_some());
    }

    #[test]
    fn test_validate_empty_table_name() {
        let req = CreateTableRequest {
            name: String::new(),
            schema: None,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_get_params_default_to_cached() {
        let params: GetParams = serde_json::from_str("{}").unwrap();
        assert!(params.use_cache());

        let params: GetParams = serde_json::from_str(r#"{"use_cache": false}"#).unwrap();
        assert!(!params.use_cache());
    }

    #[test]
    fn test_query_params_where_rename() {
        let params: QueryParams =
            serde_json::from_str(r#"{"where": "data->>'status' = 'active'", "limit": 10}"#)
                .unwrap();
        assert_eq!(params.predicate.as_deref(), Some("data->>'status' = 'active'"));
        assert_eq!(params.limit, Some(10));
    }
}
