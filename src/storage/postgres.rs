//! PostgreSQL Gateway Module
//!
//! Persistence gateway backed by PostgreSQL through a deadpool connection
//! pool. Each store table maps to a `memdb_<name>` table holding the record
//! key and a JSONB payload, GIN-indexed for predicate queries.

use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use serde_json::Value;
use tokio_postgres::NoTls;
use tracing::info;

use crate::cache::Record;
use crate::config::DbConfig;
use crate::error::{StoreError, StoreResult};
use crate::storage::PersistenceGateway;

// == Postgres Gateway ==
/// PostgreSQL-backed implementation of [`PersistenceGateway`].
#[derive(Clone)]
pub struct PostgresGateway {
    pool: Pool,
}

impl PostgresGateway {
    // == Constructor ==
    /// Creates a gateway with a connection pool built from `config`.
    ///
    /// The pool is lazy; no connection is established until first use.
    pub fn connect(config: &DbConfig) -> StoreResult<Self> {
        let mut cfg = Config::new();
        cfg.host = Some(config.host.clone());
        cfg.port = Some(config.port);
        cfg.dbname = Some(config.dbname.clone());
        cfg.user = Some(config.user.clone());
        cfg.password = Some(config.password.clone());
        cfg.pool = Some(PoolConfig::new(config.max_size));
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls)?;

        Ok(Self { pool })
    }

    /// Current pool size, for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }
}

// == Backing Table Names ==
/// Maps a store table name to its backing table, rejecting names that are
/// not plain identifiers. Table names are interpolated into SQL, so only
/// `[A-Za-z0-9_]` is allowed; the predicate fragment in queries stays the
/// caller's responsibility.
fn backing_table(table: &str) -> StoreResult<String> {
    if table.is_empty()
        || !table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(StoreError::InvalidTableName(table.to_string()));
    }
    Ok(format!("memdb_{}", table))
}

/// Decodes a JSONB column into a record payload.
fn decode_payload(value: Value) -> StoreResult<Record> {
    serde_json::from_value(value)
        .map_err(|e| StoreError::Internal(format!("non-object payload in backing store: {}", e)))
}

#[async_trait]
impl PersistenceGateway for PostgresGateway {
    async fn create_table(&self, table: &str, _schema: &Value) -> StoreResult<()> {
        let db_table = backing_table(table)?;
        let conn = self.pool.get().await?;

        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                key TEXT PRIMARY KEY,
                data JSONB NOT NULL,
                created_at TIMESTAMPTZ DEFAULT NOW(),
                updated_at TIMESTAMPTZ DEFAULT NOW()
            )",
            db_table
        );
        conn.execute(ddl.as_str(), &[]).await?;

        let index = format!(
            "CREATE INDEX IF NOT EXISTS idx_{}_data ON {} USING GIN (data)",
            db_table, db_table
        );
        conn.execute(index.as_str(), &[]).await?;

        info!("Created backing table: {}", db_table);
        Ok(())
    }

    async fn read(&self, table: &str, key: &str) -> StoreResult<Option<Record>> {
        let db_table = backing_table(table)?;
        let conn = self.pool.get().await?;

        let sql = format!("SELECT data FROM {} WHERE key = $1", db_table);
        let row = conn.query_opt(sql.as_str(), &[&key]).await?;

        match row {
            Some(row) => Ok(Some(decode_payload(row.get(0))?)),
            None => Ok(None),
        }
    }

    async fn batch_upsert(&self, table: &str, records: &[(String, Record)]) -> StoreResult<()> {
        let db_table = backing_table(table)?;
        let mut conn = self.pool.get().await?;

        // One transaction per batch: either every record lands or none do.
        let tx = conn.transaction().await?;
        let stmt = tx
            .prepare(&format!(
                "INSERT INTO {} (key, data, updated_at) VALUES ($1, $2, NOW())
                 ON CONFLICT (key) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()",
                db_table
            ))
            .await?;

        for (key, payload) in records {
            let data = Value::Object(payload.clone());
            tx.execute(&stmt, &[key, &data]).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn query(
        &self,
        table: &str,
        predicate: &str,
        limit: i64,
    ) -> StoreResult<Vec<(String, Record)>> {
        let db_table = backing_table(table)?;
        let conn = self.pool.get().await?;

        let mut sql = format!("SELECT key, data FROM {}", db_table);
        if !predicate.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(predicate);
        }
        sql.push_str(&format!(" LIMIT {}", limit.max(0)));

        let rows = conn.query(sql.as_str(), &[]).await?;
        rows.into_iter()
            .map(|row| Ok((row.get(0), decode_payload(row.get(1))?)))
            .collect()
    }
}
