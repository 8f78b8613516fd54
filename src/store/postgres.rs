use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, Instrument};

use super::{StoreError, StoreResult, WaitlistEntry, WaitlistStore};
use crate::config::{DbConfig, TableName};

/// Writes waitlist entries to a Postgres table keyed by `email`.
///
/// The pool is cheap to share, every `put_entry` call checks out its own connection.
#[derive(Clone, Debug)]
pub struct PgWaitlistStore {
    db: PgPool,
    table: TableName,
    put_sql: String,
}

impl PgWaitlistStore {
    pub async fn init(db_config: &DbConfig, table: TableName) -> StoreResult<Self> {
        info!("{:<20} - Initializing the DB pool", "init_db");
        let max_cons = if cfg!(test) { 1 } else { 5 };

        let db = PgPoolOptions::new()
            .max_connections(max_cons)
            .acquire_timeout(Duration::from_millis(500))
            .connect_with(db_config.connection_options())
            .await
            .map_err(|er| StoreError::FailToCreatePool(er.to_string()))?;

        Ok(Self::with_pool(db, table))
    }

    pub fn with_pool(db: PgPool, table: TableName) -> Self {
        let put_sql = put_entry_sql(&table);
        PgWaitlistStore { db, table, put_sql }
    }

    /// Creates the waitlist table if it doesn't exist yet.
    pub async fn ensure_table(&self) -> StoreResult<()> {
        info!("{:<20} - Ensuring table '{}' exists", "ensure_table", self.table);
        sqlx::query(&create_table_sql(&self.table))
            .execute(&self.db)
            .await?;

        Ok(())
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }
}

#[async_trait]
impl WaitlistStore for PgWaitlistStore {
    async fn put_entry(&self, entry: &WaitlistEntry) -> StoreResult<()> {
        let q_span = tracing::info_span!("Writing waitlist entry", table = %self.table);

        sqlx::query(&self.put_sql)
            .bind(entry.email())
            .bind(entry.timestamp())
            .bind(entry.source())
            .execute(&self.db)
            .instrument(q_span)
            .await?;

        Ok(())
    }
}

// ###################################
// ->   HELPERS
// ###################################
// `TableName` only admits `[A-Za-z0-9_-]`, so quoting it is enough to make it a safe identifier.
fn create_table_sql(table: &TableName) -> String {
    format!(
        r#"CREATE TABLE IF NOT EXISTS "{table}" (
    email TEXT PRIMARY KEY,
    "timestamp" TEXT NOT NULL,
    source TEXT NOT NULL
)"#
    )
}

fn put_entry_sql(table: &TableName) -> String {
    format!(
        r#"INSERT INTO "{table}" (email, "timestamp", source)
VALUES ($1, $2, $3)
ON CONFLICT (email) DO UPDATE SET "timestamp" = EXCLUDED."timestamp", source = EXCLUDED.source"#
    )
}
