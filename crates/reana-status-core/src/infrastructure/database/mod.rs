//! Read-only access to the REANA database.
//!
//! Two backends implement [`StatusStore`]: PostgreSQL for deployments, where
//! the tables live in the `__reana` schema and statuses are native enums, and
//! SQLite with the same tables stored as plain text columns.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reana_status_api::{
    ComputeBackend,
    JobStatus,
    ResourceType,
    ResourceUnit,
    RunStatus,
    StatusResult,
};

mod schema;
mod sqlite_backend;

#[cfg(feature = "postgres")]
mod postgres_backend;

#[cfg(feature = "postgres")]
pub use postgres_backend::PostgresStatusStore;
#[cfg(feature = "postgres")]
pub use schema::init_postgres_pool;
pub use schema::init_sqlite_pool;
#[cfg(test)]
pub(crate) use schema::create_sqlite_test_schema;
pub use sqlite_backend::SqliteStatusStore;

use crate::infrastructure::config::{
    DatabaseBackend,
    DatabaseConfig,
};

/// Ordering for top-N quota queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuotaOrder {
    /// Highest `quota_used` first, any limit
    Used,
    /// Highest `quota_used / quota_limit` first, rows without a limit skipped
    Percentage,
}

/// One user/resource quota row joined with its user and resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaRow {
    pub email: String,
    pub quota_used: i64,
    pub quota_limit: i64,
    pub unit: ResourceUnit,
}

#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn count_interactive_sessions_excluding(
        &self, statuses: &[RunStatus],
    ) -> StatusResult<i64>;

    async fn count_session_activity(&self) -> StatusResult<i64>;

    async fn count_workflows_by_status(&self, status: RunStatus) -> StatusResult<i64>;

    async fn count_restarted_workflows(&self) -> StatusResult<i64>;

    /// Running workflows both started and last updated at or before `threshold`
    async fn count_stuck_running_workflows(&self, threshold: NaiveDateTime) -> StatusResult<i64>;

    /// Pending workflows last updated at or before `threshold`
    async fn count_stuck_pending_workflows(&self, threshold: NaiveDateTime) -> StatusResult<i64>;

    async fn count_git_workflows(&self) -> StatusResult<i64>;

    async fn top_quota_usage(
        &self, resource_type: ResourceType, order: QuotaOrder, limit: i64,
    ) -> StatusResult<Vec<QuotaRow>>;

    async fn count_jobs(
        &self, status: JobStatus, compute_backend: Option<ComputeBackend>,
    ) -> StatusResult<i64>;
}

/// Open the backend selected in `config`
pub async fn connect(config: &DatabaseConfig) -> StatusResult<Arc<dyn StatusStore>> {
    tracing::debug!(backend = %config.backend, "Connecting to status database");

    match config.backend {
        #[cfg(feature = "postgres")]
        DatabaseBackend::Postgres => {
            let pool = init_postgres_pool(&config.url, config.max_connections).await?;
            Ok(Arc::new(PostgresStatusStore::new(pool)))
        }
        #[cfg(not(feature = "postgres"))]
        DatabaseBackend::Postgres => Err(reana_status_api::StatusError::InvalidConfig(
            "PostgreSQL support is not compiled in".to_string(),
        )),
        DatabaseBackend::Sqlite => {
            let pool = init_sqlite_pool(&config.url, config.max_connections).await?;
            Ok(Arc::new(SqliteStatusStore::new(pool)))
        }
    }
}
