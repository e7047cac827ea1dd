use async_trait::async_trait;
use chrono::NaiveDateTime;
use reana_status_api::{
    ComputeBackend,
    JobStatus,
    ResourceType,
    RunStatus,
    StatusError,
    StatusResult,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{
    QueryBuilder,
    Row,
    Sqlite,
    SqlitePool,
};

use super::{
    QuotaOrder,
    QuotaRow,
    StatusStore,
};

const TOP_QUOTA_BY_USED: &str = r#"
    SELECT u.email, ur.quota_used, ur.quota_limit, r.unit
    FROM user_resource ur
    JOIN resource r ON ur.resource_id = r.id_
    JOIN user_ u ON ur.user_id = u.id_
    WHERE r.type_ = ?
    ORDER BY ur.quota_used DESC
    LIMIT ?
"#;

const TOP_QUOTA_BY_PERCENTAGE: &str = r#"
    SELECT u.email, ur.quota_used, ur.quota_limit, r.unit
    FROM user_resource ur
    JOIN resource r ON ur.resource_id = r.id_
    JOIN user_ u ON ur.user_id = u.id_
    WHERE r.type_ = ? AND ur.quota_limit != 0
    ORDER BY ur.quota_used * 100.0 / ur.quota_limit DESC
    LIMIT ?
"#;

pub struct SqliteStatusStore {
    pool: SqlitePool,
}

impl SqliteStatusStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str, what: &str) -> StatusResult<i64> {
        sqlx::query_scalar(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StatusError::DatabaseError(format!("Failed to count {}: {}", what, e)))
    }
}

fn quota_row(row: &SqliteRow) -> StatusResult<QuotaRow> {
    let unit: String = row
        .try_get("unit")
        .map_err(|e| StatusError::DatabaseError(format!("Failed to read quota unit: {}", e)))?;

    Ok(QuotaRow {
        email: row
            .try_get("email")
            .map_err(|e| StatusError::DatabaseError(format!("Failed to read email: {}", e)))?,
        quota_used: row
            .try_get("quota_used")
            .map_err(|e| StatusError::DatabaseError(format!("Failed to read quota_used: {}", e)))?,
        quota_limit: row
            .try_get("quota_limit")
            .map_err(|e| StatusError::DatabaseError(format!("Failed to read quota_limit: {}", e)))?,
        unit: unit.parse()?,
    })
}

#[async_trait]
impl StatusStore for SqliteStatusStore {
    async fn count_interactive_sessions_excluding(
        &self, statuses: &[RunStatus],
    ) -> StatusResult<i64> {
        if statuses.is_empty() {
            return self
                .count("SELECT COUNT(*) FROM interactive_session", "interactive sessions")
                .await;
        }

        let mut query =
            QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM interactive_session WHERE status NOT IN (");
        let mut separated = query.separated(", ");
        for status in statuses {
            separated.push_bind(status.as_str());
        }
        separated.push_unseparated(")");

        query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                StatusError::DatabaseError(format!("Failed to count interactive sessions: {}", e))
            })
    }

    async fn count_session_activity(&self) -> StatusResult<i64> {
        self.count(
            "SELECT COUNT(*) FROM accounts_user_session_activity",
            "session activity",
        )
        .await
    }

    async fn count_workflows_by_status(&self, status: RunStatus) -> StatusResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM workflow WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                StatusError::DatabaseError(format!("Failed to count {} workflows: {}", status, e))
            })
    }

    async fn count_restarted_workflows(&self) -> StatusResult<i64> {
        self.count("SELECT COUNT(*) FROM workflow WHERE restart", "restarted workflows")
            .await
    }

    async fn count_stuck_running_workflows(&self, threshold: NaiveDateTime) -> StatusResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM workflow WHERE status = ? AND run_started_at <= ? AND updated <= ?",
        )
        .bind(RunStatus::Running.as_str())
        .bind(threshold)
        .bind(threshold)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            StatusError::DatabaseError(format!("Failed to count stuck running workflows: {}", e))
        })
    }

    async fn count_stuck_pending_workflows(&self, threshold: NaiveDateTime) -> StatusResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM workflow WHERE status = ? AND updated <= ?")
            .bind(RunStatus::Pending.as_str())
            .bind(threshold)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                StatusError::DatabaseError(format!(
                    "Failed to count stuck pending workflows: {}",
                    e
                ))
            })
    }

    async fn count_git_workflows(&self) -> StatusResult<i64> {
        self.count("SELECT COUNT(*) FROM workflow WHERE git_repo != ''", "git workflows")
            .await
    }

    async fn top_quota_usage(
        &self, resource_type: ResourceType, order: QuotaOrder, limit: i64,
    ) -> StatusResult<Vec<QuotaRow>> {
        let sql = match order {
            QuotaOrder::Used => TOP_QUOTA_BY_USED,
            QuotaOrder::Percentage => TOP_QUOTA_BY_PERCENTAGE,
        };

        let rows = sqlx::query(sql)
            .bind(resource_type.as_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                StatusError::DatabaseError(format!(
                    "Failed to query {} quota usage: {}",
                    resource_type, e
                ))
            })?;

        rows.iter().map(quota_row).collect()
    }

    async fn count_jobs(
        &self, status: JobStatus, compute_backend: Option<ComputeBackend>,
    ) -> StatusResult<i64> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM job WHERE status = ");
        query.push_bind(status.as_str());
        if let Some(backend) = compute_backend {
            query.push(" AND compute_backend = ");
            query.push_bind(backend.as_str());
        }

        query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StatusError::DatabaseError(format!("Failed to count {} jobs: {}", status, e)))
    }
}
