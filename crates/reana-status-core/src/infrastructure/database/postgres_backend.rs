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
use sqlx::postgres::{
    PgPool,
    PgRow,
};
use sqlx::{
    Postgres,
    QueryBuilder,
    Row,
};

use super::{
    QuotaOrder,
    QuotaRow,
    StatusStore,
};

// Status, type and unit columns are PostgreSQL enums; they are compared as
// text so the bound values stay plain strings.

const TOP_QUOTA_BY_USED: &str = r#"
    SELECT u.email, ur.quota_used, ur.quota_limit, r.unit::text AS unit
    FROM __reana.user_resource ur
    JOIN __reana.resource r ON ur.resource_id = r.id_
    JOIN __reana.user_ u ON ur.user_id = u.id_
    WHERE r.type_::text = $1
    ORDER BY ur.quota_used DESC
    LIMIT $2
"#;

const TOP_QUOTA_BY_PERCENTAGE: &str = r#"
    SELECT u.email, ur.quota_used, ur.quota_limit, r.unit::text AS unit
    FROM __reana.user_resource ur
    JOIN __reana.resource r ON ur.resource_id = r.id_
    JOIN __reana.user_ u ON ur.user_id = u.id_
    WHERE r.type_::text = $1 AND ur.quota_limit != 0
    ORDER BY ur.quota_used * 100.0 / ur.quota_limit DESC
    LIMIT $2
"#;

pub struct PostgresStatusStore {
    pool: PgPool,
}

impl PostgresStatusStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str, what: &str) -> StatusResult<i64> {
        sqlx::query_scalar(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StatusError::DatabaseError(format!("Failed to count {}: {}", what, e)))
    }
}

fn quota_row(row: &PgRow) -> StatusResult<QuotaRow> {
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
impl StatusStore for PostgresStatusStore {
    async fn count_interactive_sessions_excluding(
        &self, statuses: &[RunStatus],
    ) -> StatusResult<i64> {
        if statuses.is_empty() {
            return self
                .count("SELECT COUNT(*) FROM __reana.interactive_session", "interactive sessions")
                .await;
        }

        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM __reana.interactive_session WHERE status::text NOT IN (",
        );
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
        sqlx::query_scalar("SELECT COUNT(*) FROM __reana.workflow WHERE status::text = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                StatusError::DatabaseError(format!("Failed to count {} workflows: {}", status, e))
            })
    }

    async fn count_restarted_workflows(&self) -> StatusResult<i64> {
        self.count(
            "SELECT COUNT(*) FROM __reana.workflow WHERE restart",
            "restarted workflows",
        )
        .await
    }

    async fn count_stuck_running_workflows(&self, threshold: NaiveDateTime) -> StatusResult<i64> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM __reana.workflow
            WHERE status::text = $1 AND run_started_at <= $2 AND updated <= $2
            "#,
        )
        .bind(RunStatus::Running.as_str())
        .bind(threshold)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            StatusError::DatabaseError(format!("Failed to count stuck running workflows: {}", e))
        })
    }

    async fn count_stuck_pending_workflows(&self, threshold: NaiveDateTime) -> StatusResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM __reana.workflow WHERE status::text = $1 AND updated <= $2",
        )
        .bind(RunStatus::Pending.as_str())
        .bind(threshold)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            StatusError::DatabaseError(format!("Failed to count stuck pending workflows: {}", e))
        })
    }

    async fn count_git_workflows(&self) -> StatusResult<i64> {
        self.count(
            "SELECT COUNT(*) FROM __reana.workflow WHERE git_repo != ''",
            "git workflows",
        )
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
        let mut query =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM __reana.job WHERE status::text = ");
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
