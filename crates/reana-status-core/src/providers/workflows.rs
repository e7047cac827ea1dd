use std::sync::Arc;

use async_trait::async_trait;
use chrono::{
    Duration,
    NaiveDateTime,
    Utc,
};
use reana_status_api::{
    RunStatus,
    StatusCategory,
    StatusParams,
    StatusProvider,
    StatusReport,
    StatusResult,
    StatusValue,
};

use crate::StatusContext;

/// Hours a workflow may run without any update before it counts as stuck
const STUCK_RUNNING_HOURS: i64 = 12;

/// Minutes a workflow may sit in pending before it counts as stuck
const STUCK_PENDING_MINUTES: i64 = 20;

pub struct WorkflowsStatus {
    context: Arc<StatusContext>,
}

impl WorkflowsStatus {
    pub fn new(context: Arc<StatusContext>, _params: StatusParams) -> Self {
        Self { context }
    }

    pub async fn get_workflows_by_status(&self, status: RunStatus) -> StatusResult<i64> {
        self.context.store.count_workflows_by_status(status).await
    }

    pub async fn restarted_workflows(&self) -> StatusResult<i64> {
        self.context.store.count_restarted_workflows().await
    }

    /// Running workflows started and last updated more than 12 hours ago
    pub async fn stuck_in_running_workflows(&self) -> StatusResult<i64> {
        self.context
            .store
            .count_stuck_running_workflows(now() - Duration::hours(STUCK_RUNNING_HOURS))
            .await
    }

    /// Pending workflows last updated more than 20 minutes ago
    pub async fn stuck_in_pending_workflows(&self) -> StatusResult<i64> {
        self.context
            .store
            .count_stuck_pending_workflows(now() - Duration::minutes(STUCK_PENDING_MINUTES))
            .await
    }

    /// Workflows launched from a git repository
    pub async fn git_workflows(&self) -> StatusResult<i64> {
        self.context.store.count_git_workflows().await
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[async_trait]
impl StatusProvider for WorkflowsStatus {
    fn category(&self) -> StatusCategory {
        StatusCategory::Workflows
    }

    async fn get_status(&self) -> StatusResult<StatusReport> {
        let mut report = StatusReport::new();
        report.insert(
            "running".to_string(),
            StatusValue::from(self.get_workflows_by_status(RunStatus::Running).await?),
        );
        report.insert(
            "finished".to_string(),
            StatusValue::from(self.get_workflows_by_status(RunStatus::Finished).await?),
        );
        report.insert(
            "stuck in running".to_string(),
            StatusValue::from(self.stuck_in_running_workflows().await?),
        );
        report.insert(
            "stuck in pending".to_string(),
            StatusValue::from(self.stuck_in_pending_workflows().await?),
        );
        report.insert(
            "queued".to_string(),
            StatusValue::from(self.get_workflows_by_status(RunStatus::Queued).await?),
        );
        report.insert("restarts".to_string(), StatusValue::from(self.restarted_workflows().await?));
        report.insert("git_source".to_string(), StatusValue::from(self.git_workflows().await?));
        Ok(report)
    }
}

reana_status_api::status_factory!(WorkflowsStatus, StatusContext);
