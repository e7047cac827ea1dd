use std::sync::Arc;

use async_trait::async_trait;
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

/// Statuses an interactive session can no longer leave
const INACTIVE_STATUSES: [RunStatus; 3] = [RunStatus::Stopped, RunStatus::Deleted, RunStatus::Failed];

pub struct InteractiveSessionsStatus {
    context: Arc<StatusContext>,
}

impl InteractiveSessionsStatus {
    pub fn new(context: Arc<StatusContext>, _params: StatusParams) -> Self {
        Self { context }
    }

    /// Number of interactive sessions not yet stopped, deleted or failed
    pub async fn get_active(&self) -> StatusResult<i64> {
        self.context
            .store
            .count_interactive_sessions_excluding(&INACTIVE_STATUSES)
            .await
    }
}

#[async_trait]
impl StatusProvider for InteractiveSessionsStatus {
    fn category(&self) -> StatusCategory {
        StatusCategory::InteractiveSessions
    }

    async fn get_status(&self) -> StatusResult<StatusReport> {
        let mut report = StatusReport::new();
        report.insert("active".to_string(), StatusValue::from(self.get_active().await?));
        Ok(report)
    }
}

reana_status_api::status_factory!(InteractiveSessionsStatus, StatusContext);
