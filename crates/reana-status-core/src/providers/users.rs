use std::sync::Arc;

use async_trait::async_trait;
use reana_status_api::{
    StatusCategory,
    StatusParams,
    StatusProvider,
    StatusReport,
    StatusResult,
    StatusValue,
};

use crate::StatusContext;

pub struct UsersStatus {
    context: Arc<StatusContext>,
}

impl UsersStatus {
    pub fn new(context: Arc<StatusContext>, _params: StatusParams) -> Self {
        Self { context }
    }

    /// Number of recorded web sessions. Sessions are only pruned when they
    /// expire, so this is an upper bound on the users currently logged in.
    pub async fn active_web_users(&self) -> StatusResult<i64> {
        self.context.store.count_session_activity().await
    }
}

#[async_trait]
impl StatusProvider for UsersStatus {
    fn category(&self) -> StatusCategory {
        StatusCategory::Users
    }

    async fn get_status(&self) -> StatusResult<StatusReport> {
        let mut report = StatusReport::new();
        report.insert(
            "active_web_users".to_string(),
            StatusValue::from(self.active_web_users().await?),
        );
        Ok(report)
    }
}

reana_status_api::status_factory!(UsersStatus, StatusContext);
