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

pub struct SystemStatus {
    context: Arc<StatusContext>,
}

impl SystemStatus {
    pub fn new(context: Arc<StatusContext>, _params: StatusParams) -> Self {
        Self { context }
    }

    /// Host uptime as printed by `uptime -p`
    pub async fn uptime(&self) -> StatusResult<String> {
        self.context.commands.run("uptime", &["-p"]).await
    }
}

#[async_trait]
impl StatusProvider for SystemStatus {
    fn category(&self) -> StatusCategory {
        StatusCategory::System
    }

    async fn get_status(&self) -> StatusResult<StatusReport> {
        let mut report = StatusReport::new();
        report.insert("uptime".to_string(), StatusValue::from(self.uptime().await?));
        Ok(report)
    }
}

reana_status_api::status_factory!(SystemStatus, StatusContext);
