use std::sync::Arc;

use reana_status_api::{
    StatusCategory,
    StatusParams,
    StatusProvider,
    StatusRegistry,
    StatusReport,
    StatusResult,
    StatusValue,
};

use crate::providers::create_status_registry;
use crate::StatusContext;

/// Entry point for building status reports by category
pub struct StatusService {
    context: Arc<StatusContext>,
    registry: StatusRegistry<StatusContext>,
}

impl StatusService {
    pub fn new(context: Arc<StatusContext>) -> Self {
        Self {
            context,
            registry: create_status_registry(),
        }
    }

    pub fn context(&self) -> Arc<StatusContext> {
        Arc::clone(&self.context)
    }

    pub fn categories(&self) -> Vec<StatusCategory> {
        self.registry.categories()
    }

    pub fn provider(
        &self, category: StatusCategory, params: StatusParams,
    ) -> StatusResult<Box<dyn StatusProvider>> {
        self.registry.create(category, self.context(), params)
    }

    /// Report for a category name such as `"quota-usage"`.
    ///
    /// The first failing query aborts the report.
    pub async fn get_status(&self, name: &str, params: StatusParams) -> StatusResult<StatusReport> {
        let provider = self.registry.create_by_name(name, self.context(), params)?;
        tracing::debug!(category = %provider.category(), "Collecting status");
        provider.get_status().await
    }

    pub async fn get_category_status(
        &self, category: StatusCategory, params: StatusParams,
    ) -> StatusResult<StatusReport> {
        let provider = self.provider(category, params)?;
        tracing::debug!(category = %category, "Collecting status");
        provider.get_status().await
    }

    /// Report for every category, keyed by category name.
    ///
    /// A failing category is reported as `{"error": "<message>"}` without
    /// affecting the others.
    pub async fn get_all_statuses(&self, params: StatusParams) -> StatusReport {
        let mut report = StatusReport::new();

        for category in self.categories() {
            let section = match self.get_category_status(category, params.clone()).await {
                Ok(section) => section,
                Err(e) => {
                    tracing::warn!(category = %category, error = %e, "Failed to collect status");
                    let mut section = StatusReport::new();
                    section.insert("error".to_string(), StatusValue::from(e.to_string()));
                    section
                }
            };
            report.insert(category.to_string(), StatusValue::from(section));
        }

        report
    }
}
