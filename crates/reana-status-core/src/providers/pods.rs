use std::sync::Arc;

use async_trait::async_trait;
use reana_status_api::{
    PodPhase,
    StatusCategory,
    StatusParams,
    StatusProvider,
    StatusReport,
    StatusResult,
    StatusValue,
};

use crate::StatusContext;

pub struct PodsStatus {
    context: Arc<StatusContext>,
}

impl PodsStatus {
    pub fn new(context: Arc<StatusContext>, _params: StatusParams) -> Self {
        Self { context }
    }

    pub async fn get_pods_by_phase(
        &self, namespace: &str, phase: PodPhase,
    ) -> StatusResult<Vec<String>> {
        self.context
            .cluster
            .list_pod_names(namespace, &phase.field_selector())
            .await
    }

    /// Pod names of `phase` in `namespace`, each on its own indented line
    pub async fn get_friendly_pods(&self, namespace: &str, phase: PodPhase) -> StatusResult<String> {
        let pods = self.get_pods_by_phase(namespace, phase).await?;
        Ok(format_pod_list(&pods))
    }
}

fn format_pod_list(pods: &[String]) -> String {
    pods.iter().map(|pod| format!("\n  {}", pod)).collect()
}

#[async_trait]
impl StatusProvider for PodsStatus {
    fn category(&self) -> StatusCategory {
        StatusCategory::Pods
    }

    async fn get_status(&self) -> StatusResult<StatusReport> {
        let mut report = StatusReport::new();
        for namespace in self.context.config.kubernetes.namespaces() {
            for phase in PodPhase::ALL {
                let key = format!("{}_{}_pods", namespace, phase.as_str().to_lowercase());
                let pods = self.get_friendly_pods(&namespace, *phase).await?;
                report.insert(key, StatusValue::from(pods));
            }
        }
        Ok(report)
    }
}

reana_status_api::status_factory!(PodsStatus, StatusContext);
