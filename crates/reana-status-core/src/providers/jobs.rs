use std::sync::Arc;

use async_trait::async_trait;
use reana_status_api::{
    ComputeBackend,
    JobStatus,
    PodPhase,
    StatusCategory,
    StatusParams,
    StatusProvider,
    StatusReport,
    StatusResult,
    StatusValue,
};

use crate::StatusContext;

const REPORTED_STATUSES: [JobStatus; 4] = [
    JobStatus::Running,
    JobStatus::Finished,
    JobStatus::Failed,
    JobStatus::Queued,
];

pub struct JobsStatus {
    context: Arc<StatusContext>,
}

impl JobsStatus {
    pub fn new(context: Arc<StatusContext>, _params: StatusParams) -> Self {
        Self { context }
    }

    pub async fn get_jobs_by_status_and_compute_backend(
        &self, status: JobStatus, compute_backend: Option<ComputeBackend>,
    ) -> StatusResult<i64> {
        self.context.store.count_jobs(status, compute_backend).await
    }

    /// Job pods in the runtime namespace currently in `phase`
    pub async fn get_k8s_jobs_by_status(&self, phase: PodPhase) -> StatusResult<Vec<String>> {
        let prefix = self.context.config.platform.job_pod_prefix();
        let pods = self
            .context
            .cluster
            .list_pod_names(
                &self.context.config.kubernetes.runtime_namespace,
                &phase.field_selector(),
            )
            .await?;

        Ok(pods
            .into_iter()
            .filter(|name| name.starts_with(&prefix))
            .collect())
    }
}

#[async_trait]
impl StatusProvider for JobsStatus {
    fn category(&self) -> StatusCategory {
        StatusCategory::Jobs
    }

    async fn get_status(&self) -> StatusResult<StatusReport> {
        let mut report = StatusReport::new();

        for backend in ComputeBackend::ALL {
            let mut counts = StatusReport::new();
            for status in REPORTED_STATUSES {
                let count = self
                    .get_jobs_by_status_and_compute_backend(status, Some(*backend))
                    .await?;
                counts.insert(status.to_string(), StatusValue::from(count));
            }
            report.insert(backend.as_str().to_lowercase(), StatusValue::from(counts));
        }

        let mut kubernetes_api = StatusReport::new();
        kubernetes_api.insert(
            "running".to_string(),
            StatusValue::from(self.get_k8s_jobs_by_status(PodPhase::Running).await?.len()),
        );
        kubernetes_api.insert(
            "pending".to_string(),
            StatusValue::from(self.get_k8s_jobs_by_status(PodPhase::Pending).await?.len()),
        );
        report.insert("kubernetes_api".to_string(), StatusValue::from(kubernetes_api));

        Ok(report)
    }
}

reana_status_api::status_factory!(JobsStatus, StatusContext);

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::test_support::{
        context,
        FakeCluster,
        FakeRunner,
        FakeStore,
        RUNTIME_NAMESPACE,
    };

    fn provider(store: FakeStore, cluster: FakeCluster) -> JobsStatus {
        JobsStatus::new(context(store, cluster, FakeRunner::default()), StatusParams::default())
    }

    #[tokio::test]
    async fn test_k8s_jobs_are_filtered_by_prefix() {
        let cluster = FakeCluster::default()
            .with_pods(
                RUNTIME_NAMESPACE,
                "Running",
                &["reana-run-job-1a2b", "reana-run-batch-3c4d", "reana-run-job-5e6f"],
            )
            .with_pods("reana", "Running", &["reana-run-job-elsewhere"]);

        let jobs = provider(FakeStore::default(), cluster)
            .get_k8s_jobs_by_status(PodPhase::Running)
            .await
            .unwrap();

        assert_eq!(jobs, vec!["reana-run-job-1a2b", "reana-run-job-5e6f"]);
    }

    #[tokio::test]
    async fn test_report_shape() {
        let store = FakeStore {
            jobs: HashMap::from([
                ((JobStatus::Running, Some(ComputeBackend::Kubernetes)), 7),
                ((JobStatus::Failed, Some(ComputeBackend::HtCondor)), 2),
                ((JobStatus::Queued, Some(ComputeBackend::Slurm)), 1),
                ((JobStatus::Running, None), 99),
            ]),
            ..Default::default()
        };
        let cluster = FakeCluster::default()
            .with_pods(RUNTIME_NAMESPACE, "Running", &["reana-run-job-1", "reana-run-job-2"])
            .with_pods(RUNTIME_NAMESPACE, "Pending", &["reana-run-job-3"]);

        let report = provider(store, cluster).get_status().await.unwrap();

        let keys: Vec<&str> = report.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["kubernetes", "htcondor", "slurm", "kubernetes_api"]);

        let kubernetes = report["kubernetes"].as_section().unwrap();
        let statuses: Vec<&str> = kubernetes.keys().map(String::as_str).collect();
        assert_eq!(statuses, vec!["running", "finished", "failed", "queued"]);
        assert_eq!(kubernetes["running"].as_count(), Some(7));
        assert_eq!(kubernetes["finished"].as_count(), Some(0));
        assert_eq!(report["htcondor"].as_section().unwrap()["failed"].as_count(), Some(2));
        assert_eq!(report["slurm"].as_section().unwrap()["queued"].as_count(), Some(1));

        let kubernetes_api = report["kubernetes_api"].as_section().unwrap();
        assert_eq!(kubernetes_api.len(), 2);
        assert_eq!(kubernetes_api["running"].as_count(), Some(2));
        assert_eq!(kubernetes_api["pending"].as_count(), Some(1));
    }
}
