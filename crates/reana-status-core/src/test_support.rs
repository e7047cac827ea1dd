//! In-memory fakes of the datastore, cluster and command seams.

use std::collections::HashMap;
use std::sync::{
    Arc,
    Mutex,
};

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

use crate::infrastructure::cluster::{
    NodeCapacity,
    NodeMemoryUsage,
    UNSCHEDULABLE_NODES_SELECTOR,
};
use crate::infrastructure::{
    ClusterApi,
    CommandRunner,
    QuotaOrder,
    QuotaRow,
    StatusConfig,
    StatusStore,
};
use crate::StatusContext;

pub const INFRASTRUCTURE_NAMESPACE: &str = "reana";
pub const RUNTIME_NAMESPACE: &str = "reana-runtime";

#[derive(Default)]
pub struct FakeStore {
    pub active_interactive_sessions: i64,
    pub excluded_session_statuses: Mutex<Vec<RunStatus>>,
    pub session_activity: i64,
    pub workflows: HashMap<RunStatus, i64>,
    pub restarted: i64,
    pub stuck_running: i64,
    pub stuck_pending: i64,
    pub git: i64,
    pub quota: HashMap<(ResourceType, QuotaOrder), Vec<QuotaRow>>,
    /// Row limits requested from `top_quota_usage`, in call order
    pub quota_limits: Mutex<Vec<i64>>,
    pub jobs: HashMap<(JobStatus, Option<ComputeBackend>), i64>,
    pub thresholds: Mutex<Vec<NaiveDateTime>>,
    pub unavailable: bool,
}

impl FakeStore {
    fn check(&self) -> StatusResult<()> {
        if self.unavailable {
            return Err(StatusError::DatabaseError("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl StatusStore for FakeStore {
    async fn count_interactive_sessions_excluding(
        &self, statuses: &[RunStatus],
    ) -> StatusResult<i64> {
        self.check()?;
        self.excluded_session_statuses
            .lock()
            .unwrap()
            .extend_from_slice(statuses);
        Ok(self.active_interactive_sessions)
    }

    async fn count_session_activity(&self) -> StatusResult<i64> {
        self.check()?;
        Ok(self.session_activity)
    }

    async fn count_workflows_by_status(&self, status: RunStatus) -> StatusResult<i64> {
        self.check()?;
        Ok(self.workflows.get(&status).copied().unwrap_or(0))
    }

    async fn count_restarted_workflows(&self) -> StatusResult<i64> {
        self.check()?;
        Ok(self.restarted)
    }

    async fn count_stuck_running_workflows(&self, threshold: NaiveDateTime) -> StatusResult<i64> {
        self.check()?;
        self.thresholds.lock().unwrap().push(threshold);
        Ok(self.stuck_running)
    }

    async fn count_stuck_pending_workflows(&self, threshold: NaiveDateTime) -> StatusResult<i64> {
        self.check()?;
        self.thresholds.lock().unwrap().push(threshold);
        Ok(self.stuck_pending)
    }

    async fn count_git_workflows(&self) -> StatusResult<i64> {
        self.check()?;
        Ok(self.git)
    }

    async fn top_quota_usage(
        &self, resource_type: ResourceType, order: QuotaOrder, limit: i64,
    ) -> StatusResult<Vec<QuotaRow>> {
        self.check()?;
        self.quota_limits.lock().unwrap().push(limit);
        Ok(self
            .quota
            .get(&(resource_type, order))
            .map(|rows| rows.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn count_jobs(
        &self, status: JobStatus, compute_backend: Option<ComputeBackend>,
    ) -> StatusResult<i64> {
        self.check()?;
        Ok(self.jobs.get(&(status, compute_backend)).copied().unwrap_or(0))
    }
}

#[derive(Default)]
pub struct FakeCluster {
    pub nodes: Vec<String>,
    pub unschedulable: Vec<String>,
    pub capacities: Vec<NodeCapacity>,
    /// `None` behaves like a cluster without the metrics add-on
    pub memory_usage: Option<Vec<NodeMemoryUsage>>,
    /// Pod names keyed by `(namespace, field selector)`
    pub pods: HashMap<(String, String), Vec<String>>,
}

impl FakeCluster {
    pub fn with_pods(mut self, namespace: &str, phase: &str, names: &[&str]) -> Self {
        self.pods.insert(
            (namespace.to_string(), format!("status.phase={}", phase)),
            names.iter().map(|name| name.to_string()).collect(),
        );
        self
    }
}

#[async_trait]
impl ClusterApi for FakeCluster {
    async fn list_node_names(&self, field_selector: Option<&str>) -> StatusResult<Vec<String>> {
        match field_selector {
            None => Ok(self.nodes.clone()),
            Some(UNSCHEDULABLE_NODES_SELECTOR) => Ok(self.unschedulable.clone()),
            Some(other) => Err(StatusError::KubernetesError(format!(
                "unsupported field selector {}",
                other
            ))),
        }
    }

    async fn list_node_capacities(&self) -> StatusResult<Vec<NodeCapacity>> {
        Ok(self.capacities.clone())
    }

    async fn list_node_memory_usage(&self) -> StatusResult<Vec<NodeMemoryUsage>> {
        self.memory_usage.clone().ok_or_else(|| {
            StatusError::KubernetesError(
                "the server could not find the requested resource (metrics.k8s.io)".to_string(),
            )
        })
    }

    async fn list_pod_names(
        &self, namespace: &str, field_selector: &str,
    ) -> StatusResult<Vec<String>> {
        Ok(self
            .pods
            .get(&(namespace.to_string(), field_selector.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

/// Canned command outputs keyed by program name
#[derive(Default)]
pub struct FakeRunner {
    pub outputs: HashMap<String, String>,
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl FakeRunner {
    pub fn with_output(mut self, program: &str, output: &str) -> Self {
        self.outputs.insert(program.to_string(), output.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[&str]) -> StatusResult<String> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(|arg| arg.to_string()));
        self.calls.lock().unwrap().push(call);

        self.outputs
            .get(program)
            .cloned()
            .ok_or_else(|| StatusError::CommandNotFound(program.to_string()))
    }
}

pub fn test_config() -> StatusConfig {
    let mut config = StatusConfig::default();
    config.kubernetes.infrastructure_namespace = INFRASTRUCTURE_NAMESPACE.to_string();
    config.kubernetes.runtime_namespace = RUNTIME_NAMESPACE.to_string();
    config.platform.shared_volume_path = "/var/reana".to_string();
    config
}

pub fn context(store: FakeStore, cluster: FakeCluster, runner: FakeRunner) -> Arc<StatusContext> {
    context_with(test_config(), Arc::new(store), Arc::new(cluster), Arc::new(runner))
}

pub fn context_with(
    config: StatusConfig, store: Arc<dyn StatusStore>, cluster: Arc<dyn ClusterApi>,
    runner: Arc<dyn CommandRunner>,
) -> Arc<StatusContext> {
    Arc::new(StatusContext::new(config, store, cluster, runner))
}
