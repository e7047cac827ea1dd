//! Read-only view of the Kubernetes cluster REANA runs on.

mod kube_client;
mod kubeconfig;
mod types;

use async_trait::async_trait;
pub use kube_client::KubeCluster;
use reana_status_api::StatusResult;
pub use types::{
    MetricsMeta,
    NodeMetrics,
    NodeMetricsList,
    NodeUsage,
};

/// Field selector for nodes that are cordoned
pub const UNSCHEDULABLE_NODES_SELECTOR: &str = "spec.unschedulable=true";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCapacity {
    pub name: String,
    /// Memory quantity as reported in the node status, e.g. `"16331488Ki"`
    pub memory: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMemoryUsage {
    pub name: String,
    pub memory: String,
}

#[async_trait]
pub trait ClusterApi: Send + Sync {
    async fn list_node_names(&self, field_selector: Option<&str>) -> StatusResult<Vec<String>>;

    async fn list_node_capacities(&self) -> StatusResult<Vec<NodeCapacity>>;

    /// Live memory usage from the `metrics.k8s.io` API
    async fn list_node_memory_usage(&self) -> StatusResult<Vec<NodeMemoryUsage>>;

    async fn list_pod_names(&self, namespace: &str, field_selector: &str)
        -> StatusResult<Vec<String>>;
}
