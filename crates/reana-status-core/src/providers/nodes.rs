use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use reana_status_api::utils::kubernetes_memory_to_bytes;
use reana_status_api::{
    StatusCategory,
    StatusParams,
    StatusProvider,
    StatusReport,
    StatusResult,
    StatusValue,
};

use crate::infrastructure::cluster::UNSCHEDULABLE_NODES_SELECTOR;
use crate::StatusContext;

const NOT_AVAILABLE: &str = "n/a";

/// Memory of one node, quantities as reported by the cluster
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMemory {
    pub capacity: Option<String>,
    pub usage: Option<String>,
    /// `"<n>%"`, set when both quantities are known and parse
    pub percentage: Option<String>,
}

pub struct NodesStatus {
    context: Arc<StatusContext>,
}

impl NodesStatus {
    pub fn new(context: Arc<StatusContext>, _params: StatusParams) -> Self {
        Self { context }
    }

    pub async fn get_nodes(&self) -> StatusResult<Vec<String>> {
        self.context.cluster.list_node_names(None).await
    }

    pub async fn get_unschedulable_nodes(&self) -> StatusResult<Vec<String>> {
        self.context
            .cluster
            .list_node_names(Some(UNSCHEDULABLE_NODES_SELECTOR))
            .await
    }

    /// Memory capacity and live usage per node.
    ///
    /// Returns an empty map when the metrics API cannot be queried.
    pub async fn get_memory_usage(&self) -> StatusResult<IndexMap<String, NodeMemory>> {
        let mut result: IndexMap<String, NodeMemory> = self
            .context
            .cluster
            .list_node_capacities()
            .await?
            .into_iter()
            .map(|node| {
                (
                    node.name,
                    NodeMemory {
                        capacity: node.memory,
                        ..Default::default()
                    },
                )
            })
            .collect();

        let metrics = match self.context.cluster.list_node_memory_usage().await {
            Ok(metrics) => metrics,
            Err(e) => {
                tracing::error!(error = %e, "Error while calling `metrics.k8s.io` API");
                return Ok(IndexMap::new());
            }
        };

        for metric in metrics {
            let Some(node) = result.get_mut(&metric.name) else {
                tracing::debug!(node = %metric.name, "Ignoring metrics for unlisted node");
                continue;
            };
            node.percentage = node
                .capacity
                .as_deref()
                .and_then(|capacity| memory_percentage(&metric.memory, capacity));
            node.usage = Some(metric.memory);
        }

        Ok(result)
    }

    /// One `"\n  <node>: <usage>/<capacity> (<percentage>)"` line per node
    pub async fn get_friendly_memory_usage(&self) -> StatusResult<String> {
        let memory_usage = self.get_memory_usage().await?;

        Ok(memory_usage
            .iter()
            .map(|(name, memory)| {
                format!(
                    "\n  {}: {}/{} ({})",
                    name,
                    memory.usage.as_deref().unwrap_or(NOT_AVAILABLE),
                    memory.capacity.as_deref().unwrap_or(NOT_AVAILABLE),
                    memory.percentage.as_deref().unwrap_or(NOT_AVAILABLE),
                )
            })
            .collect())
    }
}

fn memory_percentage(usage: &str, capacity: &str) -> Option<String> {
    let (usage_bytes, capacity_bytes) = match (
        kubernetes_memory_to_bytes(usage),
        kubernetes_memory_to_bytes(capacity),
    ) {
        (Ok(usage_bytes), Ok(capacity_bytes)) => (usage_bytes, capacity_bytes),
        (Err(e), _) | (_, Err(e)) => {
            tracing::debug!(error = %e, "Skipping memory percentage");
            return None;
        }
    };

    if capacity_bytes == 0 {
        return None;
    }

    Some(format!(
        "{}%",
        (usage_bytes as f64 / capacity_bytes as f64 * 100.0).round_ties_even() as i64
    ))
}

#[async_trait]
impl StatusProvider for NodesStatus {
    fn category(&self) -> StatusCategory {
        StatusCategory::Nodes
    }

    async fn get_status(&self) -> StatusResult<StatusReport> {
        let mut report = StatusReport::new();
        report.insert(
            "unschedulable_nodes".to_string(),
            StatusValue::from(self.get_unschedulable_nodes().await?),
        );
        report.insert(
            "memory_usage".to_string(),
            StatusValue::from(self.get_friendly_memory_usage().await?),
        );
        Ok(report)
    }
}

reana_status_api::status_factory!(NodesStatus, StatusContext);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cluster::{
        NodeCapacity,
        NodeMemoryUsage,
    };
    use crate::test_support::{
        context,
        FakeCluster,
        FakeRunner,
        FakeStore,
    };

    fn capacity(name: &str, memory: &str) -> NodeCapacity {
        NodeCapacity {
            name: name.to_string(),
            memory: Some(memory.to_string()),
        }
    }

    fn usage(name: &str, memory: &str) -> NodeMemoryUsage {
        NodeMemoryUsage {
            name: name.to_string(),
            memory: memory.to_string(),
        }
    }

    fn provider(cluster: FakeCluster) -> NodesStatus {
        NodesStatus::new(
            context(FakeStore::default(), cluster, FakeRunner::default()),
            StatusParams::default(),
        )
    }

    fn cluster() -> FakeCluster {
        FakeCluster {
            nodes: vec!["node-1".to_string(), "node-2".to_string()],
            unschedulable: vec!["node-2".to_string()],
            capacities: vec![capacity("node-1", "16Gi"), capacity("node-2", "8Gi")],
            memory_usage: Some(vec![usage("node-1", "4Gi"), usage("node-2", "6Gi")]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_node_listings() {
        let provider = provider(cluster());

        assert_eq!(provider.get_nodes().await.unwrap(), vec!["node-1", "node-2"]);
        assert_eq!(provider.get_unschedulable_nodes().await.unwrap(), vec!["node-2"]);
    }

    #[tokio::test]
    async fn test_memory_usage() {
        let memory = provider(cluster()).get_memory_usage().await.unwrap();

        assert_eq!(
            memory["node-1"],
            NodeMemory {
                capacity: Some("16Gi".to_string()),
                usage: Some("4Gi".to_string()),
                percentage: Some("25%".to_string()),
            }
        );
        assert_eq!(memory["node-2"].percentage.as_deref(), Some("75%"));
    }

    #[tokio::test]
    async fn test_friendly_memory_usage() {
        let text = provider(cluster()).get_friendly_memory_usage().await.unwrap();

        assert_eq!(text, "\n  node-1: 4Gi/16Gi (25%)\n  node-2: 6Gi/8Gi (75%)");
    }

    #[tokio::test]
    async fn test_missing_metrics_render_not_available() {
        let mut cluster = cluster();
        cluster.memory_usage = Some(vec![usage("node-1", "4Gi"), usage("ghost", "1Gi")]);

        let memory = provider(cluster).get_memory_usage().await.unwrap();
        assert_eq!(memory.len(), 2);
        assert!(!memory.contains_key("ghost"));
        assert_eq!(memory["node-2"].usage, None);

        let mut cluster = self::cluster();
        cluster.memory_usage = Some(vec![usage("node-1", "4Gi")]);
        let text = provider(cluster).get_friendly_memory_usage().await.unwrap();
        assert_eq!(text, "\n  node-1: 4Gi/16Gi (25%)\n  node-2: n/a/8Gi (n/a)");
    }

    #[tokio::test]
    async fn test_metrics_failure_degrades_to_empty() {
        let mut cluster = cluster();
        cluster.memory_usage = None;
        let provider = provider(cluster);

        assert!(provider.get_memory_usage().await.unwrap().is_empty());

        let report = provider.get_status().await.unwrap();
        assert_eq!(report["memory_usage"].as_text(), Some(""));
        assert_eq!(
            report["unschedulable_nodes"].as_list(),
            Some(&["node-2".to_string()][..])
        );
    }

    #[test]
    fn test_memory_percentage_edge_cases() {
        assert_eq!(memory_percentage("512Mi", "1Gi").as_deref(), Some("50%"));
        assert_eq!(memory_percentage("1Gi", "8Gi").as_deref(), Some("12%"));
        assert_eq!(memory_percentage("3Gi", "8Gi").as_deref(), Some("38%"));
        assert_eq!(memory_percentage("1Gi", "0"), None);
        assert_eq!(memory_percentage("lots", "1Gi"), None);
    }
}
