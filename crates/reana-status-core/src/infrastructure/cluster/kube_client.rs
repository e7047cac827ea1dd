use async_trait::async_trait;
use k8s_openapi::api::core::v1::{
    Node,
    Pod,
};
use kube::api::{
    Api,
    ListParams,
};
use kube::Client;
use reana_status_api::{
    StatusError,
    StatusResult,
};

use super::kubeconfig::{
    merge_kubeconfigs,
    split_kubeconfig_paths,
};
use super::{
    ClusterApi,
    NodeCapacity,
    NodeMemoryUsage,
    NodeMetricsList,
};
use crate::infrastructure::config::KubernetesConfig;

const NODE_METRICS_PATH: &str = "/apis/metrics.k8s.io/v1beta1/nodes";

pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from an explicit kubeconfig, or fall back to in-cluster
    /// / `KUBECONFIG` discovery when none is configured
    pub async fn from_config(config: &KubernetesConfig) -> StatusResult<Self> {
        if config.kubeconfig_path.trim().is_empty() {
            let client = Client::try_default().await.map_err(|e| {
                StatusError::InvalidConfig(format!("Failed to create Kubernetes client: {}", e))
            })?;
            return Ok(Self::new(client));
        }

        let paths = split_kubeconfig_paths(&config.kubeconfig_path);
        let kubeconfig = merge_kubeconfigs(&paths)?;

        let options = kube::config::KubeConfigOptions {
            context: Some(config.context.clone()).filter(|ctx| !ctx.trim().is_empty()),
            ..Default::default()
        };

        let kube_config = kube::Config::from_custom_kubeconfig(kubeconfig, &options)
            .await
            .map_err(|e| StatusError::InvalidConfig(format!("Failed to load kubeconfig: {}", e)))?;

        let client = Client::try_from(kube_config).map_err(|e| {
            StatusError::InvalidConfig(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self::new(client))
    }

    async fn list_nodes(&self, field_selector: Option<&str>) -> StatusResult<Vec<Node>> {
        let nodes: Api<Node> = Api::all(self.client.clone());
        let mut params = ListParams::default();
        if let Some(selector) = field_selector {
            params = params.fields(selector);
        }

        let list = nodes
            .list(&params)
            .await
            .map_err(|e| StatusError::KubernetesError(format!("Failed to list nodes: {}", e)))?;
        Ok(list.items)
    }

    async fn request_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> StatusResult<T> {
        let request = http::Request::builder()
            .uri(url)
            .method(http::Method::GET)
            .body(Vec::new())
            .map_err(|e| StatusError::KubernetesError(format!("Failed to build request: {}", e)))?;

        let response_body = self.client.request_text(request).await.map_err(|e| {
            StatusError::KubernetesError(format!("Request to {} failed: {}", url, e))
        })?;

        serde_json::from_str(&response_body).map_err(|e| {
            StatusError::SerializationError(format!("Failed to parse response from {}: {}", url, e))
        })
    }
}

#[async_trait]
impl ClusterApi for KubeCluster {
    async fn list_node_names(&self, field_selector: Option<&str>) -> StatusResult<Vec<String>> {
        Ok(self
            .list_nodes(field_selector)
            .await?
            .into_iter()
            .filter_map(|node| node.metadata.name)
            .collect())
    }

    async fn list_node_capacities(&self) -> StatusResult<Vec<NodeCapacity>> {
        Ok(self
            .list_nodes(None)
            .await?
            .into_iter()
            .filter_map(|node| {
                let memory = node
                    .status
                    .and_then(|status| status.capacity)
                    .and_then(|capacity| capacity.get("memory").map(|quantity| quantity.0.clone()));
                node.metadata.name.map(|name| NodeCapacity { name, memory })
            })
            .collect())
    }

    async fn list_node_memory_usage(&self) -> StatusResult<Vec<NodeMemoryUsage>> {
        let metrics: NodeMetricsList = self.request_json(NODE_METRICS_PATH).await?;

        Ok(metrics
            .items
            .into_iter()
            .filter_map(|item| {
                item.usage.memory.map(|memory| NodeMemoryUsage {
                    name: item.metadata.name,
                    memory,
                })
            })
            .collect())
    }

    async fn list_pod_names(
        &self, namespace: &str, field_selector: &str,
    ) -> StatusResult<Vec<String>> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let params = ListParams::default().fields(field_selector);

        let list = pods.list(&params).await.map_err(|e| {
            StatusError::KubernetesError(format!(
                "Failed to list pods in namespace {}: {}",
                namespace, e
            ))
        })?;

        Ok(list
            .items
            .into_iter()
            .filter_map(|pod| pod.metadata.name)
            .collect())
    }
}
