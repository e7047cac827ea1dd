use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};

/// Response of `GET /apis/metrics.k8s.io/v1beta1/nodes`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeMetricsList {
    #[serde(default)]
    pub items: Vec<NodeMetrics>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeMetrics {
    pub metadata: MetricsMeta,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub window: Option<String>,
    pub usage: NodeUsage,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsMeta {
    pub name: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeUsage {
    #[serde(default)]
    pub cpu: Option<String>,
    #[serde(default)]
    pub memory: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metrics_server_response() {
        let body = r#"{
            "kind": "NodeMetricsList",
            "apiVersion": "metrics.k8s.io/v1beta1",
            "metadata": {},
            "items": [
                {
                    "metadata": {"name": "node-1", "labels": {"kubernetes.io/os": "linux"}},
                    "timestamp": "2026-10-18T10:00:00Z",
                    "window": "20s",
                    "usage": {"cpu": "250m", "memory": "2048Ki"}
                },
                {
                    "metadata": {"name": "node-2"},
                    "usage": {"cpu": "1"}
                }
            ]
        }"#;

        let list: NodeMetricsList = serde_json::from_str(body).unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].metadata.name, "node-1");
        assert_eq!(list.items[0].usage.memory.as_deref(), Some("2048Ki"));
        assert!(list.items[1].usage.memory.is_none());
    }
}
