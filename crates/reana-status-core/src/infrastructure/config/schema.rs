use std::fmt;
use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};

pub const DEFAULT_DATABASE_URL: &str = "postgresql://reana:reana@db:5432/reana";
pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_COMPONENT_PREFIX: &str = "reana";
pub const DEFAULT_SHARED_VOLUME_PATH: &str = "/var/reana";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Template used when no config file exists; every value can be overridden
/// through the environment variables the REANA components already export.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"
[database]
backend = "${REANA_STATUS_DATABASE_BACKEND:-postgres}"
url = "${REANA_DATABASE_URL:-postgresql://reana:reana@db:5432/reana}"

[kubernetes]
infrastructure_namespace = "${REANA_INFRASTRUCTURE_KUBERNETES_NAMESPACE:-default}"
runtime_namespace = "${REANA_RUNTIME_KUBERNETES_NAMESPACE:-default}"

[platform]
component_prefix = "${REANA_COMPONENT_PREFIX:-reana}"
shared_volume_path = "${SHARED_VOLUME_PATH:-/var/reana}"
"#;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub kubernetes: KubernetesConfig,

    #[serde(default)]
    pub platform: PlatformConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    Postgres,
    Sqlite,
}

impl fmt::Display for DatabaseBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseBackend::Postgres => write!(f, "postgres"),
            DatabaseBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: DatabaseBackend,

    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::default(),
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KubernetesConfig {
    #[serde(default = "default_namespace")]
    pub infrastructure_namespace: String,

    #[serde(default = "default_namespace")]
    pub runtime_namespace: String,

    /// Empty means in-cluster or default kubeconfig discovery
    #[serde(default)]
    pub kubeconfig_path: String,

    #[serde(default)]
    pub context: String,
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            infrastructure_namespace: default_namespace(),
            runtime_namespace: default_namespace(),
            kubeconfig_path: String::new(),
            context: String::new(),
        }
    }
}

impl KubernetesConfig {
    /// Infrastructure and runtime namespaces, without duplicates
    pub fn namespaces(&self) -> Vec<String> {
        let mut namespaces = vec![self.infrastructure_namespace.clone()];
        if self.runtime_namespace != self.infrastructure_namespace {
            namespaces.push(self.runtime_namespace.clone());
        }
        namespaces
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(default = "default_component_prefix")]
    pub component_prefix: String,

    #[serde(default = "default_shared_volume_path")]
    pub shared_volume_path: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            component_prefix: default_component_prefix(),
            shared_volume_path: default_shared_volume_path(),
        }
    }
}

impl PlatformConfig {
    pub fn users_directory(&self) -> PathBuf {
        PathBuf::from(&self.shared_volume_path).join("users")
    }

    /// Name prefix of the pods that run workflow jobs
    pub fn job_pod_prefix(&self) -> String {
        format!("{}-run-job", self.component_prefix)
    }
}

impl StatusConfig {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }
        if self.database.max_connections == 0 {
            errors.push("database.max_connections must be at least 1".to_string());
        }
        if self.kubernetes.infrastructure_namespace.trim().is_empty() {
            errors.push("kubernetes.infrastructure_namespace must not be empty".to_string());
        }
        if self.kubernetes.runtime_namespace.trim().is_empty() {
            errors.push("kubernetes.runtime_namespace must not be empty".to_string());
        }
        if self.platform.component_prefix.trim().is_empty() {
            errors.push("platform.component_prefix must not be empty".to_string());
        }
        if self.platform.shared_volume_path.trim().is_empty() {
            errors.push("platform.shared_volume_path must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_component_prefix() -> String {
    DEFAULT_COMPONENT_PREFIX.to_string()
}

fn default_shared_volume_path() -> String {
    DEFAULT_SHARED_VOLUME_PATH.to_string()
}
