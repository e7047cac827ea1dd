pub mod application;
pub mod infrastructure;
pub mod logging;
pub mod providers;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

pub use application::StatusService;
use infrastructure::{
    database,
    ClusterApi,
    CommandRunner,
    KubeCluster,
    StatusConfig,
    StatusStore,
    SystemCommandRunner,
};
pub use reana_status_api::{
    StatusCategory,
    StatusError,
    StatusParams,
    StatusReport,
    StatusResult,
    StatusUser,
    StatusValue,
};

/// Everything a status provider reads from
pub struct StatusContext {
    pub config: StatusConfig,

    pub store: Arc<dyn StatusStore>,

    pub cluster: Arc<dyn ClusterApi>,

    pub commands: Arc<dyn CommandRunner>,
}

impl StatusContext {
    pub fn new(
        config: StatusConfig, store: Arc<dyn StatusStore>, cluster: Arc<dyn ClusterApi>,
        commands: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            config,
            store,
            cluster,
            commands,
        }
    }

    /// Connect to the database and cluster described by `config`
    pub async fn connect(config: StatusConfig) -> StatusResult<Self> {
        let store = database::connect(&config.database).await?;
        let cluster = Arc::new(KubeCluster::from_config(&config.kubernetes).await?);

        tracing::info!(
            backend = %config.database.backend,
            namespaces = ?config.kubernetes.namespaces(),
            "Status context ready"
        );

        Ok(Self::new(config, store, cluster, Arc::new(SystemCommandRunner)))
    }
}
