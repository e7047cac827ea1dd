pub mod cluster;
pub mod config;
pub mod database;
pub mod shell;

pub use cluster::{
    ClusterApi,
    KubeCluster,
};
pub use config::{
    ConfigLoader,
    StatusConfig,
};
pub use database::{
    QuotaOrder,
    QuotaRow,
    StatusStore,
};
pub use shell::{
    CommandRunner,
    SystemCommandRunner,
};
