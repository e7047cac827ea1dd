//! One provider per status category.

pub mod interactive_sessions;
pub mod jobs;
pub mod nodes;
pub mod pods;
pub mod quota_usage;
pub mod storage;
pub mod system;
pub mod users;
pub mod workflows;

pub use interactive_sessions::InteractiveSessionsStatus;
pub use jobs::JobsStatus;
pub use nodes::{
    NodeMemory,
    NodesStatus,
};
pub use pods::PodsStatus;
pub use quota_usage::QuotaUsageStatus;
use reana_status_api::{
    StatusCategory,
    StatusRegistry,
};
pub use storage::StorageStatus;
pub use system::SystemStatus;
pub use users::UsersStatus;
pub use workflows::WorkflowsStatus;

use crate::StatusContext;

/// Registry with every status category mapped to its provider
pub fn create_status_registry() -> StatusRegistry<StatusContext> {
    let mut registry = StatusRegistry::new();

    registry.register(StatusCategory::InteractiveSessions, interactive_sessions::factory);
    registry.register(StatusCategory::Workflows, workflows::factory);
    registry.register(StatusCategory::Users, users::factory);
    registry.register(StatusCategory::System, system::factory);
    registry.register(StatusCategory::Storage, storage::factory);
    registry.register(StatusCategory::Nodes, nodes::factory);
    registry.register(StatusCategory::Pods, pods::factory);
    registry.register(StatusCategory::Jobs, jobs::factory);
    registry.register(StatusCategory::QuotaUsage, quota_usage::factory);

    registry
}

#[cfg(test)]
mod tests {
    use reana_status_api::StatusParams;

    use super::*;
    use crate::test_support::{
        context,
        FakeCluster,
        FakeRunner,
        FakeStore,
    };

    #[test]
    fn test_every_category_is_registered() {
        let registry = create_status_registry();

        assert_eq!(registry.count(), StatusCategory::ALL.len());
        assert_eq!(registry.categories(), StatusCategory::ALL.to_vec());
    }

    #[test]
    fn test_providers_match_their_category() {
        let registry = create_status_registry();
        let ctx = context(FakeStore::default(), FakeCluster::default(), FakeRunner::default());

        for category in StatusCategory::ALL {
            let provider = registry
                .create(*category, ctx.clone(), StatusParams::default())
                .unwrap();
            assert_eq!(provider.category(), *category);
        }
    }
}
