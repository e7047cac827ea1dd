pub mod error;
pub mod provider;
pub mod registry;
pub mod types;
pub mod utils;

pub use error::{
    StatusError,
    StatusResult,
};
pub use provider::{
    StatusParams,
    StatusProvider,
    StatusUser,
};
pub use registry::{
    ProviderFactory,
    StatusRegistry,
};
pub use types::{
    ComputeBackend,
    JobStatus,
    PodPhase,
    QuotaUsage,
    ResourceType,
    ResourceUnit,
    RunStatus,
    StatusCategory,
    StatusReport,
    StatusValue,
};

/// Generates a `factory` function suitable for [`StatusRegistry::register`].
///
/// The provider type must expose `new(Arc<Context>, StatusParams) -> Self`.
#[macro_export]
macro_rules! status_factory {
    ($provider_type:ty, $context_type:ty) => {
        pub fn factory(
            context: ::std::sync::Arc<$context_type>, params: $crate::StatusParams,
        ) -> Box<dyn $crate::StatusProvider> {
            Box::new(<$provider_type>::new(context, params))
        }
    };
}
