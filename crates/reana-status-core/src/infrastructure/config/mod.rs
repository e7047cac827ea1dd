mod interpolation;
mod loader;
mod schema;

pub use interpolation::{
    interpolate,
    InterpolationError,
};
pub use loader::{
    ConfigLoadError,
    ConfigLoadResult,
    ConfigLoader,
};
pub use schema::{
    DatabaseBackend,
    DatabaseConfig,
    KubernetesConfig,
    PlatformConfig,
    StatusConfig,
    DEFAULT_CONFIG_TEMPLATE,
};
