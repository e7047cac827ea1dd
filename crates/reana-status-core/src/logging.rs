use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::{
        SubscriberInitExt,
        TryInitError,
    },
    EnvFilter,
};

pub const DEFAULT_LOG_FILTER: &str = "reana_status_core=info,reana_status_api=info,kube=warn";

pub fn init() {
    init_with_default(DEFAULT_LOG_FILTER);
}

/// Install the global subscriber; panics if one is already set
pub fn init_with_default(default_filter: &str) {
    if let Err(e) = try_init_with_default(default_filter) {
        panic!("Failed to initialise logging: {}", e);
    }
}

/// Like [`init_with_default`] for callers that may already have a subscriber,
/// such as a host application or a test harness
pub fn try_init_with_default(default_filter: &str) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .try_init()
}

pub fn init_dev() {
    init_with_default("reana_status_core=debug,reana_status_api=debug,kube=info");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_reported_not_panicking() {
        let _ = try_init_with_default(DEFAULT_LOG_FILTER);
        assert!(try_init_with_default(DEFAULT_LOG_FILTER).is_err());
    }
}
