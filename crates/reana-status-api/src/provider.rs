use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{
    DateTime,
    Duration,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::error::StatusResult;
use crate::types::{
    StatusCategory,
    StatusReport,
};

/// User a status report can be narrowed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUser {
    pub email: String,
    pub workspace_path: PathBuf,
}

/// Parameters every status provider is constructed with.
///
/// The time window is accepted for every category but no provider narrows
/// its queries by it yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusParams {
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
    pub user: Option<StatusUser>,
}

impl StatusParams {
    /// Build parameters, defaulting the window to the last 24 hours
    pub fn new(
        from: Option<DateTime<Utc>>, until: Option<DateTime<Utc>>, user: Option<StatusUser>,
    ) -> Self {
        let now = Utc::now();
        Self {
            from: from.unwrap_or_else(|| now - Duration::days(1)),
            until: until.unwrap_or(now),
            user,
        }
    }

    pub fn for_user(user: StatusUser) -> Self {
        Self::new(None, None, Some(user))
    }
}

impl Default for StatusParams {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

/// Main provider trait - every status category implements this
#[async_trait]
pub trait StatusProvider: Send + Sync {
    /// Category this provider reports on
    fn category(&self) -> StatusCategory;

    /// Collect a point-in-time summary
    async fn get_status(&self) -> StatusResult<StatusReport>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_is_last_day() {
        let params = StatusParams::default();
        assert_eq!(params.until - params.from, Duration::days(1));
        assert!(params.user.is_none());
    }

    #[test]
    fn test_explicit_window_is_kept() {
        let until = Utc::now() - Duration::hours(3);
        let from = until - Duration::hours(1);
        let params = StatusParams::new(Some(from), Some(until), None);
        assert_eq!(params.from, from);
        assert_eq!(params.until, until);
    }
}
