use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{
    Deserialize,
    Serialize,
};

use crate::error::StatusError;

/// Ordered key/value summary produced by a single `get_status()` call
pub type StatusReport = IndexMap<String, StatusValue>;

/// A single metric inside a [`StatusReport`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusValue {
    Count(i64),
    Text(String),
    List(Vec<String>),
    Quota(Vec<QuotaUsage>),
    Section(StatusReport),
}

impl StatusValue {
    pub fn as_count(&self) -> Option<i64> {
        match self {
            StatusValue::Count(count) => Some(*count),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StatusValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            StatusValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_quota(&self) -> Option<&[QuotaUsage]> {
        match self {
            StatusValue::Quota(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn as_section(&self) -> Option<&StatusReport> {
        match self {
            StatusValue::Section(section) => Some(section),
            _ => None,
        }
    }
}

impl From<i64> for StatusValue {
    fn from(value: i64) -> Self {
        StatusValue::Count(value)
    }
}

impl From<usize> for StatusValue {
    fn from(value: usize) -> Self {
        StatusValue::Count(value as i64)
    }
}

impl From<String> for StatusValue {
    fn from(value: String) -> Self {
        StatusValue::Text(value)
    }
}

impl From<&str> for StatusValue {
    fn from(value: &str) -> Self {
        StatusValue::Text(value.to_string())
    }
}

impl From<Vec<String>> for StatusValue {
    fn from(value: Vec<String>) -> Self {
        StatusValue::List(value)
    }
}

impl From<Vec<QuotaUsage>> for StatusValue {
    fn from(value: Vec<QuotaUsage>) -> Self {
        StatusValue::Quota(value)
    }
}

impl From<StatusReport> for StatusValue {
    fn from(value: StatusReport) -> Self {
        StatusValue::Section(value)
    }
}

/// Quota usage of one user for one resource, already rendered for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaUsage {
    pub email: String,
    pub used: String,
    pub limit: String,
    pub percentage: String,
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = StatusError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(StatusError::ParseError(format!(
                        "Unknown {} value: {}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

string_enum! {
    /// Workflow and interactive session lifecycle state, as stored in the database
    RunStatus {
        Created => "created",
        Running => "running",
        Finished => "finished",
        Failed => "failed",
        Deleted => "deleted",
        Stopped => "stopped",
        Queued => "queued",
        Pending => "pending",
    }
}

string_enum! {
    /// Job lifecycle state, as stored in the database
    JobStatus {
        Created => "created",
        Running => "running",
        Finished => "finished",
        Failed => "failed",
        Deleted => "deleted",
        Stopped => "stopped",
        Queued => "queued",
    }
}

string_enum! {
    ResourceType {
        Disk => "disk",
        Cpu => "cpu",
    }
}

string_enum! {
    /// Unit a resource quota is accounted in
    ResourceUnit {
        Bytes => "bytes_",
        Milliseconds => "milliseconds",
    }
}

string_enum! {
    /// Job execution substrate
    ComputeBackend {
        Kubernetes => "Kubernetes",
        HtCondor => "HTCondor",
        Slurm => "Slurm",
    }
}

string_enum! {
    /// Kubernetes pod phase
    PodPhase {
        Running => "Running",
        Pending => "Pending",
        Succeeded => "Succeeded",
        Failed => "Failed",
        Unknown => "Unknown",
    }
}

impl PodPhase {
    /// Field selector matching pods in this phase
    pub fn field_selector(&self) -> String {
        format!("status.phase={}", self.as_str())
    }
}

string_enum! {
    /// Status categories exposed through the registry
    StatusCategory {
        InteractiveSessions => "interactive-sessions",
        Workflows => "workflows",
        Users => "users",
        System => "system",
        Storage => "storage",
        Nodes => "nodes",
        Pods => "pods",
        Jobs => "jobs",
        QuotaUsage => "quota-usage",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip_names() {
        assert_eq!(StatusCategory::ALL.len(), 9);
        for category in StatusCategory::ALL {
            let parsed: StatusCategory = category.as_str().parse().unwrap();
            assert_eq!(parsed, *category);
        }
        assert!("quota_usage".parse::<StatusCategory>().is_err());
    }

    #[test]
    fn test_database_spellings() {
        assert_eq!(ResourceUnit::Bytes.as_str(), "bytes_");
        assert_eq!("HTCondor".parse::<ComputeBackend>().unwrap(), ComputeBackend::HtCondor);
        assert_eq!(PodPhase::Succeeded.field_selector(), "status.phase=Succeeded");
    }

    #[test]
    fn test_report_serializes_as_plain_json() {
        let mut section = StatusReport::new();
        section.insert("running".to_string(), StatusValue::from(3_i64));

        let mut report = StatusReport::new();
        report.insert("kubernetes".to_string(), StatusValue::from(section));
        report.insert("uptime".to_string(), StatusValue::from("up 2 days"));
        report.insert("nodes".to_string(), StatusValue::from(vec!["node-1".to_string()]));

        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"kubernetes":{"running":3},"uptime":"up 2 days","nodes":["node-1"]}"#
        );
    }
}
