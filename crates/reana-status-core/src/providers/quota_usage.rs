use std::sync::Arc;

use async_trait::async_trait;
use reana_status_api::utils::{
    human_readable_unit,
    usage_percentage,
};
use reana_status_api::{
    QuotaUsage,
    ResourceType,
    StatusCategory,
    StatusParams,
    StatusProvider,
    StatusReport,
    StatusResult,
    StatusValue,
};

use crate::infrastructure::{
    QuotaOrder,
    QuotaRow,
};
use crate::StatusContext;

const TOP_USERS: i64 = 5;

pub struct QuotaUsageStatus {
    context: Arc<StatusContext>,
}

impl QuotaUsageStatus {
    pub fn new(context: Arc<StatusContext>, _params: StatusParams) -> Self {
        Self { context }
    }

    /// Users consuming the most of `resource_type` in absolute terms
    pub async fn get_top_five(&self, resource_type: ResourceType) -> StatusResult<Vec<QuotaUsage>> {
        let rows = self
            .context
            .store
            .top_quota_usage(resource_type, QuotaOrder::Used, TOP_USERS)
            .await?;
        Ok(format_user_data(&rows))
    }

    /// Users closest to their `resource_type` limit; users without a limit are skipped
    pub async fn get_top_five_percentage(
        &self, resource_type: ResourceType,
    ) -> StatusResult<Vec<QuotaUsage>> {
        let rows = self
            .context
            .store
            .top_quota_usage(resource_type, QuotaOrder::Percentage, TOP_USERS)
            .await?;
        Ok(format_user_data(&rows))
    }
}

/// Render quota rows in their resource unit
pub fn format_user_data(rows: &[QuotaRow]) -> Vec<QuotaUsage> {
    rows.iter()
        .map(|row| QuotaUsage {
            email: row.email.clone(),
            used: human_readable_unit(row.unit, row.quota_used),
            limit: human_readable_unit(row.unit, row.quota_limit),
            percentage: usage_percentage(row.quota_used, row.quota_limit),
        })
        .collect()
}

#[async_trait]
impl StatusProvider for QuotaUsageStatus {
    fn category(&self) -> StatusCategory {
        StatusCategory::QuotaUsage
    }

    async fn get_status(&self) -> StatusResult<StatusReport> {
        let mut report = StatusReport::new();
        report.insert(
            "top_five_disk".to_string(),
            StatusValue::from(self.get_top_five(ResourceType::Disk).await?),
        );
        report.insert(
            "top_five_cpu".to_string(),
            StatusValue::from(self.get_top_five(ResourceType::Cpu).await?),
        );
        report.insert(
            "top_five_disk_percentage".to_string(),
            StatusValue::from(self.get_top_five_percentage(ResourceType::Disk).await?),
        );
        report.insert(
            "top_five_cpu_percentage".to_string(),
            StatusValue::from(self.get_top_five_percentage(ResourceType::Cpu).await?),
        );
        Ok(report)
    }
}

reana_status_api::status_factory!(QuotaUsageStatus, StatusContext);

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use reana_status_api::ResourceUnit;

    use super::*;
    use crate::test_support::{
        context,
        context_with,
        test_config,
        FakeCluster,
        FakeRunner,
        FakeStore,
    };

    fn row(email: &str, used: i64, limit: i64, unit: ResourceUnit) -> QuotaRow {
        QuotaRow {
            email: email.to_string(),
            quota_used: used,
            quota_limit: limit,
            unit,
        }
    }

    #[test]
    fn test_format_user_data() {
        let rows = vec![
            row("jane.doe@cern.ch", 1_610_612_736, 10_737_418_240, ResourceUnit::Bytes),
            row("john.doe@cern.ch", 93_784_000, 0, ResourceUnit::Milliseconds),
        ];

        let formatted = format_user_data(&rows);

        assert_eq!(
            formatted[0],
            QuotaUsage {
                email: "jane.doe@cern.ch".to_string(),
                used: "1.5 GiB".to_string(),
                limit: "10.0 GiB".to_string(),
                percentage: "15%".to_string(),
            }
        );
        assert_eq!(formatted[1].used, "26h 3m 4s");
        assert_eq!(formatted[1].limit, "0s");
        assert_eq!(formatted[1].percentage, "");
    }

    #[tokio::test]
    async fn test_status_has_four_rankings() {
        let disk_by_used = vec![
            row("a@cern.ch", 2048, 0, ResourceUnit::Bytes),
            row("b@cern.ch", 1024, 4096, ResourceUnit::Bytes),
        ];
        let disk_by_percentage = vec![row("b@cern.ch", 1024, 4096, ResourceUnit::Bytes)];
        let store = FakeStore {
            quota: HashMap::from([
                ((ResourceType::Disk, QuotaOrder::Used), disk_by_used),
                ((ResourceType::Disk, QuotaOrder::Percentage), disk_by_percentage),
            ]),
            ..Default::default()
        };
        let provider = QuotaUsageStatus::new(
            context(store, FakeCluster::default(), FakeRunner::default()),
            StatusParams::default(),
        );

        let report = provider.get_status().await.unwrap();

        let keys: Vec<&str> = report.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "top_five_disk",
                "top_five_cpu",
                "top_five_disk_percentage",
                "top_five_cpu_percentage"
            ]
        );
        let disk = report["top_five_disk"].as_quota().unwrap();
        assert_eq!(disk.len(), 2);
        assert_eq!(disk[0].used, "2.0 KiB");
        assert_eq!(disk[0].percentage, "");
        let disk_percentage = report["top_five_disk_percentage"].as_quota().unwrap();
        assert_eq!(disk_percentage.len(), 1);
        assert_eq!(disk_percentage[0].percentage, "25%");
        assert!(report["top_five_cpu"].as_quota().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_every_ranking_requests_five_rows() {
        let store = Arc::new(FakeStore::default());
        let ctx = context_with(
            test_config(),
            store.clone(),
            Arc::new(FakeCluster::default()),
            Arc::new(FakeRunner::default()),
        );

        QuotaUsageStatus::new(ctx, StatusParams::default())
            .get_status()
            .await
            .unwrap();

        assert_eq!(*store.quota_limits.lock().unwrap(), vec![5, 5, 5, 5]);
    }
}
