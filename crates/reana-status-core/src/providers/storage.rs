use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use reana_status_api::{
    StatusCategory,
    StatusError,
    StatusParams,
    StatusProvider,
    StatusReport,
    StatusResult,
    StatusUser,
    StatusValue,
};

use crate::StatusContext;

pub struct StorageStatus {
    context: Arc<StatusContext>,
    user: Option<StatusUser>,
}

impl StorageStatus {
    pub fn new(context: Arc<StatusContext>, params: StatusParams) -> Self {
        Self {
            context,
            user: params.user,
        }
    }

    /// The user's workspace, or the directory holding every user's workspace
    pub fn get_path(&self) -> PathBuf {
        match &self.user {
            Some(user) => user.workspace_path.clone(),
            None => self.context.config.platform.users_directory(),
        }
    }

    /// Human-readable size of [`Self::get_path`] as reported by `du`
    pub async fn users_directory_size(&self) -> StatusResult<String> {
        let path = self.get_path().to_string_lossy().into_owned();
        let output = self
            .context
            .commands
            .run("du", &["-h", "--max-depth=0", path.as_str()])
            .await?;

        output
            .split_whitespace()
            .next()
            .map(str::to_string)
            .ok_or_else(|| StatusError::ParseError(format!("Empty `du` output for {}", path)))
    }

    /// `"<used>/<available> (<use%>)"` of the shared volume
    pub async fn shared_volume_health(&self) -> StatusResult<String> {
        let volume = &self.context.config.platform.shared_volume_path;
        let output = self.context.commands.run("df", &["-h", volume.as_str()]).await?;
        parse_df_output(&output)
    }
}

/// Reads `Used`, `Avail` and `Use%` from the header and first data row of
/// `df -h` output. Only the C locale column names are recognised.
fn parse_df_output(output: &str) -> StatusResult<String> {
    let mut lines = output.lines();
    let headers: Vec<&str> = lines
        .next()
        .ok_or_else(|| StatusError::ParseError("Empty `df` output".to_string()))?
        .split_whitespace()
        .collect();
    let values: Vec<&str> = lines
        .next()
        .ok_or_else(|| StatusError::ParseError("`df` output has no data row".to_string()))?
        .split_whitespace()
        .collect();

    let column = |name: &str| -> StatusResult<&str> {
        headers
            .iter()
            .position(|header| *header == name)
            .and_then(|index| values.get(index).copied())
            .ok_or_else(|| StatusError::ParseError(format!("Missing `{}` column in `df` output", name)))
    };

    Ok(format!(
        "{}/{} ({})",
        column("Used")?,
        column("Avail")?,
        column("Use%")?
    ))
}

#[async_trait]
impl StatusProvider for StorageStatus {
    fn category(&self) -> StatusCategory {
        StatusCategory::Storage
    }

    async fn get_status(&self) -> StatusResult<StatusReport> {
        let mut report = StatusReport::new();
        report.insert(
            "user_directory_size".to_string(),
            StatusValue::from(self.users_directory_size().await?),
        );
        report.insert(
            "shared_volume_health".to_string(),
            StatusValue::from(self.shared_volume_health().await?),
        );
        Ok(report)
    }
}

reana_status_api::status_factory!(StorageStatus, StatusContext);
