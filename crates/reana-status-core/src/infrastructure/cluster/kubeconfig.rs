use std::path::PathBuf;

use kube::config::Kubeconfig;
use reana_status_api::{
    StatusError,
    StatusResult,
};

pub(crate) fn expand_path(path: &str) -> String {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped).to_string_lossy().to_string();
        }
    }

    let expanded = shellexpand::env(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    expanded.to_string()
}

/// Split a `KUBECONFIG`-style list into expanded paths
pub(crate) fn split_kubeconfig_paths(path: &str) -> Vec<String> {
    let separator = if cfg!(windows) { ';' } else { ':' };

    path.split(separator)
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(expand_path)
        .collect()
}

/// Merge every readable kubeconfig in `paths`; the first current context wins
pub(crate) fn merge_kubeconfigs(paths: &[String]) -> StatusResult<Kubeconfig> {
    let mut merged = Kubeconfig::default();
    let mut found_any = false;

    for path in paths.iter().map(PathBuf::from) {
        if !path.exists() {
            continue;
        }

        match Kubeconfig::read_from(&path) {
            Ok(config) => {
                found_any = true;
                merged.clusters.extend(config.clusters);
                merged.auth_infos.extend(config.auth_infos);
                merged.contexts.extend(config.contexts);
                if merged.current_context.is_none() {
                    merged.current_context = config.current_context;
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable kubeconfig");
            }
        }
    }

    if !found_any {
        return Err(StatusError::InvalidConfig(format!(
            "No valid kubeconfig files found in {:?}",
            paths
        )));
    }

    Ok(merged)
}
