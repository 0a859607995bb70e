use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use common::clients::azure_devops::AzureDevOpsClient;
use common::clients::github::GitHubClient;
use common::clients::jira::JiraClient;
use common::config::Settings;
use common::errors::UpstreamError;

/// Application state shared across all handlers.
///
/// Everything here is immutable after construction; the only per-process
/// mutable state is the Jira account-id cache inside `JiraClient`.
#[derive(Clone)]
pub struct AppState {
    pub azure_devops: Arc<AzureDevOpsClient>,
    pub github: Arc<GitHubClient>,
    pub jira: Arc<JiraClient>,
    pub config: Arc<Settings>,
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// Create a new AppState instance with one client per upstream provider
    pub fn new(config: Settings, metrics: PrometheusHandle) -> Result<Self, UpstreamError> {
        Ok(Self {
            azure_devops: Arc::new(AzureDevOpsClient::new(&config.azure_devops)?),
            github: Arc::new(GitHubClient::new(&config.github)?),
            jira: Arc::new(JiraClient::new(&config.jira)?),
            config: Arc::new(config),
            metrics,
        })
    }
}
