// Configuration management with layered configuration (file, env)

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure containing all configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub azure_devops: AzureDevOpsConfig,
    pub github: GitHubConfig,
    pub jira: JiraConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureDevOpsConfig {
    pub organization: String,
    /// Personal access token, sent as the Basic-auth password with an empty username
    pub pat: String,
    /// Override for the organization base URL. Derived from `organization` when unset.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl AzureDevOpsConfig {
    /// Base URL for all Azure DevOps calls
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("https://dev.azure.com/{}", self.organization))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    pub token: String,
    #[serde(default = "default_github_base_url")]
    pub base_url: String,
}

fn default_github_base_url() -> String {
    "https://api.github.com".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraConfig {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
}

impl JiraConfig {
    /// True when every credential field needed to reach Jira is present
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.email.is_empty() && !self.api_token.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub tracing_endpoint: Option<String>,
}

impl Settings {
    /// Load configuration with layered precedence: defaults → file → env
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default configuration
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Add local configuration (not committed to git)
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // Add environment-specific configuration
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        let settings: Self = config.try_deserialize()?;
        Ok(settings.apply_provider_env())
    }

    /// Overlay the provider-specific environment variables the upstream
    /// credentials are conventionally delivered through. These take
    /// precedence over anything in the config files.
    fn apply_provider_env(mut self) -> Self {
        if let Ok(v) = std::env::var("AZURE_DEVOPS_ORG") {
            self.azure_devops.organization = v;
        }
        if let Ok(v) = std::env::var("AZURE_DEVOPS_PAT") {
            self.azure_devops.pat = v;
        }
        if let Ok(v) = std::env::var("GITHUB_PERSONAL_ACCESS_TOKEN") {
            self.github.token = v;
        }
        if let Ok(v) = std::env::var("JIRA_BASE_URL") {
            self.jira.base_url = v;
        }
        if let Ok(v) = std::env::var("JIRA_EMAIL") {
            self.jira.email = v;
        }
        if let Ok(v) = std::env::var("JIRA_API_TOKEN") {
            self.jira.api_token = v;
        }
        self
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Log a warning for each provider whose credentials are incomplete.
    /// Missing credentials are not a startup failure: the corresponding
    /// facade simply fails at request time.
    pub fn log_missing_credentials(&self) {
        if !self.jira.is_configured() {
            tracing::warn!(
                "Missing Jira configuration values! Check JIRA_BASE_URL, JIRA_EMAIL and JIRA_API_TOKEN."
            );
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            azure_devops: AzureDevOpsConfig {
                organization: String::new(),
                pat: String::new(),
                base_url: None,
            },
            github: GitHubConfig {
                token: String::new(),
                base_url: default_github_base_url(),
            },
            jira: JiraConfig {
                base_url: String::new(),
                email: String::new(),
                api_token: String::new(),
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                tracing_endpoint: None,
            },
        }
    }
}
