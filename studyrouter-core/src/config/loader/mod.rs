use crate::config::api_keys::ApiKeySources;
use crate::config::constants::{config_files, env_vars};
use crate::config::router::RouterConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// `[api]` section: credential lookup, endpoint and attribution
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Environment variable holding the OpenRouter key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Inline key, used only when the environment variable is unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override of the OpenRouter API base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Sent as `HTTP-Referer` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,

    /// Sent as `X-Title` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,

    /// Whole-request HTTP timeout; no timeout when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_key_env() -> String {
    env_vars::OPENROUTER_API_KEY.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            api_key: None,
            base_url: None,
            site_url: None,
            site_name: None,
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Credential and attribution sources, environment first
    pub fn key_sources(&self) -> ApiKeySources {
        ApiKeySources {
            openrouter_env: self.api_key_env.clone(),
            openrouter_config: self.api_key.clone(),
            site_url_config: self.site_url.clone(),
            site_name_config: self.site_name.clone(),
            ..ApiKeySources::default()
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Main configuration structure for studyrouter
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StudyRouterConfig {
    /// OpenRouter access settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Routing table
    #[serde(default)]
    pub router: RouterConfig,
}

impl StudyRouterConfig {
    /// Validate the routing table
    pub fn validate(&self) -> Result<()> {
        self.router
            .validate()
            .context("Invalid [router] configuration")
    }

    /// Write a default studyrouter.toml into the workspace
    ///
    /// Returns the names of the files that were written.
    pub fn bootstrap_project<P: AsRef<Path>>(workspace: P, force: bool) -> Result<Vec<String>> {
        Self::bootstrap_project_with_options(workspace, force, false)
    }

    /// Same as [`bootstrap_project`](Self::bootstrap_project), optionally targeting `~/.studyrouter/`
    pub fn bootstrap_project_with_options<P: AsRef<Path>>(
        workspace: P,
        force: bool,
        use_home_dir: bool,
    ) -> Result<Vec<String>> {
        let workspace = workspace.as_ref();
        let mut created_files = Vec::new();

        let config_path = match (use_home_dir, dirs::home_dir()) {
            (true, Some(home_dir)) => {
                let config_dir = home_dir.join(config_files::CONFIG_DIR_NAME);
                fs::create_dir_all(&config_dir).with_context(|| {
                    format!("Failed to create directory: {}", config_dir.display())
                })?;
                config_dir.join(config_files::CONFIG_FILE_NAME)
            }
            _ => workspace.join(config_files::CONFIG_FILE_NAME),
        };

        if !config_path.exists() || force {
            Self::create_sample_config(&config_path)?;
            created_files.push(config_files::CONFIG_FILE_NAME.to_string());
        }

        Ok(created_files)
    }

    /// Create sample configuration file
    pub fn create_sample_config<P: AsRef<Path>>(output: P) -> Result<()> {
        let output = output.as_ref();
        let config_content = toml::to_string_pretty(&StudyRouterConfig::default())
            .context("Failed to serialize default configuration")?;

        fs::write(output, config_content)
            .with_context(|| format!("Failed to write config file: {}", output.display()))?;

        Ok(())
    }
}

/// Configuration manager for loading and validating configurations
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: StudyRouterConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration from the default locations
    pub fn load() -> Result<Self> {
        Self::load_from_workspace(std::env::current_dir()?)
    }

    /// Load configuration from a specific workspace
    ///
    /// Search order: `<workspace>/studyrouter.toml`,
    /// `<workspace>/.studyrouter/studyrouter.toml`, `~/.studyrouter/studyrouter.toml`.
    /// Built-in defaults are used when none exists.
    pub fn load_from_workspace(workspace: impl AsRef<Path>) -> Result<Self> {
        let workspace = workspace.as_ref();

        let mut candidates = vec![
            workspace.join(config_files::CONFIG_FILE_NAME),
            workspace
                .join(config_files::CONFIG_DIR_NAME)
                .join(config_files::CONFIG_FILE_NAME),
        ];
        if let Some(home_dir) = dirs::home_dir() {
            candidates.push(
                home_dir
                    .join(config_files::CONFIG_DIR_NAME)
                    .join(config_files::CONFIG_FILE_NAME),
            );
        }

        if let Some(path) = candidates.iter().find(|path| path.exists()) {
            return Self::load_from_file(path);
        }

        tracing::debug!(workspace = %workspace.display(), "no config file found, using defaults");
        Ok(Self {
            config: StudyRouterConfig::default(),
            config_path: None,
        })
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: StudyRouterConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(Self {
            config,
            config_path: Some(path.to_path_buf()),
        })
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &StudyRouterConfig {
        &self.config
    }

    /// Get the configuration file path (if loaded from file)
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
