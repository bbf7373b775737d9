//! API key management for the OpenRouter credential and site attribution.
//!
//! The credential is looked up in the environment first (which includes values
//! loaded from a `.env` file), then in the configuration file. Site attribution
//! (URL and name forwarded as request headers) follows the same order.

use crate::config::constants::env_vars;
use anyhow::Result;
use std::env;

/// Where to look for the router credential and attribution values
#[derive(Debug, Clone)]
pub struct ApiKeySources {
    /// OpenRouter API key environment variable name
    pub openrouter_env: String,
    /// OpenRouter API key from configuration file
    pub openrouter_config: Option<String>,
    /// Site URL environment variable name
    pub site_url_env: String,
    /// Site URL from configuration file
    pub site_url_config: Option<String>,
    /// Site name environment variable name
    pub site_name_env: String,
    /// Site name from configuration file
    pub site_name_config: Option<String>,
}

impl Default for ApiKeySources {
    fn default() -> Self {
        Self {
            openrouter_env: env_vars::OPENROUTER_API_KEY.to_string(),
            openrouter_config: None,
            site_url_env: env_vars::PUBLIC_APP_URL.to_string(),
            site_url_config: None,
            site_name_env: env_vars::PUBLIC_APP_NAME.to_string(),
            site_name_config: None,
        }
    }
}

/// Optional attribution forwarded to OpenRouter as `HTTP-Referer` / `X-Title`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteAttribution {
    pub url: Option<String>,
    pub name: Option<String>,
}

/// Load environment variables from .env file
///
/// A missing `.env` file is not an error; a malformed one is logged and ignored.
pub fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded environment variables");
            Ok(())
        }
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            tracing::warn!(error = %e, "failed to load .env file");
            Ok(())
        }
    }
}

/// Get the OpenRouter API key, preferring the environment over the config file
///
/// # Returns
///
/// * `Ok(String)` - The API key if found
/// * `Err` - If neither the environment nor the config file provides a non-empty key
pub fn get_api_key(sources: &ApiKeySources) -> Result<String> {
    lookup(&sources.openrouter_env, sources.openrouter_config.as_ref()).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key found for OpenRouter. Set {} environment variable (or add to .env file) or configure api.api_key in studyrouter.toml",
            sources.openrouter_env
        )
    })
}

/// Resolve site URL and name for request attribution
pub fn get_site_attribution(sources: &ApiKeySources) -> SiteAttribution {
    SiteAttribution {
        url: lookup(&sources.site_url_env, sources.site_url_config.as_ref()),
        name: lookup(&sources.site_name_env, sources.site_name_config.as_ref()),
    }
}

fn lookup(env_var: &str, config_value: Option<&String>) -> Option<String> {
    if let Ok(value) = env::var(env_var) {
        if !value.trim().is_empty() {
            return Some(value);
        }
    }

    config_value
        .filter(|value| !value.trim().is_empty())
        .cloned()
}
