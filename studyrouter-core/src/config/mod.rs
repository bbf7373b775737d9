//! Studyrouter Configuration Module
//!
//! Loads `studyrouter.toml`, resolves the OpenRouter credential and site
//! attribution, and defines the immutable routing table handed to the router.

pub mod api_keys;
pub mod constants;
pub mod loader;
pub mod router;

pub use api_keys::{ApiKeySources, SiteAttribution, get_api_key, get_site_attribution, load_dotenv};
pub use loader::{ApiConfig, ConfigManager, StudyRouterConfig};
pub use router::{
    ComparisonOp, Condition, ConfigError, ModelConfig, RouterConfig, RoutingRule, TaskType,
};
