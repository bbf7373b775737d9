//! Routing table: model catalogue, fallback chain and ordered task rules.
//!
//! The table is an immutable value. It is built once (from [`RouterConfig::default`]
//! or a `[router]` section in `studyrouter.toml`), validated with
//! [`RouterConfig::validate`], and handed to the router explicitly.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::constants::{limits, models};

/// Kind of generation request, used to select routing rules
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Flashcard,
    Quiz,
    Summary,
    Notes,
    Explain,
    Classify,
    Chat,
}

impl TaskType {
    pub const ALL: [TaskType; 7] = [
        TaskType::Flashcard,
        TaskType::Quiz,
        TaskType::Summary,
        TaskType::Notes,
        TaskType::Explain,
        TaskType::Classify,
        TaskType::Chat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Flashcard => "flashcard",
            TaskType::Quiz => "quiz",
            TaskType::Summary => "summary",
            TaskType::Notes => "notes",
            TaskType::Explain => "explain",
            TaskType::Classify => "classify",
            TaskType::Chat => "chat",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        TaskType::ALL
            .into_iter()
            .find(|task| task.as_str() == normalized)
            .ok_or_else(|| ConfigError::UnknownTask(s.to_string()))
    }
}

/// Comparison operator of a routing condition
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ComparisonOp {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    Equal,
}

impl ComparisonOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Greater => ">",
            ComparisonOp::GreaterOrEqual => ">=",
            ComparisonOp::Less => "<",
            ComparisonOp::LessOrEqual => "<=",
            ComparisonOp::Equal => "==",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">" => Some(ComparisonOp::Greater),
            ">=" => Some(ComparisonOp::GreaterOrEqual),
            "<" => Some(ComparisonOp::Less),
            "<=" => Some(ComparisonOp::LessOrEqual),
            "==" => Some(ComparisonOp::Equal),
            _ => None,
        }
    }
}

static CONDITION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*complexity\s*(>=|<=|==|>|<)\s*(\d+(?:\.\d+)?|\.\d+)\s*$")
        .expect("condition pattern is valid")
});

/// Numeric comparison over the request's complexity score
///
/// Written in config files as `complexity <op> <number>`, e.g. `complexity > 0.7`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Condition {
    pub op: ComparisonOp,
    pub threshold: f64,
}

impl Condition {
    pub fn new(op: ComparisonOp, threshold: f64) -> Self {
        Self { op, threshold }
    }

    /// Apply the comparison exactly as written: `> 0.7` does not hold at `0.7`.
    pub fn matches(&self, complexity: f64) -> bool {
        match self.op {
            ComparisonOp::Greater => complexity > self.threshold,
            ComparisonOp::GreaterOrEqual => complexity >= self.threshold,
            ComparisonOp::Less => complexity < self.threshold,
            ComparisonOp::LessOrEqual => complexity <= self.threshold,
            ComparisonOp::Equal => (complexity - self.threshold).abs() < f64::EPSILON,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "complexity {} {}", self.op.symbol(), self.threshold)
    }
}

impl FromStr for Condition {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidCondition(s.to_string());
        let captures = CONDITION_PATTERN.captures(s).ok_or_else(invalid)?;
        let op = ComparisonOp::from_symbol(&captures[1]).ok_or_else(invalid)?;
        let threshold = captures[2].parse::<f64>().map_err(|_| invalid())?;
        Ok(Self { op, threshold })
    }
}

impl TryFrom<String> for Condition {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Condition> for String {
    fn from(condition: Condition) -> Self {
        condition.to_string()
    }
}

/// A callable model and its budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Catalogue key, unique within the routing table
    pub id: String,
    /// Gateway serving the model (e.g. "openrouter")
    pub provider: String,
    /// Provider-qualified identifier, `vendor/name`
    pub model: String,
    /// USD per 1000 tokens
    pub cost_per_1k_tokens: f64,
    /// Completion token budget sent with every request
    pub max_tokens: u32,
}

impl ModelConfig {
    pub fn new(
        id: impl Into<String>,
        provider: impl Into<String>,
        model: impl Into<String>,
        cost_per_1k_tokens: f64,
        max_tokens: u32,
    ) -> Self {
        Self {
            id: id.into(),
            provider: provider.into(),
            model: model.into(),
            cost_per_1k_tokens,
            max_tokens,
        }
    }

    /// Estimated spend for a call that consumed `total_tokens`
    pub fn estimate_cost(&self, total_tokens: u32) -> f64 {
        f64::from(total_tokens) / 1000.0 * self.cost_per_1k_tokens
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidModel {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id must not be empty"));
        }
        if !(self.cost_per_1k_tokens.is_finite() && self.cost_per_1k_tokens > 0.0) {
            return Err(invalid("cost_per_1k_tokens must be greater than 0"));
        }
        if self.max_tokens == 0 || self.max_tokens > limits::MAX_TOKENS_CAP {
            return Err(invalid("max_tokens must be between 1 and 100000"));
        }
        match self.model.split_once('/') {
            Some((vendor, name))
                if !vendor.trim().is_empty() && !name.trim().is_empty() && !name.contains('/') => {}
            _ => return Err(invalid("model must be a provider-qualified identifier (vendor/name)")),
        }
        Ok(())
    }
}

/// Maps a task (optionally gated by a complexity condition) to a model id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingRule {
    pub task: TaskType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    pub model: String,
}

impl RoutingRule {
    pub fn new(task: TaskType, model: impl Into<String>) -> Self {
        Self {
            task,
            condition: None,
            model: model.into(),
        }
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// A conditional rule never matches when no complexity was supplied.
    pub fn matches(&self, task: TaskType, complexity: Option<f64>) -> bool {
        if self.task != task {
            return false;
        }
        match (&self.condition, complexity) {
            (None, _) => true,
            (Some(condition), Some(value)) => condition.matches(value),
            (Some(_), None) => false,
        }
    }
}

/// Router configuration: model catalogue, default, fallback chain and rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Model used when no rule matches
    pub default_model: String,
    /// Models tried in order after the primary model fails
    #[serde(default)]
    pub fallback_chain: Vec<String>,
    /// Cheap model used for LLM-based complexity classification
    pub classifier: ModelConfig,
    /// Catalogue of routable models, keyed by id
    pub models: IndexMap<String, ModelConfig>,
    /// Ordered rules; first match wins
    #[serde(default)]
    pub rules: Vec<RoutingRule>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        use models::openrouter;

        let catalogue = [
            ModelConfig::new(
                models::DEEPSEEK_V3_ID,
                models::PROVIDER_OPENROUTER,
                openrouter::DEEPSEEK_CHAT_V3,
                0.0003,
                limits::DEFAULT_MAX_TOKENS,
            ),
            ModelConfig::new(
                models::GEMINI_FLASH_ID,
                models::PROVIDER_OPENROUTER,
                openrouter::GEMINI_2_0_FLASH,
                0.0004,
                limits::DEFAULT_MAX_TOKENS,
            ),
            ModelConfig::new(
                models::CLAUDE_HAIKU_ID,
                models::PROVIDER_OPENROUTER,
                openrouter::CLAUDE_3_5_HAIKU,
                0.004,
                limits::DEFAULT_MAX_TOKENS,
            ),
            ModelConfig::new(
                models::CLAUDE_SONNET_ID,
                models::PROVIDER_OPENROUTER,
                openrouter::CLAUDE_3_5_SONNET,
                0.015,
                limits::DEFAULT_MAX_TOKENS,
            ),
        ];

        Self {
            default_model: models::DEEPSEEK_V3_ID.to_string(),
            fallback_chain: vec![
                models::DEEPSEEK_V3_ID.to_string(),
                models::GEMINI_FLASH_ID.to_string(),
                models::CLAUDE_HAIKU_ID.to_string(),
            ],
            classifier: ModelConfig::new(
                models::CLASSIFIER_ID,
                models::PROVIDER_OPENROUTER,
                openrouter::DEEPSEEK_CHAT_V3,
                0.0003,
                limits::CLASSIFIER_MAX_TOKENS,
            ),
            models: catalogue
                .into_iter()
                .map(|model| (model.id.clone(), model))
                .collect(),
            rules: vec![
                RoutingRule::new(TaskType::Flashcard, models::DEEPSEEK_V3_ID),
                RoutingRule::new(TaskType::Quiz, models::DEEPSEEK_V3_ID),
                RoutingRule::new(TaskType::Summary, models::DEEPSEEK_V3_ID),
                RoutingRule::new(TaskType::Explain, models::CLAUDE_SONNET_ID)
                    .when(Condition::new(ComparisonOp::Greater, 0.7)),
                RoutingRule::new(TaskType::Explain, models::DEEPSEEK_V3_ID),
                RoutingRule::new(TaskType::Classify, models::DEEPSEEK_V3_ID),
            ],
        }
    }
}

impl RouterConfig {
    /// Look up a catalogue entry by id
    pub fn get_model_config(&self, id: &str) -> Option<&ModelConfig> {
        self.models.get(id)
    }

    /// First rule matching `task` and `complexity`, in declared order
    pub fn rule_for_task(&self, task: TaskType, complexity: Option<f64>) -> Option<&RoutingRule> {
        self.rules.iter().find(|rule| rule.matches(task, complexity))
    }

    /// Model id selected for `task`: the first matching rule, else `default_model`
    pub fn model_id_for_task(&self, task: TaskType, complexity: Option<f64>) -> &str {
        self.rule_for_task(task, complexity)
            .map(|rule| rule.model.as_str())
            .unwrap_or(self.default_model.as_str())
    }

    /// Catalogue entry selected for `task`; always `Some` on a validated table
    pub fn get_model_for_task(
        &self,
        task: TaskType,
        complexity: Option<f64>,
    ) -> Option<&ModelConfig> {
        self.get_model_config(self.model_id_for_task(task, complexity))
    }

    /// Check every invariant of the table
    ///
    /// All ids referenced by `default_model`, `fallback_chain` and `rules` must
    /// exist in `models`, each key must equal its entry's id, and every entry
    /// (classifier included) must carry a sane budget and identifier.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.models.is_empty() {
            return Err(ConfigError::EmptyCatalogue);
        }

        self.classifier.validate()?;
        for (key, model) in &self.models {
            if key != &model.id {
                return Err(ConfigError::MismatchedModelId {
                    key: key.clone(),
                    id: model.id.clone(),
                });
            }
            model.validate()?;
        }

        self.ensure_known("default_model", &self.default_model)?;
        for (index, id) in self.fallback_chain.iter().enumerate() {
            self.ensure_known(&format!("fallback_chain[{index}]"), id)?;
        }
        for (index, rule) in self.rules.iter().enumerate() {
            self.ensure_known(&format!("rules[{index}] ({})", rule.task), &rule.model)?;
        }

        Ok(())
    }

    fn ensure_known(&self, field: &str, id: &str) -> Result<(), ConfigError> {
        if self.models.contains_key(id) {
            Ok(())
        } else {
            Err(ConfigError::UnknownModel {
                field: field.to_string(),
                model_id: id.to_string(),
            })
        }
    }
}

/// Routing table errors, raised at load/construction time
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} references unknown model '{model_id}'")]
    UnknownModel { field: String, model_id: String },
    #[error("model '{id}' is invalid: {reason}")]
    InvalidModel { id: String, reason: String },
    #[error("models table key '{key}' does not match model id '{id}'")]
    MismatchedModelId { key: String, id: String },
    #[error("invalid condition '{0}': expected `complexity <op> <number>` with op one of >, >=, <, <=, ==")]
    InvalidCondition(String),
    #[error("unknown task type '{0}'")]
    UnknownTask(String),
    #[error("models table must contain at least one model")]
    EmptyCatalogue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RouterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_model, "deepseek-v3");
        assert_eq!(config.classifier.id, "classifier");
        assert!(config.classifier.model.contains("deepseek"));
        assert!(!config.fallback_chain.is_empty());
    }

    #[test]
    fn test_default_rules_cover_common_tasks() {
        let config = RouterConfig::default();
        for task in [TaskType::Flashcard, TaskType::Quiz, TaskType::Summary] {
            assert!(config.rules.iter().any(|rule| rule.task == task));
        }
    }

    #[test]
    fn test_default_model_budgets_are_bounded() {
        let config = RouterConfig::default();
        for model in config.models.values() {
            assert!(model.cost_per_1k_tokens > 0.0 && model.cost_per_1k_tokens < 1.0);
            assert!(model.max_tokens > 0 && model.max_tokens <= 100_000);
            assert_eq!(model.provider, "openrouter");
        }
    }

    #[test]
    fn test_get_model_config_unknown_is_none() {
        let config = RouterConfig::default();
        assert!(config.get_model_config("nonexistent-model").is_none());
        assert_eq!(
            config.get_model_config("deepseek-v3").map(|m| m.provider.as_str()),
            Some("openrouter")
        );
    }

    #[test]
    fn test_explain_routes_on_complexity() {
        let config = RouterConfig::default();
        let high = config.get_model_for_task(TaskType::Explain, Some(0.8)).unwrap();
        assert_eq!(high.id, "claude-sonnet");

        let low = config.get_model_for_task(TaskType::Explain, Some(0.3)).unwrap();
        assert_eq!(low.id, "deepseek-v3");
    }

    #[test]
    fn test_explain_without_complexity_falls_through_to_unconditional_rule() {
        let config = RouterConfig::default();
        let rule = config.rule_for_task(TaskType::Explain, None).unwrap();
        assert!(rule.condition.is_none());
        assert_eq!(rule.model, "deepseek-v3");
    }

    #[test]
    fn test_condition_boundary_is_strict() {
        let config = RouterConfig::default();
        assert_eq!(config.model_id_for_task(TaskType::Explain, Some(0.7)), "deepseek-v3");
        assert_eq!(config.model_id_for_task(TaskType::Explain, Some(0.71)), "claude-sonnet");
    }

    #[test]
    fn test_task_without_rule_uses_default_model() {
        let mut config = RouterConfig::default();
        config.default_model = "claude-haiku".to_string();
        assert_eq!(config.model_id_for_task(TaskType::Chat, Some(0.9)), "claude-haiku");
        assert_eq!(config.model_id_for_task(TaskType::Notes, None), "claude-haiku");
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let mut config = RouterConfig::default();
        config.rules = vec![
            RoutingRule::new(TaskType::Quiz, "gemini-flash"),
            RoutingRule::new(TaskType::Quiz, "claude-sonnet")
                .when(Condition::new(ComparisonOp::GreaterOrEqual, 0.0)),
        ];
        assert_eq!(config.model_id_for_task(TaskType::Quiz, Some(0.99)), "gemini-flash");
    }

    #[test]
    fn test_condition_parse_and_display() {
        let condition: Condition = "complexity > 0.7".parse().unwrap();
        assert_eq!(condition, Condition::new(ComparisonOp::Greater, 0.7));
        assert_eq!(condition.to_string(), "complexity > 0.7");

        let compact: Condition = "complexity<=.25".parse().unwrap();
        assert_eq!(compact.op, ComparisonOp::LessOrEqual);
        assert!((compact.threshold - 0.25).abs() < f64::EPSILON);

        let eq: Condition = "complexity == 0.5".parse().unwrap();
        assert!(eq.matches(0.5));
        assert!(!eq.matches(0.51));
    }

    #[test]
    fn test_condition_rejects_malformed_input() {
        for bad in ["complexity > ", "length > 0.5", "complexity => 0.5", "0.5 < complexity", ""] {
            assert!(
                matches!(bad.parse::<Condition>(), Err(ConfigError::InvalidCondition(_))),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn test_validate_rejects_unknown_references() {
        let mut config = RouterConfig::default();
        config.fallback_chain.push("ghost".to_string());
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownModel {
                field: "fallback_chain[3]".to_string(),
                model_id: "ghost".to_string(),
            })
        );

        let mut config = RouterConfig::default();
        config.rules.push(RoutingRule::new(TaskType::Chat, "ghost"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownModel { model_id, .. }) if model_id == "ghost"
        ));

        let mut config = RouterConfig::default();
        config.default_model = "ghost".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_model_entries() {
        let mut config = RouterConfig::default();
        if let Some(model) = config.models.get_mut("claude-haiku") {
            model.max_tokens = 200_000;
        }
        assert!(matches!(config.validate(), Err(ConfigError::InvalidModel { .. })));

        let mut config = RouterConfig::default();
        config.classifier.model = "no-vendor-prefix".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidModel { .. })));

        let mut config = RouterConfig::default();
        if let Some(model) = config.models.get_mut("gemini-flash") {
            model.id = "gemini".to_string();
        }
        assert!(matches!(config.validate(), Err(ConfigError::MismatchedModelId { .. })));
    }

    #[test]
    fn test_task_type_from_str() {
        assert_eq!("Explain".parse::<TaskType>().unwrap(), TaskType::Explain);
        assert!("unknown-task".parse::<TaskType>().is_err());
    }

    #[test]
    fn test_estimate_cost() {
        let model = ModelConfig::new("m", "openrouter", "vendor/m", 0.002, 1000);
        assert!((model.estimate_cost(1500) - 0.003).abs() < 1e-12);
    }

    #[test]
    fn test_router_config_toml_parses_conditions() {
        let toml_src = r#"
default_model = "fast"
fallback_chain = ["fast", "smart"]

[classifier]
id = "classifier"
provider = "openrouter"
model = "vendor/tiny"
cost_per_1k_tokens = 0.0001
max_tokens = 64

[models.fast]
id = "fast"
provider = "openrouter"
model = "vendor/fast"
cost_per_1k_tokens = 0.0002
max_tokens = 4096

[models.smart]
id = "smart"
provider = "openrouter"
model = "vendor/smart-1.5"
cost_per_1k_tokens = 0.01
max_tokens = 4096

[[rules]]
task = "explain"
condition = "complexity >= 0.6"
model = "smart"

[[rules]]
task = "explain"
model = "fast"
"#;
        let config: RouterConfig = toml::from_str(toml_src).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.model_id_for_task(TaskType::Explain, Some(0.6)), "smart");
        assert_eq!(config.model_id_for_task(TaskType::Explain, None), "fast");
        assert_eq!(config.models.keys().collect::<Vec<_>>(), ["fast", "smart"]);
    }

    #[test]
    fn test_router_config_toml_rejects_malformed_condition() {
        let toml_src = r#"
default_model = "fast"

[classifier]
id = "classifier"
provider = "openrouter"
model = "vendor/tiny"
cost_per_1k_tokens = 0.0001
max_tokens = 64

[models.fast]
id = "fast"
provider = "openrouter"
model = "vendor/fast"
cost_per_1k_tokens = 0.0002
max_tokens = 4096

[[rules]]
task = "explain"
condition = "complexity ~ 0.6"
model = "fast"
"#;
        let err = toml::from_str::<RouterConfig>(toml_src).unwrap_err();
        assert!(err.to_string().contains("invalid condition"));
    }
}
