//! Task-based model router with sequential fallback.
//!
//! The router owns an immutable [`RouterConfig`] and an [`LLMProvider`]. Each
//! call picks one model (override, first matching rule, or the default), sends
//! a single request, and on failure walks the fallback chain in order. Nothing
//! is mutated after construction, so a router can be shared across tasks.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::api_keys::{
    ApiKeySources, SiteAttribution, get_api_key, get_site_attribution, load_dotenv,
};
use crate::config::constants::env_vars;
use crate::config::loader::StudyRouterConfig;
use crate::config::router::{ConfigError, ModelConfig, RouterConfig};
use crate::core::complexity::{ComplexityEstimator, ComplexityResult};
use crate::llm::{
    FinishReason, LLMError, LLMProvider, LLMRequest, LLMResponse, Message, OpenRouterProvider,
    Usage,
};

pub use crate::config::router::TaskType;

const CLASSIFIER_PROMPT: &str = "You rate the difficulty of study material for a tutoring app. \
Consider vocabulary, abstraction, prerequisite knowledge and notation. \
Reply with a single number between 0 and 1, where 0 is trivial and 1 is expert level. No prose.";

static SCORE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?(?:\d+(?:\.\d+)?|\.\d+)").expect("score pattern is valid"));

/// Failure surfaced by the router
///
/// `status_code` is the HTTP status of the last failed attempt when it had one;
/// `model_id` is the routing-table id of the model that last failed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct RouterError {
    pub message: String,
    pub status_code: Option<u16>,
    pub model_id: Option<String>,
}

impl RouterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
            model_id: None,
        }
    }

    /// Names the environment variable the key was expected in
    pub fn missing_api_key(env_var: &str) -> Self {
        Self::new(format!("{env_var} is required"))
    }

    pub fn unknown_override(model_id: &str) -> Self {
        Self {
            model_id: Some(model_id.to_string()),
            ..Self::new(format!("Unknown model override: {model_id}"))
        }
    }

    fn attempt_failed(message: String, model_id: &str, error: &LLMError) -> Self {
        Self {
            message,
            status_code: error.status_code(),
            model_id: Some(model_id.to_string()),
        }
    }
}

impl From<ConfigError> for RouterError {
    fn from(error: ConfigError) -> Self {
        Self::new(format!("Invalid router configuration: {error}"))
    }
}

/// Connection settings for the OpenRouter-backed router
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    pub api_key: Option<String>,
    /// Variable the key was resolved from; `OPENROUTER_API_KEY` when unset
    pub api_key_env: Option<String>,
    pub site_url: Option<String>,
    pub site_name: Option<String>,
    /// Overrides the OpenRouter API base URL
    pub base_url: Option<String>,
    /// Whole-request HTTP timeout; none by default
    pub timeout: Option<Duration>,
}

impl RouterOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Resolve key and attribution from the given sources, environment first
    pub fn from_sources(sources: &ApiKeySources) -> Self {
        let SiteAttribution { url, name } = get_site_attribution(sources);
        Self {
            api_key: get_api_key(sources).ok(),
            api_key_env: Some(sources.openrouter_env.clone()),
            site_url: url,
            site_name: name,
            ..Self::default()
        }
    }

    /// `OPENROUTER_API_KEY`, `PUBLIC_APP_URL` and `PUBLIC_APP_NAME`
    pub fn from_env() -> Self {
        Self::from_sources(&ApiKeySources::default())
    }

    pub fn with_site(mut self, url: impl Into<String>, name: impl Into<String>) -> Self {
        self.site_url = Some(url.into());
        self.site_name = Some(name.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A routable generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub task: TaskType,
    pub messages: Vec<Message>,
    /// Score in `[0.0, 1.0]` used by conditional rules
    #[serde(default)]
    pub complexity: Option<f64>,
    /// Routing-table id that bypasses rules and disables fallback
    #[serde(default)]
    pub model_override: Option<String>,
    /// Completion budget; capped at the selected model's `max_tokens`
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl RouteRequest {
    pub fn new(task: TaskType, messages: Vec<Message>) -> Self {
        Self {
            task,
            messages,
            complexity: None,
            model_override: None,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_complexity(mut self, complexity: f64) -> Self {
        self.complexity = Some(complexity);
        self
    }

    pub fn with_model_override(mut self, model_id: impl Into<String>) -> Self {
        self.model_override = Some(model_id.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Normalized completion returned by [`ModelRouter::route`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub content: String,
    pub usage: Usage,
    /// Routing-table id of the model that answered
    pub model_id: String,
    /// Provider model identifier reported by the API, or the one requested
    pub model: String,
    pub used_fallback: bool,
    /// First model attempted, set only when a fallback answered
    pub original_model: Option<String>,
    /// The completion hit `max_tokens` before finishing
    #[serde(default)]
    pub truncated: bool,
}

pub struct ModelRouter {
    config: RouterConfig,
    provider: Arc<dyn LLMProvider>,
    estimator: ComplexityEstimator,
}

impl ModelRouter {
    /// Build an OpenRouter-backed router
    ///
    /// Fails when `options.api_key` is missing or blank, or when `config`
    /// violates a routing-table invariant.
    pub fn new(options: RouterOptions, config: RouterConfig) -> Result<Self, RouterError> {
        let Some(api_key) = options.api_key.filter(|key| !key.trim().is_empty()) else {
            let env_var = options.api_key_env.as_deref();
            return Err(RouterError::missing_api_key(
                env_var.unwrap_or(env_vars::OPENROUTER_API_KEY),
            ));
        };

        let attribution = SiteAttribution {
            url: options.site_url,
            name: options.site_name,
        };
        let mut provider = OpenRouterProvider::from_config(api_key, options.base_url, attribution);
        if let Some(timeout) = options.timeout {
            provider = provider
                .with_timeout(timeout)
                .map_err(|e| RouterError::new(e.to_string()))?;
        }

        Self::with_provider(config, Arc::new(provider))
    }

    /// Router over the default table, configured from the environment after loading `.env`
    pub fn from_env() -> Result<Self, RouterError> {
        if let Err(e) = load_dotenv() {
            warn!(error = %e, "could not load .env");
        }
        Self::new(RouterOptions::from_env(), RouterConfig::default())
    }

    /// Router built from a loaded `studyrouter.toml`
    pub fn from_config(config: &StudyRouterConfig) -> Result<Self, RouterError> {
        let api = &config.api;
        let mut options = RouterOptions::from_sources(&api.key_sources());
        options.base_url = api.base_url.clone();
        options.timeout = api.request_timeout();
        Self::new(options, config.router.clone())
    }

    /// Router over any provider implementation
    pub fn with_provider(
        config: RouterConfig,
        provider: Arc<dyn LLMProvider>,
    ) -> Result<Self, RouterError> {
        config.validate()?;
        Ok(Self {
            config,
            provider,
            estimator: ComplexityEstimator::new(),
        })
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Model that the first attempt of `request` will use
    pub fn select_model(&self, request: &RouteRequest) -> Result<&ModelConfig, RouterError> {
        if let Some(model_id) = &request.model_override {
            return self
                .config
                .get_model_config(model_id)
                .ok_or_else(|| RouterError::unknown_override(model_id));
        }

        let model_id = self
            .config
            .model_id_for_task(request.task, request.complexity);
        self.config.get_model_config(model_id).ok_or_else(|| {
            RouterError::new(format!("Routing table references unknown model: {model_id}"))
        })
    }

    /// Send `request` to the selected model, falling back along the chain on failure
    pub async fn route(&self, request: RouteRequest) -> Result<RouteResponse, RouterError> {
        if request.messages.is_empty() {
            return Err(RouterError::new("Request must contain at least one message"));
        }

        let primary = self.select_model(&request)?;
        debug!(
            task = %request.task,
            model_id = %primary.id,
            complexity = ?request.complexity,
            model_override = request.model_override.is_some(),
            provider = self.provider.name(),
            "selected model"
        );

        let error = match self.attempt(primary, &request).await {
            Ok(response) => return Ok(self.finish(&request, primary, response, None)),
            Err(error) => error,
        };

        if request.model_override.is_some() {
            warn!(
                task = %request.task,
                model_id = %primary.id,
                status = ?error.status_code(),
                error = %error,
                "override model failed"
            );
            return Err(RouterError::attempt_failed(
                format!("Model {} failed: {}", primary.id, error),
                &primary.id,
                &error,
            ));
        }

        warn!(
            task = %request.task,
            model_id = %primary.id,
            status = ?error.status_code(),
            error = %error,
            "primary model failed, trying fallbacks"
        );

        let mut tried: Vec<&str> = vec![primary.id.as_str()];
        let mut last_failure = (primary, error);

        for fallback_id in &self.config.fallback_chain {
            if tried.contains(&fallback_id.as_str()) {
                continue;
            }
            let Some(fallback) = self.config.get_model_config(fallback_id) else {
                continue;
            };
            tried.push(fallback.id.as_str());

            match self.attempt(fallback, &request).await {
                Ok(response) => {
                    let original = Some(primary.id.as_str());
                    return Ok(self.finish(&request, fallback, response, original));
                }
                Err(error) => {
                    warn!(
                        task = %request.task,
                        model_id = %fallback.id,
                        status = ?error.status_code(),
                        error = %error,
                        "fallback model failed"
                    );
                    last_failure = (fallback, error);
                }
            }
        }

        let (model, error) = last_failure;
        Err(RouterError::attempt_failed(
            format!(
                "All models failed for task {} (tried {}); last error from {}: {}",
                request.task,
                tried.join(", "),
                model.id,
                error
            ),
            &model.id,
            &error,
        ))
    }

    /// Route a system + user prompt pair and return the completion text
    pub async fn complete(
        &self,
        task: TaskType,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, RouterError> {
        let request = RouteRequest::new(
            task,
            vec![Message::system(system_prompt), Message::user(user_prompt)],
        );
        Ok(self.route(request).await?.content)
    }

    /// Ask the classifier model for a complexity score
    ///
    /// Any provider failure or unusable reply falls back to the heuristic
    /// estimator, so this never fails.
    pub async fn classify_complexity(&self, text: &str) -> ComplexityResult {
        if text.trim().is_empty() {
            return self.estimator.estimate(text);
        }

        let classifier = &self.config.classifier;
        let request = LLMRequest {
            messages: vec![Message::system(CLASSIFIER_PROMPT), Message::user(text)],
            model: classifier.model.clone(),
            max_tokens: Some(classifier.max_tokens),
            temperature: Some(0.0),
        };

        let failure = match self.provider.generate(request).await {
            Ok(response) => match response.content.as_deref().and_then(parse_score) {
                Some(score) => {
                    debug!(model = %classifier.model, score, "classified complexity");
                    return ComplexityResult::from_score(
                        score,
                        vec![format!("Classified by {}", classifier.model)],
                    );
                }
                None => "unparseable classifier reply".to_string(),
            },
            Err(error) => error.to_string(),
        };

        warn!(
            model = %classifier.model,
            reason = %failure,
            "classifier unavailable, using heuristic estimate"
        );
        let mut result = self.estimator.estimate(text);
        result
            .reasoning
            .insert(0, "Heuristic estimate (classifier unavailable)".to_string());
        result
    }

    async fn attempt(
        &self,
        model: &ModelConfig,
        request: &RouteRequest,
    ) -> Result<LLMResponse, LLMError> {
        let max_tokens = request
            .max_tokens
            .map_or(model.max_tokens, |requested| requested.min(model.max_tokens));

        self.provider
            .generate(LLMRequest {
                messages: request.messages.clone(),
                model: model.model.clone(),
                max_tokens: Some(max_tokens),
                temperature: request.temperature,
            })
            .await
    }

    fn finish(
        &self,
        request: &RouteRequest,
        model: &ModelConfig,
        response: LLMResponse,
        original_model: Option<&str>,
    ) -> RouteResponse {
        let usage = response.usage.unwrap_or_default();
        let truncated = response.finish_reason == FinishReason::Length;
        if truncated {
            warn!(
                task = %request.task,
                model_id = %model.id,
                max_tokens = model.max_tokens,
                "completion stopped at the token limit"
            );
        }
        info!(
            task = %request.task,
            model_id = %model.id,
            used_fallback = original_model.is_some(),
            finish_reason = ?response.finish_reason,
            total_tokens = usage.total_tokens,
            estimated_cost = model.estimate_cost(usage.total_tokens),
            "route completed"
        );

        RouteResponse {
            content: response.content.unwrap_or_default(),
            usage,
            model_id: model.id.clone(),
            model: response.model.unwrap_or_else(|| model.model.clone()),
            used_fallback: original_model.is_some(),
            original_model: original_model.map(str::to_string),
            truncated,
        }
    }
}

/// First number in the reply, accepted only within `[0, 1]`
fn parse_score(reply: &str) -> Option<f64> {
    SCORE_PATTERN
        .find(reply)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|score| (0.0..=1.0).contains(score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::complexity::ComplexityLevel;
    use crate::llm::MessageRole;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays queued results and records every request it receives
    struct ScriptedProvider {
        results: Mutex<VecDeque<Result<LLMResponse, LLMError>>>,
        requests: Mutex<Vec<LLMRequest>>,
    }

    impl ScriptedProvider {
        fn new(results: Vec<Result<LLMResponse, LLMError>>) -> Arc<Self> {
            Arc::new(Self {
                results: Mutex::new(results.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<LLMRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, request: LLMRequest) -> Result<LLMResponse, LLMError> {
            self.requests.lock().unwrap().push(request);
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LLMError::Provider("no scripted result".to_string())))
        }
    }

    fn ok(content: &str, total_tokens: u32) -> Result<LLMResponse, LLMError> {
        Ok(LLMResponse {
            content: Some(content.to_string()),
            usage: Some(Usage {
                prompt_tokens: total_tokens / 2,
                completion_tokens: total_tokens - total_tokens / 2,
                total_tokens,
            }),
            model: None,
            finish_reason: FinishReason::Stop,
        })
    }

    fn http(status: u16) -> Result<LLMResponse, LLMError> {
        Err(LLMError::Http {
            status,
            body: "upstream error".to_string(),
        })
    }

    fn router(provider: &Arc<ScriptedProvider>) -> ModelRouter {
        ModelRouter::with_provider(RouterConfig::default(), provider.clone()).unwrap()
    }

    fn flashcard_request() -> RouteRequest {
        RouteRequest::new(TaskType::Flashcard, vec![Message::user("Make cards about cells")])
    }

    #[test]
    fn test_new_requires_api_key() {
        let err = ModelRouter::new(RouterOptions::default(), RouterConfig::default())
            .err()
            .unwrap();
        assert_eq!(err.message, "OPENROUTER_API_KEY is required");

        let blank = RouterOptions::new("   ");
        assert!(ModelRouter::new(blank, RouterConfig::default()).is_err());
    }

    #[test]
    fn test_missing_key_names_configured_variable() {
        let sources = ApiKeySources {
            openrouter_env: "STUDYROUTER_ROUTER_TEST_KEY_UNSET".to_string(),
            ..ApiKeySources::default()
        };
        let options = RouterOptions::from_sources(&sources);
        assert!(options.api_key.is_none());

        let err = ModelRouter::new(options, RouterConfig::default()).err().unwrap();
        assert_eq!(err.message, "STUDYROUTER_ROUTER_TEST_KEY_UNSET is required");
    }

    #[test]
    fn test_new_rejects_invalid_table() {
        let mut config = RouterConfig::default();
        config.fallback_chain.push("ghost".to_string());
        let err = ModelRouter::new(RouterOptions::new("key"), config)
            .err()
            .unwrap();
        assert!(err.message.contains("ghost"));
    }

    #[test]
    fn test_select_model_follows_rules() {
        let provider = ScriptedProvider::new(vec![]);
        let router = router(&provider);

        let explain = RouteRequest::new(TaskType::Explain, vec![Message::user("x")]);
        assert_eq!(router.select_model(&explain).unwrap().id, "deepseek-v3");
        let hard = explain.clone().with_complexity(0.8);
        assert_eq!(router.select_model(&hard).unwrap().id, "claude-sonnet");
        let boundary = explain.with_complexity(0.7);
        assert_eq!(router.select_model(&boundary).unwrap().id, "deepseek-v3");

        let chat = RouteRequest::new(TaskType::Chat, vec![Message::user("x")]);
        assert_eq!(router.select_model(&chat).unwrap().id, "deepseek-v3");

        let pinned = flashcard_request().with_model_override("claude-haiku");
        assert_eq!(router.select_model(&pinned).unwrap().id, "claude-haiku");
    }

    #[tokio::test]
    async fn test_unknown_override_makes_no_calls() {
        let provider = ScriptedProvider::new(vec![ok("unused", 1)]);
        let err = router(&provider)
            .route(flashcard_request().with_model_override("nonexistent"))
            .await
            .unwrap_err();

        assert_eq!(err.message, "Unknown model override: nonexistent");
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_override_failure_makes_exactly_one_call() {
        let provider = ScriptedProvider::new(vec![http(500), ok("unused", 1)]);
        let err = router(&provider)
            .route(flashcard_request().with_model_override("claude-sonnet"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code, Some(500));
        assert_eq!(err.model_id.as_deref(), Some("claude-sonnet"));
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_primary_success_reports_no_fallback() {
        let provider = ScriptedProvider::new(vec![ok("Q: What is a cell?", 42)]);
        let response = router(&provider).route(flashcard_request()).await.unwrap();

        assert_eq!(response.content, "Q: What is a cell?");
        assert_eq!(response.model_id, "deepseek-v3");
        assert_eq!(response.model, "deepseek/deepseek-chat-v3-0324");
        assert_eq!(response.usage.total_tokens, 42);
        assert!(!response.used_fallback);
        assert!(response.original_model.is_none());
        assert!(!response.truncated);
    }

    #[tokio::test]
    async fn test_length_finish_marks_response_truncated() {
        let mut cut_off = ok("Q: What is mitosis?\nA: The", 4096).unwrap();
        cut_off.finish_reason = FinishReason::Length;
        let provider = ScriptedProvider::new(vec![Ok(cut_off)]);
        let response = router(&provider).route(flashcard_request()).await.unwrap();

        assert!(response.truncated);
        assert!(!response.used_fallback);
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_skips_primary_and_reports_original() {
        let provider = ScriptedProvider::new(vec![http(500), ok("from gemini", 10)]);
        let response = router(&provider).route(flashcard_request()).await.unwrap();

        assert!(response.used_fallback);
        assert_eq!(response.original_model.as_deref(), Some("deepseek-v3"));
        assert_eq!(response.model_id, "gemini-flash");
        assert_eq!(response.content, "from gemini");

        let models: Vec<String> = provider.requests().into_iter().map(|r| r.model).collect();
        assert_eq!(
            models,
            vec!["deepseek/deepseek-chat-v3-0324", "google/gemini-2.0-flash-001"]
        );
    }

    #[tokio::test]
    async fn test_exhaustion_carries_last_failure() {
        let provider = ScriptedProvider::new(vec![
            http(500),
            Err(LLMError::Network("connection reset".to_string())),
            Err(LLMError::RateLimit),
        ]);
        let err = router(&provider).route(flashcard_request()).await.unwrap_err();

        assert_eq!(provider.requests().len(), 3);
        assert_eq!(err.status_code, Some(429));
        assert_eq!(err.model_id.as_deref(), Some("claude-haiku"));
        assert!(err.message.contains("All models failed"));
    }

    #[tokio::test]
    async fn test_high_complexity_explain_falls_back_through_whole_chain() {
        let provider = ScriptedProvider::new(vec![http(503), http(503), http(503), http(502)]);
        let request = RouteRequest::new(TaskType::Explain, vec![Message::user("Explain entropy")])
            .with_complexity(0.9);
        let err = router(&provider).route(request).await.unwrap_err();

        let models: Vec<String> = provider.requests().into_iter().map(|r| r.model).collect();
        assert_eq!(models[0], "anthropic/claude-3.5-sonnet");
        assert_eq!(models.len(), 4);
        assert_eq!(err.status_code, Some(502));
    }

    #[tokio::test]
    async fn test_max_tokens_bounded_by_model() {
        let provider = ScriptedProvider::new(vec![ok("a", 1), ok("b", 1), ok("c", 1)]);
        let router = router(&provider);

        router.route(flashcard_request()).await.unwrap();
        router.route(flashcard_request().with_max_tokens(1000)).await.unwrap();
        router
            .route(flashcard_request().with_max_tokens(50_000).with_temperature(0.2))
            .await
            .unwrap();

        let requests = provider.requests();
        assert_eq!(requests[0].max_tokens, Some(8192));
        assert_eq!(requests[1].max_tokens, Some(1000));
        assert_eq!(requests[2].max_tokens, Some(8192));
        assert_eq!(requests[2].temperature, Some(0.2));
    }

    #[tokio::test]
    async fn test_empty_messages_rejected_without_call() {
        let provider = ScriptedProvider::new(vec![ok("unused", 1)]);
        let request = RouteRequest::new(TaskType::Quiz, Vec::new());
        assert!(router(&provider).route(request).await.is_err());
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_complete_sends_system_then_user() {
        let provider = ScriptedProvider::new(vec![ok("Summary text", 5)]);
        let content = router(&provider)
            .complete(TaskType::Summary, "You summarize notes.", "Mitosis has four phases.")
            .await
            .unwrap();

        assert_eq!(content, "Summary text");
        let requests = provider.requests();
        let roles: Vec<MessageRole> = requests[0].messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![MessageRole::System, MessageRole::User]);
        assert_eq!(requests[0].messages[1].content, "Mitosis has four phases.");
    }

    #[tokio::test]
    async fn test_classify_uses_classifier_reply() {
        let provider = ScriptedProvider::new(vec![ok("0.82", 3)]);
        let result = router(&provider)
            .classify_complexity("Derive the Schrödinger equation")
            .await;

        assert!((result.score - 0.82).abs() < 1e-9);
        assert_eq!(result.level, ComplexityLevel::Complex);
        let request = &provider.requests()[0];
        assert_eq!(request.max_tokens, Some(256));
        assert_eq!(request.temperature, Some(0.0));
    }

    #[tokio::test]
    async fn test_classify_falls_back_to_heuristic() {
        let text = "The cat sat on the mat.";
        let heuristic = ComplexityEstimator::new().estimate(text);

        let failing = ScriptedProvider::new(vec![http(500)]);
        let result = router(&failing).classify_complexity(text).await;
        assert!((result.score - heuristic.score).abs() < 1e-9);
        assert!(result.reasoning[0].contains("Heuristic"));

        let rambling = ScriptedProvider::new(vec![ok("Quite hard, maybe 7 out of 10", 3)]);
        let result = router(&rambling).classify_complexity(text).await;
        assert!((result.score - heuristic.score).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_classify_blank_text_skips_provider() {
        let provider = ScriptedProvider::new(vec![]);
        let result = router(&provider).classify_complexity("   ").await;
        assert_eq!(result.level, ComplexityLevel::Simple);
        assert!(provider.requests().is_empty());
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("0.4"), Some(0.4));
        assert_eq!(parse_score("Score: .75\n"), Some(0.75));
        assert_eq!(parse_score("1"), Some(1.0));
        assert_eq!(parse_score("7"), None);
        assert_eq!(parse_score("-0.5"), None);
        assert_eq!(parse_score("Score: -.2"), None);
        assert_eq!(parse_score("hard"), None);
    }
}
