use std::time::Duration;

use crate::config::api_keys::SiteAttribution;
use crate::config::constants::{headers, urls};
use crate::llm::provider::{FinishReason, LLMError, LLMProvider, LLMRequest, LLMResponse, Usage};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::{Value, json};

fn parse_usage_value(value: &Value) -> Usage {
    let field = |name: &str| value.get(name).and_then(|v| v.as_u64()).unwrap_or(0) as u32;
    Usage {
        prompt_tokens: field("prompt_tokens"),
        completion_tokens: field("completion_tokens"),
        total_tokens: field("total_tokens"),
    }
}

fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::Length,
        "content_filter" => FinishReason::ContentFilter,
        other => FinishReason::Error(other.to_string()),
    }
}

/// OpenRouter chat completions client
///
/// Sends `POST {base_url}/chat/completions` with bearer auth and the optional
/// `HTTP-Referer` / `X-Title` attribution headers.
pub struct OpenRouterProvider {
    api_key: String,
    http_client: HttpClient,
    base_url: String,
    attribution: SiteAttribution,
}

impl OpenRouterProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http_client: HttpClient::new(),
            base_url: urls::OPENROUTER_API_BASE.to_string(),
            attribution: SiteAttribution::default(),
        }
    }

    pub fn from_config(
        api_key: String,
        base_url: Option<String>,
        attribution: SiteAttribution,
    ) -> Self {
        let mut provider = Self::new(api_key);
        if let Some(base) = base_url {
            provider.base_url = base.trim_end_matches('/').to_string();
        }
        provider.attribution = attribution;
        provider
    }

    /// Rebuild the HTTP client with a whole-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LLMError> {
        self.http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LLMError::Provider(format!("Failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    pub fn completions_url(&self) -> String {
        format!("{}{}", self.base_url, urls::CHAT_COMPLETIONS_PATH)
    }

    fn convert_to_openrouter_format(&self, request: &LLMRequest) -> Result<Value, LLMError> {
        if request.messages.is_empty() {
            return Err(LLMError::InvalidRequest("No messages provided".to_string()));
        }

        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.as_openai_str(),
                    "content": msg.content
                })
            })
            .collect();

        let mut provider_request = json!({
            "model": request.model,
            "messages": messages,
        });

        if let Some(max_tokens) = request.max_tokens {
            provider_request["max_tokens"] = json!(max_tokens);
        }

        if let Some(temperature) = request.temperature {
            provider_request["temperature"] = json!(temperature);
        }

        Ok(provider_request)
    }

    fn parse_openrouter_response(&self, response_json: Value) -> Result<LLMResponse, LLMError> {
        let choices = response_json
            .get("choices")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                LLMError::Provider("Invalid response format: missing choices".to_string())
            })?;

        let choice = choices
            .first()
            .ok_or_else(|| LLMError::Provider("No choices in response".to_string()))?;

        let message = choice.get("message").ok_or_else(|| {
            LLMError::Provider("Invalid response format: missing message".to_string())
        })?;

        let content = match message.get("content") {
            Some(Value::String(text)) => Some(text.to_string()),
            Some(Value::Array(parts)) => {
                let text = parts
                    .iter()
                    .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                    .collect::<Vec<_>>()
                    .join("");
                if text.is_empty() { None } else { Some(text) }
            }
            _ => None,
        };

        let finish_reason = choice
            .get("finish_reason")
            .and_then(|fr| fr.as_str())
            .map(map_finish_reason)
            .unwrap_or(FinishReason::Stop);

        let usage = response_json.get("usage").map(parse_usage_value);
        let model = response_json
            .get("model")
            .and_then(|m| m.as_str())
            .map(|m| m.to_string());

        Ok(LLMResponse {
            content,
            usage,
            model,
            finish_reason,
        })
    }
}

#[async_trait]
impl LLMProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn generate(&self, request: LLMRequest) -> Result<LLMResponse, LLMError> {
        self.validate_request(&request)?;
        let provider_request = self.convert_to_openrouter_format(&request)?;
        let url = self.completions_url();

        let mut builder = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&provider_request);

        if let Some(site_url) = &self.attribution.url {
            builder = builder.header(headers::HTTP_REFERER, site_url);
        }
        if let Some(site_name) = &self.attribution.name {
            builder = builder.header(headers::X_TITLE, site_name);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| LLMError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();

            match status {
                401 => return Err(LLMError::Authentication(error_text)),
                429 => return Err(LLMError::RateLimit),
                _ => {}
            }

            return Err(LLMError::Http {
                status,
                body: error_text,
            });
        }

        let openrouter_response: Value = response
            .json()
            .await
            .map_err(|e| LLMError::Provider(format!("Failed to parse response: {}", e)))?;

        self.parse_openrouter_response(openrouter_response)
    }
}
