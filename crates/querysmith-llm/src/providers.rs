//! Provider registry and HTTP completion adapter
//!
//! Each provider is a row in a dispatch table: a static descriptor plus a pair
//! of functions that shape the outgoing request and pull the text out of the
//! response body. Adding a provider means adding a row, not a type.
//!
//! # Examples
//!
//! ```no_run
//! use querysmith_domain::{CompletionConfig, CompletionService, ProviderKind};
//! use querysmith_llm::HttpCompletionService;
//!
//! # async fn run() -> Result<(), querysmith_llm::LlmError> {
//! let service = HttpCompletionService::new()?;
//! let config = CompletionConfig {
//!     provider: ProviderKind::Ollama,
//!     model: "llama2".to_string(),
//!     ..CompletionConfig::default()
//! };
//! let text = service.complete("Say hello", None, &config).await?;
//! # Ok(())
//! # }
//! ```

use crate::LlmError;
use async_trait::async_trait;
use querysmith_domain::{CompletionConfig, CompletionService, ProviderKind};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Anthropic API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// How a provider authenticates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// API key in a header or query parameter
    ApiKey,
    /// Bearer token
    BearerToken,
    /// No authentication
    None,
}

/// Published request limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimits {
    /// Requests per minute, 0 when unlimited
    pub requests_per_minute: u32,
    /// Tokens per minute, 0 when unlimited
    pub tokens_per_minute: u32,
}

/// Static description of a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDescriptor {
    /// Wire identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Known models
    pub models: &'static [&'static str],
    /// Base API endpoint
    pub api_endpoint: &'static str,
    /// Authentication scheme
    pub auth_type: AuthType,
    /// Rate limits
    pub rate_limits: RateLimits,
    /// Optional capabilities
    pub supported_features: &'static [&'static str],
}

/// A request ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedRequest {
    /// Full URL
    pub url: String,
    /// Extra headers
    pub headers: Vec<(&'static str, String)>,
    /// JSON body
    pub body: Value,
}

type BuildFn = fn(&ProviderDescriptor, &CompletionConfig, &str, Option<&str>) -> Result<ShapedRequest, LlmError>;
type ExtractFn = fn(&Value) -> Option<String>;

struct ProviderEntry {
    descriptor: ProviderDescriptor,
    build: BuildFn,
    extract: ExtractFn,
}

static PROVIDERS: [ProviderEntry; 4] = [
    ProviderEntry {
        descriptor: ProviderDescriptor {
            id: "gemini",
            name: "Google Gemini",
            models: &["gemini-1.5-pro-latest", "gemini-1.5-flash-latest"],
            api_endpoint: "https://generativelanguage.googleapis.com/v1beta",
            auth_type: AuthType::ApiKey,
            rate_limits: RateLimits {
                requests_per_minute: 60,
                tokens_per_minute: 1_000_000,
            },
            supported_features: &["system_prompt", "json_output"],
        },
        build: build_gemini,
        extract: extract_gemini,
    },
    ProviderEntry {
        descriptor: ProviderDescriptor {
            id: "openai",
            name: "OpenAI GPT",
            models: &["gpt-4", "gpt-3.5-turbo"],
            api_endpoint: "https://api.openai.com/v1",
            auth_type: AuthType::BearerToken,
            rate_limits: RateLimits {
                requests_per_minute: 200,
                tokens_per_minute: 150_000,
            },
            supported_features: &["system_prompt", "json_output", "function_calling"],
        },
        build: build_openai,
        extract: extract_openai,
    },
    ProviderEntry {
        descriptor: ProviderDescriptor {
            id: "anthropic",
            name: "Anthropic Claude",
            models: &["claude-3-opus-20240229", "claude-3-sonnet-20240229"],
            api_endpoint: "https://api.anthropic.com/v1",
            auth_type: AuthType::ApiKey,
            rate_limits: RateLimits {
                requests_per_minute: 100,
                tokens_per_minute: 200_000,
            },
            supported_features: &["system_prompt"],
        },
        build: build_anthropic,
        extract: extract_anthropic,
    },
    ProviderEntry {
        descriptor: ProviderDescriptor {
            id: "ollama",
            name: "Ollama (Local)",
            models: &["llama2", "mistral"],
            api_endpoint: "http://localhost:11434/api",
            auth_type: AuthType::None,
            rate_limits: RateLimits {
                requests_per_minute: 0,
                tokens_per_minute: 0,
            },
            supported_features: &["system_prompt"],
        },
        build: build_ollama,
        extract: extract_ollama,
    },
];

fn entry(kind: ProviderKind) -> &'static ProviderEntry {
    match kind {
        ProviderKind::Gemini => &PROVIDERS[0],
        ProviderKind::OpenAi => &PROVIDERS[1],
        ProviderKind::Anthropic => &PROVIDERS[2],
        ProviderKind::Ollama => &PROVIDERS[3],
    }
}

/// Static descriptor of a provider
pub fn descriptor(kind: ProviderKind) -> &'static ProviderDescriptor {
    &entry(kind).descriptor
}

/// Descriptors of every supported provider
pub fn descriptors() -> impl Iterator<Item = &'static ProviderDescriptor> {
    PROVIDERS.iter().map(|e| &e.descriptor)
}

/// Shape the HTTP request for a completion
pub fn shape_request(
    config: &CompletionConfig,
    prompt: &str,
    system_prompt: Option<&str>,
) -> Result<ShapedRequest, LlmError> {
    let entry = entry(config.provider);
    (entry.build)(&entry.descriptor, config, prompt, system_prompt)
}

/// Pull the completion text out of a provider response body
pub fn extract_content(kind: ProviderKind, body: &Value) -> Result<String, LlmError> {
    (entry(kind).extract)(body).ok_or_else(|| {
        LlmError::InvalidResponse(format!("Invalid response format from {} API", kind))
    })
}

fn endpoint<'a>(descriptor: &'a ProviderDescriptor, config: &'a CompletionConfig) -> &'a str {
    config
        .base_url
        .as_deref()
        .unwrap_or(descriptor.api_endpoint)
        .trim_end_matches('/')
}

fn api_key(descriptor: &ProviderDescriptor, config: &CompletionConfig) -> Result<String, LlmError> {
    config
        .api_key
        .clone()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| LlmError::MissingApiKey(descriptor.id.to_string()))
}

fn inline_system(prompt: &str, system_prompt: Option<&str>) -> String {
    match system_prompt {
        Some(system) => format!("{}\n\nUser: {}", system, prompt),
        None => prompt.to_string(),
    }
}

fn build_gemini(
    descriptor: &ProviderDescriptor,
    config: &CompletionConfig,
    prompt: &str,
    system_prompt: Option<&str>,
) -> Result<ShapedRequest, LlmError> {
    let key = api_key(descriptor, config)?;
    Ok(ShapedRequest {
        url: format!(
            "{}/models/{}:generateContent?key={}",
            endpoint(descriptor, config),
            config.model,
            key
        ),
        headers: Vec::new(),
        body: json!({
            "contents": [{"parts": [{"text": inline_system(prompt, system_prompt)}]}],
            "generationConfig": {
                "temperature": config.temperature,
                "maxOutputTokens": config.max_tokens
            }
        }),
    })
}

fn extract_gemini(body: &Value) -> Option<String> {
    body.pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn build_openai(
    descriptor: &ProviderDescriptor,
    config: &CompletionConfig,
    prompt: &str,
    system_prompt: Option<&str>,
) -> Result<ShapedRequest, LlmError> {
    let key = api_key(descriptor, config)?;
    let mut messages = Vec::new();
    if let Some(system) = system_prompt {
        messages.push(json!({"role": "system", "content": system}));
    }
    messages.push(json!({"role": "user", "content": prompt}));

    Ok(ShapedRequest {
        url: format!("{}/chat/completions", endpoint(descriptor, config)),
        headers: vec![("Authorization", format!("Bearer {}", key))],
        body: json!({
            "model": config.model,
            "messages": messages,
            "temperature": config.temperature,
            "max_tokens": config.max_tokens
        }),
    })
}

fn extract_openai(body: &Value) -> Option<String> {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn build_anthropic(
    descriptor: &ProviderDescriptor,
    config: &CompletionConfig,
    prompt: &str,
    system_prompt: Option<&str>,
) -> Result<ShapedRequest, LlmError> {
    let key = api_key(descriptor, config)?;
    let mut body = json!({
        "model": config.model,
        "max_tokens": config.max_tokens,
        "temperature": config.temperature,
        "messages": [{"role": "user", "content": prompt}]
    });
    if let Some(system) = system_prompt {
        body["system"] = Value::String(system.to_string());
    }

    Ok(ShapedRequest {
        url: format!("{}/messages", endpoint(descriptor, config)),
        headers: vec![
            ("x-api-key", key),
            ("anthropic-version", ANTHROPIC_VERSION.to_string()),
        ],
        body,
    })
}

fn extract_anthropic(body: &Value) -> Option<String> {
    body.pointer("/content/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn build_ollama(
    _descriptor: &ProviderDescriptor,
    config: &CompletionConfig,
    prompt: &str,
    system_prompt: Option<&str>,
) -> Result<ShapedRequest, LlmError> {
    let base = config
        .base_url
        .as_deref()
        .unwrap_or(DEFAULT_OLLAMA_URL)
        .trim_end_matches('/');

    Ok(ShapedRequest {
        url: format!("{}/api/generate", base),
        headers: Vec::new(),
        body: json!({
            "model": config.model,
            "prompt": inline_system(prompt, system_prompt),
            "stream": false,
            "options": {
                "temperature": config.temperature,
                "num_predict": config.max_tokens
            }
        }),
    })
}

fn extract_ollama(body: &Value) -> Option<String> {
    body.get("response").and_then(Value::as_str).map(str::to_string)
}

/// Completion service that talks to the configured provider over HTTP
///
/// Makes exactly one request per call; wrap calls in
/// [`complete_with_retry`](crate::complete_with_retry) for timeouts and retries.
#[derive(Debug, Clone)]
pub struct HttpCompletionService {
    client: reqwest::Client,
}

impl HttpCompletionService {
    /// Create a service with a fresh HTTP client
    pub fn new() -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("querysmith/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Create a service around an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Send a probe prompt and report whether the model answered "OK"
    pub async fn check_connection(&self, config: &CompletionConfig) -> bool {
        match self
            .complete("Test connection", Some("Respond with \"OK\""), config)
            .await
        {
            Ok(text) => text.trim() == "OK",
            Err(e) => {
                warn!("Connection test failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl CompletionService for HttpCompletionService {
    type Error = LlmError;

    async fn complete(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        config: &CompletionConfig,
    ) -> Result<String, Self::Error> {
        let shaped = shape_request(config, prompt, system_prompt)?;
        debug!("POST {} ({})", redact(&shaped.url), config.provider);

        let mut request = self
            .client
            .post(&shaped.url)
            .timeout(config.timeout())
            .json(&shaped.body);
        for (name, value) in &shaped.headers {
            request = request.header(*name, value);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND && config.provider == ProviderKind::Ollama {
            return Err(LlmError::ModelNotAvailable(config.model.clone()));
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Provider {
                provider: config.provider.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        extract_content(config.provider, &body)
    }
}

fn redact(url: &str) -> &str {
    url.split_once("?key=").map(|(head, _)| head).unwrap_or(url)
}
