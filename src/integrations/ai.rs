//! Generative-text assistant
//!
//! Produces stream titles and descriptions from a topic, and answers
//! freeform questions, using the Gemini `generateContent` REST endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::AiSettings;

/// Assistant failures
#[derive(Debug, Error)]
pub enum AiError {
    #[error("API key not available (set `ai.api_key` or the {env_var} environment variable)")]
    MissingApiKey { env_var: String },

    #[error("describe the topic of your stream first")]
    EmptyTopic,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("AI service returned no text")]
    EmptyResponse,
}

/// Something that turns a prompt into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

/// One-click assistant actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantAction {
    Title,
    Description,
}

impl AssistantAction {
    fn prompt_prefix(&self) -> &'static str {
        match self {
            AssistantAction::Title => "Generate a short, catchy title for a live stream about...",
            AssistantAction::Description => "Generate a description for a YouTube live stream about...",
        }
    }

    /// Full prompt for a topic; an empty topic is rejected
    pub fn prompt(&self, topic: &str) -> Result<String, AiError> {
        if topic.trim().is_empty() {
            return Err(AiError::EmptyTopic);
        }
        Ok(format!("{} \"{}\"", self.prompt_prefix(), topic))
    }
}

/// Strip one wrapping quote at each end, then surrounding whitespace
pub fn clean_generated(text: &str) -> String {
    let text = text.strip_prefix('"').unwrap_or(text);
    let text = text.strip_suffix('"').unwrap_or(text);
    text.trim().to_string()
}

/// Run an assistant action and return the cleaned result
pub async fn run_action(
    generator: &dyn TextGenerator,
    action: AssistantAction,
    topic: &str,
) -> Result<String, AiError> {
    let prompt = action.prompt(topic)?;
    let raw = generator.generate(&prompt).await?;
    Ok(clean_generated(&raw))
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Gemini REST client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl GeminiClient {
    pub fn new(settings: &AiSettings) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.resolve_api_key(),
            api_key_env: settings.api_key_env.clone(),
        })
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| AiError::MissingApiKey {
            env_var: self.api_key_env.clone(),
        })?;

        info!("Sending prompt to {} ({} chars)", self.model, prompt.chars().count());

        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(self.url())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        debug!("AI response status {} ({} bytes)", status, bytes.len());

        if !status.is_success() {
            return Err(AiError::Api {
                status: status.as_u16(),
                message: error_message(&bytes),
            });
        }

        let parsed: GenerateResponse = serde_json::from_slice(&bytes).map_err(|e| AiError::Api {
            status: status.as_u16(),
            message: format!("malformed response: {}", e),
        })?;
        extract_text(parsed)
    }
}

fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).trim().to_string())
}

fn extract_text(response: GenerateResponse) -> Result<String, AiError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        Err(AiError::EmptyResponse)
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct CannedGenerator {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, AiError> {
            self.prompts.lock().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn test_clean_generated() {
        assert_eq!(clean_generated("\"Sourdough 101\""), "Sourdough 101");
        assert_eq!(clean_generated("  plain  "), "plain");
        assert_eq!(clean_generated("\"\"double\"\""), "\"double\"");
        // Trailing quote before a newline is not at the very end
        assert_eq!(clean_generated("\"  padded \"\n"), "padded \"");
    }

    #[test]
    fn test_prompt_includes_quoted_topic() {
        let prompt = AssistantAction::Title.prompt("sourdough bread").unwrap();
        assert!(prompt.starts_with("Generate a short, catchy title"));
        assert!(prompt.ends_with("\"sourdough bread\""));
    }

    #[test]
    fn test_empty_topic_rejected() {
        assert!(matches!(AssistantAction::Description.prompt("  "), Err(AiError::EmptyTopic)));
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let parsed: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(parsed).unwrap(), "Hello world");
    }

    #[test]
    fn test_extract_text_empty() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(extract_text(parsed), Err(AiError::EmptyResponse)));
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(extract_text(parsed), Err(AiError::EmptyResponse)));
    }

    #[test]
    fn test_error_message_prefers_api_message() {
        let body = br#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body), "API key not valid");
        assert_eq!(error_message(b"Bad Gateway\n"), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let settings = AiSettings {
            // Unroutable endpoint: reaching the network would be a failure of the test
            endpoint: "http://127.0.0.1:9".to_string(),
            api_key: None,
            api_key_env: "STREAM_STUDIO_TEST_UNSET_KEY_VAR".to_string(),
            ..Default::default()
        };
        let client = GeminiClient::new(&settings).unwrap();
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, AiError::MissingApiKey { .. }));
    }

    #[tokio::test]
    async fn test_run_action_cleans_output() {
        let generator = CannedGenerator {
            reply: "\"Baking Bread Live\"".to_string(),
            prompts: Mutex::new(Vec::new()),
        };
        let title = run_action(&generator, AssistantAction::Title, "bread").await.unwrap();
        assert_eq!(title, "Baking Bread Live");
        assert_eq!(generator.prompts.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_run_action_empty_topic_skips_generator() {
        let generator = CannedGenerator {
            reply: String::new(),
            prompts: Mutex::new(Vec::new()),
        };
        let result = run_action(&generator, AssistantAction::Title, "").await;
        assert!(matches!(result, Err(AiError::EmptyTopic)));
        assert!(generator.prompts.lock().is_empty());
    }
}
