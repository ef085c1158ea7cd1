/// LLM Client — the single point of entry for all OpenAI API calls.
///
/// ARCHITECTURAL RULE: No other module may call the OpenAI API directly.
/// All LLM interactions MUST go through this module.
///
/// Every structured call is a single attempt: there is no retry, no backoff
/// and no partial-result salvage. The first failure is terminal for that
/// call and is absorbed by the calling specialization.
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod embeddings;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// The completion capability: given a prompt and a system instruction that
/// fixes the output shape, return the provider's raw text or fail.
///
/// `LlmClient` is the production implementation; tests inject fakes.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

/// The single LLM client used by all services.
/// Wraps the OpenAI Chat Completions and Embeddings APIs.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
    embedding_model: String,
}

impl LlmClient {
    pub fn new(api_key: String, model: String, embedding_model: String) -> Self {
        Self {
            // The 120s client timeout is the only timeout in play; the
            // adapter itself enforces none and inherits this one.
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            model,
            embedding_model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a single call to the Chat Completions API and returns the
    /// assistant text. JSON-mode output is requested; the system prompt
    /// must describe the expected shape.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Prefer the provider's error message when the body parses
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response.json().await?;

        debug!(
            "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
            chat_response.usage.prompt_tokens, chat_response.usage.completion_tokens
        );

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

#[async_trait]
impl Completion for LlmClient {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        self.call(prompt, system).await
    }
}

/// The structured generation adapter: invokes the completion capability and
/// parses the fence-stripped response into the target schema.
///
/// Success returns the provider's value field-by-field; any transport, API
/// or schema-validation failure surfaces as `LlmError` and nothing else.
pub async fn call_json<T: DeserializeOwned>(
    llm: &dyn Completion,
    prompt: &str,
    system: &str,
) -> Result<T, LlmError> {
    let text = llm.complete(prompt, system).await?;

    // Strip markdown code fences if the model wraps JSON in them
    let text = strip_json_fences(&text);

    serde_json::from_str(text).map_err(LlmError::Parse)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        name: String,
        count: u32,
    }

    struct CannedCompletion(&'static str);

    #[async_trait]
    impl Completion for CannedCompletion {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingCompletion;

    #[async_trait]
    impl Completion for FailingCompletion {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 503,
                message: "overloaded".to_string(),
            })
        }
    }

    #[test]
    fn strip_json_fences_removes_tagged_fence() {
        let input = "```json\n{\"name\": \"rust\", \"count\": 3}\n```";
        assert_eq!(strip_json_fences(input), "{\"name\": \"rust\", \"count\": 3}");
    }

    #[test]
    fn strip_json_fences_removes_bare_fence() {
        let input = "```\n[1, 2, 3]\n```";
        assert_eq!(strip_json_fences(input), "[1, 2, 3]");
    }

    #[test]
    fn strip_json_fences_passes_plain_json_through() {
        assert_eq!(strip_json_fences("{\"ok\": true}"), "{\"ok\": true}");
    }

    #[test]
    fn strip_json_fences_trims_surrounding_whitespace() {
        assert_eq!(strip_json_fences("  {\"ok\": true}\n"), "{\"ok\": true}");
    }

    #[tokio::test]
    async fn call_json_returns_conforming_value_untransformed() {
        let llm = CannedCompletion(r#"{"name": "sql", "count": 7}"#);
        let probe: Probe = call_json(&llm, "prompt", "system").await.unwrap();
        assert_eq!(
            probe,
            Probe {
                name: "sql".to_string(),
                count: 7
            }
        );
    }

    #[tokio::test]
    async fn call_json_parses_fenced_output() {
        let llm = CannedCompletion("```json\n{\"name\": \"go\", \"count\": 1}\n```");
        let probe: Probe = call_json(&llm, "prompt", "system").await.unwrap();
        assert_eq!(probe.name, "go");
    }

    #[tokio::test]
    async fn call_json_propagates_provider_errors() {
        let result: Result<Probe, _> = call_json(&FailingCompletion, "prompt", "system").await;
        assert!(matches!(result, Err(LlmError::Api { status: 503, .. })));
    }

    #[tokio::test]
    async fn call_json_rejects_nonconforming_output() {
        let llm = CannedCompletion(r#"{"name": "sql"}"#);
        let result: Result<Probe, _> = call_json(&llm, "prompt", "system").await;
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }

    #[tokio::test]
    async fn call_json_rejects_non_json_output() {
        let llm = CannedCompletion("Sorry, I cannot help with that.");
        let result: Result<Probe, _> = call_json(&llm, "prompt", "system").await;
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }
}
