use crate::types::{AggregatorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info};

/// The drafting side only needs prompt in, text out.
pub use crate::types::CompletionModel as LlmAdapter;

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 2000;

/// Mock LLM adapter for development and testing.
///
/// Replies with queued canned responses in order, then falls back to an echo
/// of the prompt's first line. Every prompt it sees is recorded.
pub struct MockLlmAdapter {
    name: String,
    response_delay_ms: u64,
    responses: Mutex<VecDeque<String>>,
    fail_marker: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmAdapter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response_delay_ms: 0,
            responses: Mutex::new(VecDeque::new()),
            fail_marker: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.response_delay_ms = delay_ms;
        self
    }

    pub fn with_responses<I, S>(self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Ok(mut queue) = self.responses.lock() {
            queue.extend(responses.into_iter().map(Into::into));
        }
        self
    }

    /// Fail any prompt containing `marker`.
    pub fn failing_on(mut self, marker: impl Into<String>) -> Self {
        self.fail_marker = Some(marker.into());
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    async fn simulate_processing(&self) {
        if self.response_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.response_delay_ms)).await;
        }
    }
}

#[async_trait]
impl LlmAdapter for MockLlmAdapter {
    fn model_name(&self) -> String {
        format!("Mock LLM Adapter ({})", self.name)
    }

    async fn complete(&self, prompt: &str, _system_prompt: Option<&str>) -> anyhow::Result<String> {
        self.simulate_processing().await;

        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if let Some(marker) = &self.fail_marker {
            if prompt.contains(marker.as_str()) {
                anyhow::bail!("mock adapter {} refused prompt", self.name);
            }
        }

        let canned = self.responses.lock().ok().and_then(|mut q| q.pop_front());
        Ok(canned.unwrap_or_else(|| {
            let first_line = prompt.lines().find(|l| !l.trim().is_empty()).unwrap_or_default();
            format!("[{}] {}", self.name, first_line.trim())
        }))
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Anthropic Messages API over reqwest.
pub struct AnthropicAdapter {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl AnthropicAdapter {
    pub fn new(api_key: impl Into<String>, model: Option<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(120)).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
            endpoint: ANTHROPIC_API_URL.to_string(),
        })
    }

    /// Point at a different Messages endpoint, e.g. a local proxy.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn send(&self, prompt: &str, system_prompt: Option<&str>) -> Result<String> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: system_prompt,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!("Sending {} char prompt to {}", prompt.chars().count(), self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AggregatorError::Llm(format!("{} returned {}: {}", self.model, status, body)));
        }

        let parsed: MessagesResponse = response.json().await?;
        let text = parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .unwrap_or_default();

        info!("Received {} chars from {}", text.chars().count(), self.model);
        Ok(text)
    }
}

#[async_trait]
impl LlmAdapter for AnthropicAdapter {
    fn model_name(&self) -> String {
        self.model.clone()
    }

    async fn complete(&self, prompt: &str, system_prompt: Option<&str>) -> anyhow::Result<String> {
        Ok(self.send(prompt, system_prompt).await?)
    }
}
