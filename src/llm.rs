use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use ollama_rs::{
    generation::{
        chat::{request::ChatMessageRequest, ChatMessage},
        parameters::FormatType,
    },
    models::ModelOptions,
    Ollama,
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::AnalysisError,
    settings::{LlmSettings, Provider},
    synthesis::{Prompt, SynthesisAdapter},
};

const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Builds the completion provider named in the settings.
pub(crate) fn from_settings(settings: &LlmSettings) -> Result<Arc<dyn SynthesisAdapter>> {
    let adapter: Arc<dyn SynthesisAdapter> = match settings.provider {
        Provider::Groq => Arc::new(GroqModel::new(settings)?),
        Provider::Ollama => Arc::new(OllamaModel::new(settings)),
    };
    Ok(adapter)
}

/// Groq's OpenAI-compatible chat completions endpoint.
pub(crate) struct GroqModel {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [WireMessage<'a>; 2],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl GroqModel {
    pub(crate) fn new(settings: &LlmSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }

    fn request_body<'a>(&'a self, prompt: &'a Prompt) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: [
                WireMessage {
                    role: "system",
                    content: &prompt.system,
                },
                WireMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }
}

#[async_trait]
impl SynthesisAdapter for GroqModel {
    fn name(&self) -> &str {
        "groq"
    }

    fn requires_credential(&self) -> bool {
        true
    }

    async fn complete(
        &self,
        prompt: &Prompt,
        api_key: Option<&str>,
    ) -> Result<String, AnalysisError> {
        let api_key =
            api_key.ok_or_else(|| AnalysisError::Model("no API key available".to_string()))?;

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| AnalysisError::Model(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(AnalysisError::Model(describe_status(status, &detail)));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| AnalysisError::Model(format!("failed to read body: {e}")))?;
        debug!(model = %self.model, bytes = body.len(), "completion received");
        completion_text(&body)
    }
}

fn describe_status(status: StatusCode, detail: &str) -> String {
    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "authentication failed",
        StatusCode::TOO_MANY_REQUESTS => "quota exceeded",
        s if s.is_server_error() => "service unavailable",
        _ => "request rejected",
    };
    format!("{kind} ({status}): {}", detail.trim())
}

fn completion_text(body: &str) -> Result<String, AnalysisError> {
    let resp: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| AnalysisError::Model(format!("malformed completion response: {e}")))?;
    resp.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| AnalysisError::Model("completion has no content".to_string()))
}

/// A model served by a local Ollama instance.
pub(crate) struct OllamaModel {
    client: Ollama,
    model: String,
    temperature: f32,
}

impl OllamaModel {
    pub(crate) fn new(settings: &LlmSettings) -> Self {
        Self {
            client: Ollama::new(settings.ollama_host.clone(), settings.ollama_port),
            model: settings.model.clone(),
            temperature: settings.temperature,
        }
    }
}

#[async_trait]
impl SynthesisAdapter for OllamaModel {
    fn name(&self) -> &str {
        "ollama"
    }

    fn requires_credential(&self) -> bool {
        false
    }

    async fn complete(
        &self,
        prompt: &Prompt,
        _api_key: Option<&str>,
    ) -> Result<String, AnalysisError> {
        let messages = vec![
            ChatMessage::system(prompt.system.clone()),
            ChatMessage::user(prompt.user.clone()),
        ];
        let request = ChatMessageRequest::new(self.model.clone(), messages)
            .format(FormatType::Json)
            .options(ModelOptions::default().temperature(self.temperature));
        let resp = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| AnalysisError::Model(format!("ollama error: {e}")))?;
        Ok(resp.message.content)
    }
}
