use super::http::{client_with_deadline, send_json};
use super::{Message, ProviderClient, ProviderFamily};
use crate::error::GenerateError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Minimal request/response structs for the Chat Completions API.
#[derive(Serialize)]
pub(super) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
pub(super) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Resolve the chat completions URL, tolerating bases with or without `/v1`.
pub(super) fn chat_url(api_base_url: &str) -> String {
    let base = api_base_url.trim_end_matches('/');
    if base.ends_with("/v1") {
        format!("{base}/chat/completions")
    } else {
        format!("{base}/v1/chat/completions")
    }
}

/// POST a chat completion and return the first choice's content.
///
/// Shared by every Chat Completions compatible provider.
pub(super) fn call_chat(
    provider: &'static str,
    url: &str,
    api_key: &str,
    req: &ChatRequest<'_>,
    deadline: Duration,
) -> Result<String, GenerateError> {
    log::info!("Calling {provider} model {:?}", req.model);

    let client = client_with_deadline(provider, deadline)?;
    let request = client.post(url).bearer_auth(api_key).json(req);
    let (status, chat_resp): (u16, ChatResponse) = send_json(provider, deadline, request)?;

    if let Some(usage) = &chat_resp.usage {
        log::info!(
            "Token usage: prompt={}, completion={}, total={}",
            usage.prompt_tokens,
            usage.completion_tokens,
            usage.total_tokens
        );
    }

    chat_resp
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| GenerateError::Provider {
            provider,
            status: Some(status),
            body: format!("no choices returned from {provider}"),
        })
}

/// OpenAI-compatible implementation of ProviderClient.
pub struct OpenAiClient {
    api_key: String,
    model: String,
    api_base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String, api_base_url: String) -> Self {
        OpenAiClient {
            api_key,
            model,
            api_base_url,
        }
    }
}

impl ProviderClient for OpenAiClient {
    fn family(&self) -> ProviderFamily {
        ProviderFamily::OpenAi
    }

    fn create_message(
        &self,
        system: &str,
        messages: &[Message],
        deadline: Duration,
    ) -> Result<String, GenerateError> {
        // The system instruction travels as the first message.
        let mut wire = Vec::with_capacity(messages.len() + 1);
        wire.push(ChatMessage {
            role: "system",
            content: system,
        });
        wire.extend(messages.iter().map(|m| ChatMessage {
            role: m.role.as_str(),
            content: &m.content,
        }));

        let req = ChatRequest {
            model: &self.model,
            messages: wire,
        };

        call_chat(
            self.family().label(),
            &chat_url(&self.api_base_url),
            &self.api_key,
            &req,
            deadline,
        )
    }
}
