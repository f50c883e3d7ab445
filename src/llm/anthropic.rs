use super::http::{client_with_deadline, send_json};
use super::{Message, ProviderClient, ProviderFamily, Role};
use crate::error::GenerateError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const API_VERSION: &str = "2023-06-01";
pub const MAX_TOKENS: u32 = 4096;

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: String,
    messages: Vec<ClaudeMessage<'a>>,
}

#[derive(Serialize)]
struct ClaudeMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Option<MessagesUsage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct MessagesUsage {
    input_tokens: u32,
    output_tokens: u32,
}

/// Anthropic Messages API implementation of ProviderClient.
pub struct AnthropicClient {
    api_key: String,
    model: String,
    api_base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: String, model: String, api_base_url: String) -> Self {
        AnthropicClient {
            api_key,
            model,
            api_base_url,
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.api_base_url.trim_end_matches('/'))
    }
}

/// Split a conversation into the top-level `system` field and user/assistant turns.
///
/// The Messages API has no system role, so any system turns are appended to the instruction.
fn to_wire<'a>(system: &str, messages: &'a [Message]) -> (String, Vec<ClaudeMessage<'a>>) {
    let mut system = system.to_string();
    let mut turns = Vec::with_capacity(messages.len());

    for m in messages {
        match m.role {
            Role::System => {
                system.push_str("\n\n");
                system.push_str(&m.content);
            }
            Role::User | Role::Assistant => turns.push(ClaudeMessage {
                role: m.role.as_str(),
                content: &m.content,
            }),
        }
    }

    (system, turns)
}

impl ProviderClient for AnthropicClient {
    fn family(&self) -> ProviderFamily {
        ProviderFamily::Anthropic
    }

    fn create_message(
        &self,
        system: &str,
        messages: &[Message],
        deadline: Duration,
    ) -> Result<String, GenerateError> {
        let provider = self.family().label();
        let (system, messages) = to_wire(system, messages);
        let req = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages,
        };

        log::info!("Calling {provider} model {:?}", req.model);

        let client = client_with_deadline(provider, deadline)?;
        let request = client
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&req);
        let (status, resp): (u16, MessagesResponse) = send_json(provider, deadline, request)?;

        if let Some(usage) = &resp.usage {
            log::info!(
                "Token usage: input={}, output={}",
                usage.input_tokens,
                usage.output_tokens
            );
        }

        let first = resp.content.into_iter().next();
        match first {
            Some(ContentBlock {
                text: Some(text), ..
            }) => Ok(text),
            Some(block) => Err(GenerateError::Provider {
                provider,
                status: Some(status),
                body: format!("first content block is {:?}, not text", block.kind),
            }),
            None => Err(GenerateError::Provider {
                provider,
                status: Some(status),
                body: format!("no content returned from {provider}"),
            }),
        }
    }
}
