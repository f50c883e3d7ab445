use super::openai::{call_chat, chat_url, ChatMessage, ChatRequest};
use super::{Message, ProviderClient, ProviderFamily};
use crate::error::GenerateError;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";

/// DeepSeek speaks the Chat Completions dialect on its own host.
pub struct DeepSeekClient {
    api_key: String,
    model: String,
    api_base_url: String,
}

impl DeepSeekClient {
    pub fn new(api_key: String, model: String, api_base_url: String) -> Self {
        DeepSeekClient {
            api_key,
            model,
            api_base_url,
        }
    }
}

impl ProviderClient for DeepSeekClient {
    fn family(&self) -> ProviderFamily {
        ProviderFamily::DeepSeek
    }

    fn create_message(
        &self,
        system: &str,
        messages: &[Message],
        deadline: Duration,
    ) -> Result<String, GenerateError> {
        let wire = std::iter::once(ChatMessage {
            role: "system",
            content: system,
        })
        .chain(messages.iter().map(|m| ChatMessage {
            role: m.role.as_str(),
            content: &m.content,
        }))
        .collect();

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
