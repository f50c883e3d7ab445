pub mod anthropic;
pub mod conversation;
pub mod deepseek;
mod http;
pub mod models;
pub mod openai;
pub mod prompts;
pub mod selector;
#[cfg(test)]
mod test_support;

pub use models::{ProviderFamily, SUPPORTED_MODELS};
pub use selector::{CredentialSource, EnvCredentials, EnvProviderSelector, ProviderSelector};

use crate::error::GenerateError;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Who authored a turn in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn of a conversation sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A remote completion endpoint: submit once, receive one complete string back.
pub trait ProviderClient: Send + Sync {
    /// Which provider family this client talks to.
    fn family(&self) -> ProviderFamily;

    /// Send the system instruction and conversation, failing if no answer arrives within `deadline`.
    fn create_message(
        &self,
        system: &str,
        messages: &[Message],
        deadline: Duration,
    ) -> Result<String, GenerateError>;
}

/// Truncate long strings for debug logging.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }

    let mut cut = max_len;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...\n[truncated {} chars]", &s[..cut], s.len() - cut)
}
