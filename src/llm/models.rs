use serde::Serialize;
use std::fmt;

/// Which wire protocol and credential a model needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProviderFamily {
    OpenAi,
    Anthropic,
    DeepSeek,
}

/// Every model identifier propr knows about, with its family.
pub const SUPPORTED_MODELS: &[(&str, ProviderFamily)] = &[
    ("gpt-4o", ProviderFamily::OpenAi),
    ("gpt-4o-mini", ProviderFamily::OpenAi),
    ("gpt-4.1", ProviderFamily::OpenAi),
    ("gpt-4.1-mini", ProviderFamily::OpenAi),
    ("gpt-4.1-nano", ProviderFamily::OpenAi),
    ("o1", ProviderFamily::OpenAi),
    ("o3", ProviderFamily::OpenAi),
    ("o1-mini", ProviderFamily::OpenAi),
    ("o3-mini", ProviderFamily::OpenAi),
    ("o4-mini", ProviderFamily::OpenAi),
    ("claude-3-7-sonnet-latest", ProviderFamily::Anthropic),
    ("claude-3-5-sonnet-latest", ProviderFamily::Anthropic),
    ("claude-3-5-haiku-latest", ProviderFamily::Anthropic),
    ("deepseek-chat", ProviderFamily::DeepSeek),
    ("deepseek-reasoner", ProviderFamily::DeepSeek),
];

impl ProviderFamily {
    /// Family of a model identifier. Unknown identifiers are treated as OpenAI models.
    pub fn of(model: &str) -> Self {
        SUPPORTED_MODELS
            .iter()
            .find(|(name, _)| *name == model)
            .map(|(_, family)| *family)
            .unwrap_or(ProviderFamily::OpenAi)
    }

    /// Environment variable holding this family's API key.
    pub fn credential_var(&self) -> &'static str {
        match self {
            ProviderFamily::OpenAi => "OPENAI_API_KEY",
            ProviderFamily::Anthropic => "ANTHROPIC_API_KEY",
            ProviderFamily::DeepSeek => "DEEPSEEK_API_KEY",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProviderFamily::OpenAi => "OpenAI",
            ProviderFamily::Anthropic => "Anthropic",
            ProviderFamily::DeepSeek => "DeepSeek",
        }
    }
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}
