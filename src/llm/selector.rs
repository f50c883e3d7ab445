use super::anthropic::{self, AnthropicClient};
use super::deepseek::{self, DeepSeekClient};
use super::openai::{self, OpenAiClient};
use super::{ProviderClient, ProviderFamily};
use crate::error::GenerateError;
use serde::{Deserialize, Serialize};
use std::env;

/// Where API keys come from.
pub trait CredentialSource {
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads API keys from the process environment at call time. Blank values count as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn get(&self, name: &str) -> Option<String> {
        env::var(name).ok().filter(|v| !v.trim().is_empty())
    }
}

/// Base URLs for each provider family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub openai: String,
    pub anthropic: String,
    pub deepseek: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            openai: openai::DEFAULT_BASE_URL.to_string(),
            anthropic: anthropic::DEFAULT_BASE_URL.to_string(),
            deepseek: deepseek::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Chooses and builds the client for a model identifier.
pub trait ProviderSelector {
    /// Fail with a `Configuration` error if `model` cannot be served.
    /// Must not touch the network.
    fn check_credentials(&self, _model: &str) -> Result<(), GenerateError> {
        Ok(())
    }

    fn select(&self, model: &str) -> Result<Box<dyn ProviderClient>, GenerateError>;
}

/// Dispatches on the model's family and requires that family's API key to be set.
pub struct EnvProviderSelector<C = EnvCredentials> {
    credentials: C,
    endpoints: Endpoints,
}

impl EnvProviderSelector<EnvCredentials> {
    pub fn new(endpoints: Endpoints) -> Self {
        EnvProviderSelector {
            credentials: EnvCredentials,
            endpoints,
        }
    }
}

impl<C: CredentialSource> EnvProviderSelector<C> {
    pub fn with_credentials(credentials: C, endpoints: Endpoints) -> Self {
        EnvProviderSelector {
            credentials,
            endpoints,
        }
    }
}

impl<C: CredentialSource> EnvProviderSelector<C> {
    fn api_key(&self, family: ProviderFamily) -> Result<String, GenerateError> {
        let var = family.credential_var();
        self.credentials
            .get(var)
            .ok_or_else(|| GenerateError::configuration(format!("{var} is not set")))
    }
}

impl<C: CredentialSource> ProviderSelector for EnvProviderSelector<C> {
    fn check_credentials(&self, model: &str) -> Result<(), GenerateError> {
        self.api_key(ProviderFamily::of(model)).map(|_| ())
    }

    fn select(&self, model: &str) -> Result<Box<dyn ProviderClient>, GenerateError> {
        let family = ProviderFamily::of(model);
        let api_key = self.api_key(family)?;

        log::debug!("Client initialized for model {model} ({family})");

        let model = model.to_string();
        let client: Box<dyn ProviderClient> = match family {
            ProviderFamily::Anthropic => Box::new(AnthropicClient::new(
                api_key,
                model,
                self.endpoints.anthropic.clone(),
            )),
            ProviderFamily::DeepSeek => Box::new(DeepSeekClient::new(
                api_key,
                model,
                self.endpoints.deepseek.clone(),
            )),
            ProviderFamily::OpenAi => Box::new(OpenAiClient::new(
                api_key,
                model,
                self.endpoints.openai.clone(),
            )),
        };

        Ok(client)
    }
}
