use crate::error::GenerateError;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Build a blocking client whose whole request, body included, must finish within `deadline`.
pub(crate) fn client_with_deadline(
    provider: &'static str,
    deadline: Duration,
) -> Result<Client, GenerateError> {
    Client::builder().timeout(deadline).build().map_err(|e| {
        GenerateError::configuration(format!("failed to build HTTP client for {provider}: {e}"))
    })
}

fn transport_error(provider: &'static str, deadline: Duration, err: reqwest::Error) -> GenerateError {
    if err.is_timeout() {
        return GenerateError::DeadlineExceeded { provider, deadline };
    }

    GenerateError::Provider {
        provider,
        status: err.status().map(|s| s.as_u16()),
        body: err.to_string(),
    }
}

/// Send the request once and decode a successful JSON response, returning it with its status.
///
/// Non-2xx answers become `Provider` errors carrying the status and raw body.
/// Nothing is retried.
pub(crate) fn send_json<T: DeserializeOwned>(
    provider: &'static str,
    deadline: Duration,
    request: RequestBuilder,
) -> Result<(u16, T), GenerateError> {
    let resp = request
        .send()
        .map_err(|e| transport_error(provider, deadline, e))?;

    let status = resp.status();
    let text = resp
        .text()
        .map_err(|e| transport_error(provider, deadline, e))?;

    if !status.is_success() {
        return Err(GenerateError::Provider {
            provider,
            status: Some(status.as_u16()),
            body: text,
        });
    }

    log::trace!("{provider} raw JSON response: {text}");

    let parsed = serde_json::from_str(&text).map_err(|e| GenerateError::Provider {
        provider,
        status: Some(status.as_u16()),
        body: format!("failed to parse {provider} response: {e}"),
    })?;

    Ok((status.as_u16(), parsed))
}
