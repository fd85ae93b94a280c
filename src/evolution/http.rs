//! HTTP transport for Evolution API calls

use crate::error::{Error, TransportError};
use crate::node::host::Transport;
use crate::node::request::{HttpMethod, RequestDescriptor};
use anyhow::Context;
use reqwest::Client;
use serde_json::Value;
use std::future::Future;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and drops control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.chars().count() > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// reqwest-backed [`Transport`]
#[derive(Clone)]
pub struct EvolutionHttpClient {
    client: Client,
}

impl EvolutionHttpClient {
    /// Create a new HTTP client
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("evonode/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Send a request and decode the JSON response
    pub async fn send(&self, descriptor: &RequestDescriptor) -> Result<Value, TransportError> {
        tracing::debug!("{} {}", descriptor.method, descriptor.url);

        let method = match descriptor.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut request = self.client.request(method, &descriptor.url);
        for (name, value) in &descriptor.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &descriptor.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            // Only log sanitized/truncated error body
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // Handle empty response
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

impl Transport for EvolutionHttpClient {
    fn request(
        &self,
        descriptor: &RequestDescriptor,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send {
        self.send(descriptor)
    }
}

/// Format an evonode error for display
/// Avoids echoing raw API bodies back to the user
pub fn format_api_error(error: &Error) -> String {
    let Error::Transport { source, .. } = error else {
        return error.to_string();
    };

    match source.status() {
        Some(401) => "Authentication failed. Check the API key.".to_string(),
        Some(403) => "Permission denied for this API key.".to_string(),
        Some(404) => "Resource not found. Check the instance name.".to_string(),
        Some(400) => "Invalid request. Check your parameters.".to_string(),
        Some(409) => "Conflict. The instance may already exist.".to_string(),
        Some(429) => "Rate limit exceeded. Please try again later.".to_string(),
        Some(status) if status >= 500 => {
            "Evolution API temporarily unavailable. Please try again.".to_string()
        }
        Some(status) => format!("Request failed with status {}.", status),
        None => match source {
            TransportError::Decode(_) => "The server returned invalid JSON.".to_string(),
            _ => "Request failed. Check your network connection and try again.".to_string(),
        },
    }
}
