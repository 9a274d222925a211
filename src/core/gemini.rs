use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::api::{Content, GenerateContentRequest, GenerateContentResponse};
use crate::core::credentials::ApiSettings;
use crate::utils::url::construct_api_url;

/// Failure of a single `generateContent` call.
#[derive(Debug)]
pub enum GenerateError {
    /// The request never produced a response (connect, TLS, timeout).
    Transport(reqwest::Error),

    /// The server answered with a non-success status.
    Status { status: u16, body: String },

    /// The body was not the JSON shape we expect.
    Decode(serde_json::Error),
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::Transport(err) => write!(f, "request failed: {err}"),
            GenerateError::Status { status, body } => {
                let body = body.split_whitespace().collect::<Vec<_>>().join(" ");
                if body.is_empty() {
                    write!(f, "API returned status {status}")
                } else {
                    write!(f, "API returned status {status}: {body}")
                }
            }
            GenerateError::Decode(err) => write!(f, "malformed response body: {err}"),
        }
    }
}

impl StdError for GenerateError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            GenerateError::Transport(err) => Some(err),
            GenerateError::Status { .. } => None,
            GenerateError::Decode(err) => Some(err),
        }
    }
}

/// Thin client for the `models/{model}:generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout: Option<Duration>,
}

impl GeminiClient {
    pub fn new(client: Client, settings: &ApiSettings) -> Self {
        Self {
            client,
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
            timeout: settings.request_timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Endpoint URL without the key, safe to log or display.
    pub fn endpoint(&self) -> String {
        construct_api_url(
            &self.base_url,
            &format!("models/{}:generateContent", self.model),
        )
    }

    pub async fn generate(
        &self,
        contents: Vec<Content>,
    ) -> Result<GenerateContentResponse, GenerateError> {
        let endpoint = self.endpoint();
        debug!(endpoint = %endpoint, turns = contents.len(), "dispatching generateContent");

        let mut request = self
            .client
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&GenerateContentRequest { contents });
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(GenerateError::Transport)?;
        let status = response.status();
        let body = response.text().await.map_err(GenerateError::Transport)?;

        if !status.is_success() {
            return Err(GenerateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), bytes = body.len(), "generateContent answered");
        serde_json::from_str(&body).map_err(GenerateError::Decode)
    }
}
