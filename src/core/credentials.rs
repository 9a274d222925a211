//! Resolve the endpoint, model and API key for a session.
//!
//! Precedence is CLI flag, then environment, then the config file, then the
//! built-in defaults. The key has no default.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::core::config::Config;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_BASE_URL: &str = "GEMINI_BASE_URL";
pub const ENV_MODEL: &str = "GEMINI_MODEL";

const QUICK_FIXES: &[&str] = &[
    "export GEMINI_API_KEY=...           # Use environment variable",
    "chatbot set api-key <KEY>           # Store the key in the config file",
];

#[derive(Clone, Debug)]
pub struct ApiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub request_timeout: Option<Duration>,
}

#[derive(Debug)]
pub struct CredentialsError {
    message: String,
    quick_fixes: &'static [&'static str],
    exit_code: i32,
}

impl CredentialsError {
    pub fn missing_api_key() -> Self {
        Self {
            message: format!(
                "❌ No API key configured\n\nSet the {ENV_API_KEY} environment variable or store a key with 'chatbot set api-key'."
            ),
            quick_fixes: QUICK_FIXES,
            exit_code: 2,
        }
    }

    pub fn quick_fixes(&self) -> &'static [&'static str] {
        self.quick_fixes
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CredentialsError {}

pub fn resolve_api_settings(
    config: &Config,
    model_override: Option<&str>,
) -> Result<ApiSettings, CredentialsError> {
    resolve_with_env(config, model_override, |name| std::env::var(name).ok())
}

pub fn resolve_with_env<F>(
    config: &Config,
    model_override: Option<&str>,
    env: F,
) -> Result<ApiSettings, CredentialsError>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    let api_key = non_empty(env(ENV_API_KEY))
        .or_else(|| non_empty(config.api_key.clone()))
        .ok_or_else(CredentialsError::missing_api_key)?;

    let base_url = non_empty(env(ENV_BASE_URL))
        .or_else(|| non_empty(config.base_url.clone()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let model = non_empty(model_override.map(str::to_string))
        .or_else(|| non_empty(env(ENV_MODEL)))
        .or_else(|| non_empty(config.model.clone()))
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    Ok(ApiSettings {
        api_key: api_key.trim().to_string(),
        base_url,
        model,
        request_timeout: config.request_timeout_secs.map(Duration::from_secs),
    })
}
