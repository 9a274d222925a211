use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Keys accepted by `set`/`unset`.
pub const CONFIG_KEYS: &[&str] = &[
    "api-key",
    "base-url",
    "model",
    "theme",
    "request-timeout-secs",
];

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// API key for the generative-language endpoint
    pub api_key: Option<String>,
    /// Override for the API base URL (without the `models/...` suffix)
    pub base_url: Option<String>,
    /// Model used when neither `--model` nor `GEMINI_MODEL` is given
    pub model: Option<String>,
    /// UI theme name ("dark" or "light")
    pub theme: Option<String>,
    /// Abort a request after this many seconds
    pub request_timeout_secs: Option<u64>,
}

/// Errors that can occur when loading or changing configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// No platform configuration directory could be determined.
    NoConfigDir,

    /// Failed to read the configuration file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the configuration file as valid TOML.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// `set`/`unset` was given a key we do not know.
    UnknownKey(String),

    /// `set` was given a value the key cannot hold.
    InvalidValue { key: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "Failed to determine config directory"),
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse config at {}: {}", path.display(), source)
            }
            ConfigError::UnknownKey(key) => write!(
                f,
                "Unknown config key: {key} (expected one of: {})",
                CONFIG_KEYS.join(", ")
            ),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {key}: {value}")
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Config, Box<dyn StdError>> {
        let config_path = Self::config_path()?;
        Ok(Self::load_from_path(&config_path)?)
    }

    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigError> {
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self) -> Result<(), Box<dyn StdError>> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Write through a temp file in the same directory so a crash never
    /// leaves a half-written config behind.
    pub fn save_to_path(&self, config_path: &Path) -> Result<(), Box<dyn StdError>> {
        let parent = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());

        if let Some(dir) = parent {
            fs::create_dir_all(dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };

        temp_file.write_all(contents.as_bytes())?;
        temp_file.as_file_mut().sync_all()?;
        temp_file
            .persist(config_path)
            .map_err(|err| -> Box<dyn StdError> { Box::new(err) })?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("org", "chatbot-ai", "chatbot-ai")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        if value.is_empty() {
            return Err(invalid());
        }

        match key {
            "api-key" => self.api_key = Some(value.to_string()),
            "base-url" => self.base_url = Some(value.to_string()),
            "model" => self.model = Some(value.to_string()),
            "theme" => {
                let theme = value.to_ascii_lowercase();
                if theme != "dark" && theme != "light" {
                    return Err(invalid());
                }
                self.theme = Some(theme);
            }
            "request-timeout-secs" => {
                let secs = value.parse::<u64>().map_err(|_| invalid())?;
                if secs == 0 {
                    return Err(invalid());
                }
                self.request_timeout_secs = Some(secs);
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: &str) -> Result<(), ConfigError> {
        match key {
            "api-key" => self.api_key = None,
            "base-url" => self.base_url = None,
            "model" => self.model = None,
            "theme" => self.theme = None,
            "request-timeout-secs" => self.request_timeout_secs = None,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Human-readable dump. The API key is never printed in full.
    pub fn describe(&self) -> String {
        fn or_unset(value: Option<&str>) -> String {
            value.unwrap_or("(unset)").to_string()
        }

        let api_key = match self.api_key.as_deref() {
            Some(key) => mask_secret(key),
            None => "(unset)".to_string(),
        };
        let timeout = self
            .request_timeout_secs
            .map(|secs| secs.to_string())
            .unwrap_or_else(|| "(unset)".to_string());

        [
            "Current configuration:".to_string(),
            format!("  api-key: {api_key}"),
            format!("  base-url: {}", or_unset(self.base_url.as_deref())),
            format!("  model: {}", or_unset(self.model.as_deref())),
            format!("  theme: {}", or_unset(self.theme.as_deref())),
            format!("  request-timeout-secs: {timeout}"),
        ]
        .join("\n")
    }
}

fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{tail}")
}
