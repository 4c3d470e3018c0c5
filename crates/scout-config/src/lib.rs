//! Configuration loading for Scout.
//! Reads scout.toml from the current directory or the path in SCOUT_CONFIG,
//! then applies environment overrides. The file is optional; the API key is not.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("No API key configured for the chat-completion provider (set OPENAI_API_KEY or llm.api_key)")]
    MissingApiKey,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory with a built front-end to serve at `/`.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_bind()             -> String { "127.0.0.1:3001".to_string() }
fn default_max_upload_bytes() -> usize  { 10 * 1024 * 1024 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            static_dir: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,
}

fn default_llm_base_url() -> String { "https://api.openai.com".to_string() }
fn default_llm_model()    -> String { "gpt-4".to_string() }
fn default_max_tokens()   -> u32    { 60 }
fn default_temperature()  -> f32    { 0.7 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: None,
            api_key: None,
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// `local`, `hosted`, or an absolute http(s) URL.
    #[serde(default = "default_upstream")]
    pub upstream: String,
}

fn default_upstream() -> String { "hosted".to_string() }

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { upstream: default_upstream() }
    }
}

/// Config file read when SCOUT_CONFIG is unset, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "scout.toml";

mod tests;

impl Config {
    /// Load configuration from scout.toml plus the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load with an explicit variable lookup.
    ///
    /// A path given in SCOUT_CONFIG must exist; the default scout.toml may be
    /// absent, in which case the built-in defaults apply. Overrides from
    /// `lookup` are applied on top and the result is validated.
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = lookup("SCOUT_CONFIG").filter(|p| !p.trim().is_empty());
        let path = explicit.clone().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|source| ConfigError::Io { path: path.clone(), source })?;
            tracing::info!(path = %path, "loaded config file");
            Self::from_toml_str(&content)?
        } else if explicit.is_some() {
            return Err(ConfigError::NotFound(path));
        } else {
            tracing::info!("no {DEFAULT_CONFIG_PATH} found, using defaults");
            Config::default()
        };

        config.apply_env(&lookup);
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides. `lookup` returns the value of a variable.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.llm.api_key = Some(SecretString::from(key));
        }
        if let Some(bind) = lookup("SCOUT_BIND") {
            tracing::debug!(bind = %bind, "SCOUT_BIND override");
            self.server.bind = bind;
        }
        if let Some(upstream) = lookup("SCOUT_CLASSIFIER") {
            tracing::debug!(upstream = %upstream, "SCOUT_CLASSIFIER override");
            self.classifier.upstream = upstream;
        }
        if let Some(base_url) = lookup("SCOUT_LLM_BASE_URL") {
            self.llm.base_url = base_url;
        }
        if let Some(model) = lookup("SCOUT_LLM_MODEL") {
            self.llm.model = model;
        }
    }

    /// Fail fast on anything that would only surface later as an upstream error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_key()?;
        self.bind_addr()?;
        if self.llm.max_tokens == 0 {
            return Err(ConfigError::Invalid("llm.max_tokens must be greater than 0".into()));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid(format!(
                "llm.temperature must be within 0.0..=2.0, got {}",
                self.llm.temperature
            )));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid("server.max_upload_bytes must be greater than 0".into()));
        }
        Ok(())
    }

    pub fn api_key(&self) -> Result<&SecretString, ConfigError> {
        match &self.llm.api_key {
            Some(key) if !key.expose_secret().trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey),
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind.parse().map_err(|e| {
            ConfigError::Invalid(format!("server.bind {:?} is not a socket address: {e}", self.server.bind))
        })
    }
}
