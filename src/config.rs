use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub prompt: PromptConfig,
    pub recording: RecordingConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct PromptConfig {
    /// Chat-completion endpoint, e.g. "https://api.openai.com/v1/chat/completions"
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the bearer credential.
    pub api_key_env: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordingConfig {
    /// The single artifact slot; each new recording overwrites it.
    pub slot_path: PathBuf,
    pub countdown_secs: u32,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl PromptConfig {
    /// Resolve the bearer credential from the configured environment variable.
    pub fn api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env)
            .with_context(|| format!("API key env var {} is not set", self.api_key_env))
    }
}
