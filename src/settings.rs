// src/settings.rs

use std::{net::SocketAddr, path::Path};

use clap::Parser;
use config::{builder::DefaultState, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

const DEFAULT_ADDR: &str = "127.0.0.1:8000";
const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
const DUCKDUCKGO_HTML: &str = "https://html.duckduckgo.com/html/";

#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// Path to the local configuration TOML file.
    #[arg(short, value_name = "CONFIG_PATH")]
    pub config: std::path::PathBuf,

    /// Path to the certificate file.
    #[arg(long, value_name = "CERT_PATH", requires = "key")]
    pub cert: Option<std::path::PathBuf>,

    /// Path to the key file.
    #[arg(long, value_name = "KEY_PATH", requires = "cert")]
    pub key: Option<std::path::PathBuf>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Web {
    #[serde(deserialize_with = "deserialize_socket_addr")]
    pub address: SocketAddr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Groq,
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    pub provider: Provider,
    pub model: String,
    pub temperature: f32,
    /// Credential used when a request doesn't carry its own.
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub ollama_host: String,
    pub ollama_port: u16,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: Provider::Groq,
            model: "llama3-70b-8192".to_string(),
            temperature: 0.2,
            api_key: None,
            base_url: GROQ_API_BASE.to_string(),
            timeout_secs: 60,
            ollama_host: "http://127.0.0.1".to_string(),
            ollama_port: 11434,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    pub endpoint: String,
    pub max_results: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Settings {
    pub web: Web,
    pub llm: LlmSettings,
    pub search: SearchSettings,
}

impl Settings {
    /// Load settings from the given TOML file, with sane defaults.
    ///
    /// Values can be overridden by `TREND_`-prefixed environment variables
    /// (e.g. `TREND_LLM__MODEL`). `GROQ_API_KEY` is used as the credential
    /// when none is configured.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let builder = ConfigBuilder::<DefaultState>::default()
            .set_default("web.address", DEFAULT_ADDR)?
            .set_default("llm.provider", "groq")?
            .set_default("llm.model", "llama3-70b-8192")?
            .set_default("llm.temperature", 0.2)?
            .set_default("llm.base_url", GROQ_API_BASE)?
            .set_default("llm.timeout_secs", 60)?
            .set_default("llm.ollama_host", "http://127.0.0.1")?
            .set_default("llm.ollama_port", 11434)?
            .set_default("search.endpoint", DUCKDUCKGO_HTML)?
            .set_default("search.max_results", 10)?
            .set_default("search.timeout_secs", 10)?;

        let cfg = builder
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("TREND").separator("__"))
            .build()?;

        let mut settings: Settings = cfg.try_deserialize()?;
        if settings.llm.api_key.as_deref().is_none_or(str::is_empty) {
            settings.llm.api_key = std::env::var("GROQ_API_KEY")
                .ok()
                .filter(|key| !key.is_empty());
        }
        Ok(settings)
    }
}

fn deserialize_socket_addr<'de, D>(deserializer: D) -> Result<SocketAddr, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}
