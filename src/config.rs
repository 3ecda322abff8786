// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::cli::Cli;
use crate::error::{Error, Result};

/// Intent extraction settings and the static reference lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentConfig {
    /// Ignore keyword/name matches at the very start of the prompt (default: true)
    #[serde(default = "default_true")]
    pub skip_leading_match: bool,

    /// Known account users, also used as transfer receivers
    #[serde(default = "default_users")]
    pub users: Vec<String>,

    /// Subscription services the bank offers
    #[serde(default = "default_subscription_services")]
    pub subscription_services: Vec<String>,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            skip_leading_match: true,
            users: default_users(),
            subscription_services: default_subscription_services(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_users() -> Vec<String> {
    ["joseph", "john", "carole", "peter", "ram"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_subscription_services() -> Vec<String> {
    [
        "credit report",
        "mutual funds",
        "financial consulting",
        "retirement services",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Upstream inference endpoint used by the risk assessment routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_inference_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_sentiment_model")]
    pub sentiment_model: String,

    #[serde(default = "default_emotion_model")]
    pub emotion_model: String,

    #[serde(default = "default_toxicity_model")]
    pub toxicity_model: String,

    /// Model used to score individual tokens once a text is flagged toxic
    #[serde(default = "default_toxic_word_model")]
    pub toxic_word_model: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Concurrent per-token toxicity requests (1-64, default 8)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_inference_url(),
            api_key: None,
            sentiment_model: default_sentiment_model(),
            emotion_model: default_emotion_model(),
            toxicity_model: default_toxicity_model(),
            toxic_word_model: default_toxic_word_model(),
            embedding_model: default_embedding_model(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

fn default_inference_url() -> String {
    "https://api-inference.huggingface.co".into()
}
fn default_sentiment_model() -> String {
    "distilbert/distilbert-base-uncased-finetuned-sst-2-english".into()
}
fn default_emotion_model() -> String {
    "j-hartmann/emotion-english-distilroberta-base".into()
}
fn default_toxicity_model() -> String {
    "unitary/toxic-bert".into()
}
fn default_toxic_word_model() -> String {
    "Hate-speech-CNERG/bert-base-uncased-hatexplain".into()
}
fn default_embedding_model() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".into()
}
fn default_max_concurrency() -> usize {
    8
}

/// Extra sensitive-data rules registered next to the built-in ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Category name -> regular expression
    #[serde(default)]
    pub custom: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Ollama,
    OpenAI,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::OpenAI => write!(f, "openai"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP service listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// LLM provider used by the assistant
    #[serde(default)]
    pub provider: Provider,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_ollama_host")]
    pub ollama_host: String,

    /// Base URL for OpenAI-compatible APIs such as vLLM (default: https://api.openai.com/v1)
    #[serde(default)]
    pub openai_base_url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Upstream request timeout in seconds (default 60)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// LLM temperature (0.0-2.0, default 0.0 for literal answers)
    #[serde(default)]
    pub temperature: f32,

    /// Maximum tokens to generate (default 512)
    #[serde(default = "default_num_predict")]
    pub num_predict: u32,

    #[serde(default)]
    pub intent: IntentConfig,

    #[serde(default)]
    pub inference: InferenceConfig,

    #[serde(default)]
    pub patterns: PatternConfig,
}

fn default_bind_addr() -> String {
    "127.0.0.1:5000".into()
}
fn default_model() -> String {
    "llama2:7b-chat".into()
}
fn default_ollama_host() -> String {
    "http://localhost:11434".into()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_num_predict() -> u32 {
    512
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            provider: Provider::default(),
            model: default_model(),
            ollama_host: default_ollama_host(),
            openai_base_url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
            temperature: 0.0,
            num_predict: default_num_predict(),
            intent: IntentConfig::default(),
            inference: InferenceConfig::default(),
            patterns: PatternConfig::default(),
        }
    }
}

impl Config {
    /// Load with priority: CLI > ENV > user config > project config > defaults
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Project-level config (.riskdesk.toml in the working directory)
        if let Ok(cwd) = std::env::current_dir() {
            let project_config = cwd.join(".riskdesk.toml");
            if project_config.exists() {
                figment = figment.merge(Toml::file(&project_config));
            }
        }

        if let Some(path) = Self::config_path() {
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
            }
        }

        // RISKDESK_MODEL, RISKDESK_INFERENCE__BASE_URL, ...
        figment = figment.merge(Env::prefixed("RISKDESK_").split("__"));

        let mut config: Config = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        if config.api_key.is_none() && config.provider == Provider::OpenAI {
            config.api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        if config.inference.api_key.is_none() {
            config.inference.api_key = std::env::var("HF_TOKEN").ok();
        }

        #[cfg(feature = "secure-storage")]
        config.apply_keyring();

        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "riskdesk").map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    #[cfg(feature = "secure-storage")]
    fn apply_keyring(&mut self) {
        let lookup = |account: &str| {
            keyring::Entry::new("riskdesk", account)
                .ok()
                .and_then(|entry| entry.get_password().ok())
        };
        if self.api_key.is_none() && self.provider == Provider::OpenAI {
            self.api_key = lookup("openai");
        }
        if self.inference.api_key.is_none() {
            self.inference.api_key = lookup("inference");
        }
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ref p) = cli.provider {
            self.provider = match p.to_lowercase().as_str() {
                "openai" => Provider::OpenAI,
                _ => Provider::Ollama,
            };
        }
        if let Some(ref m) = cli.model {
            self.model = m.clone();
        }
        if let Some(ref addr) = cli.bind {
            self.bind_addr = addr.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(Error::Config(format!(
                "bind_addr must be host:port, got '{}'",
                self.bind_addr
            )));
        }

        if !(1..=3600).contains(&self.timeout_secs) {
            return Err(Error::Config(format!(
                "timeout_secs must be 1–3600, got {}",
                self.timeout_secs
            )));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Config(format!(
                "temperature must be 0.0–2.0, got {}",
                self.temperature
            )));
        }

        if !(1..=64).contains(&self.inference.max_concurrency) {
            return Err(Error::Config(format!(
                "inference.max_concurrency must be 1–64, got {}",
                self.inference.max_concurrency
            )));
        }

        check_http_url("ollama_host", &self.ollama_host)?;
        check_http_url("inference.base_url", &self.inference.base_url)?;
        if let Some(ref base) = self.openai_base_url {
            check_http_url("openai_base_url", base)?;
        }

        if self.intent.users.iter().any(|u| u.trim().is_empty()) {
            return Err(Error::Config("intent.users cannot contain empty names".into()));
        }
        if self
            .intent
            .subscription_services
            .iter()
            .any(|s| s.trim().is_empty())
        {
            return Err(Error::Config(
                "intent.subscription_services cannot contain empty names".into(),
            ));
        }

        Ok(())
    }

    /// Create default config file with secure permissions
    pub fn create_default() -> Result<PathBuf> {
        let Some(dir) = Self::config_dir() else {
            return Err(Error::Config("Cannot determine config directory".into()));
        };

        fs::create_dir_all(&dir)?;

        let path = dir.join("config.toml");
        let content = r#"# riskdesk configuration

# Address the HTTP service listens on
bind_addr = "127.0.0.1:5000"

# Assistant LLM provider: ollama, openai (any OpenAI-compatible server, e.g. vLLM)
provider = "ollama"
model = "llama2:7b-chat"
ollama_host = "http://localhost:11434"
# openai_base_url = "http://localhost:8000/v1"

# Upstream request timeout in seconds
timeout_secs = 60

# 0.0 keeps assistant answers literal
temperature = 0.0

[intent]
# Ignore keywords at the very start of a prompt ("transfer $5 to ram" is UNKNOWN)
skip_leading_match = true
users = ["joseph", "john", "carole", "peter", "ram"]
subscription_services = ["credit report", "mutual funds", "financial consulting", "retirement services"]

[inference]
base_url = "https://api-inference.huggingface.co"
# api_key is read from HF_TOKEN when unset
toxicity_model = "unitary/toxic-bert"
toxic_word_model = "Hate-speech-CNERG/bert-base-uncased-hatexplain"
embedding_model = "sentence-transformers/all-MiniLM-L6-v2"
max_concurrency = 8

[patterns.custom]
# employee_id = 'EMP-\d{6}'
"#;

        fs::write(&path, content)?;

        // Set secure permissions (0600)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(path)
    }
}

fn check_http_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| Error::Config(format!("{field} is not a valid URL ('{value}'): {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "{field} must start with http:// or https://, got '{value}'"
        )));
    }
    Ok(())
}
