use crate::client::{Client, DEFAULT_TIMEOUT};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Region used when neither the environment nor the config file sets one
const DEFAULT_REGION: &str = "io";

/// Environment variable names
const ENV_API_KEY: &str = "DNAS_API_KEY";
const ENV_REGION: &str = "DNAS_REGION";
const ENV_TIMEOUT_SECS: &str = "DNAS_TIMEOUT_SECS";

/// `config.toml`; all DNA Spaces settings live under `[api]`
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    api: Option<ApiConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct ApiConfig {
    /// DNA Spaces API key
    api_key: Option<String>,
    /// "io" or "eu"
    region: Option<String>,
    /// Request timeout in seconds
    timeout_secs: Option<u64>,
}

/// Values read from the environment
#[derive(Debug, Default)]
struct EnvOverrides {
    api_key: Option<String>,
    region: Option<String>,
    timeout_secs: Option<u64>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        let timeout_secs = non_empty_var(ENV_TIMEOUT_SECS).and_then(|v| match v.parse() {
            Ok(secs) => Some(secs),
            Err(e) => {
                tracing::warn!("Ignoring invalid {}={:?}: {}", ENV_TIMEOUT_SECS, v, e);
                None
            }
        });

        Self {
            api_key: non_empty_var(ENV_API_KEY),
            region: non_empty_var(ENV_REGION),
            timeout_secs,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolved client settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub region: String,
    pub timeout: Duration,
    /// Where the API key came from
    pub source: ConfigSource,
}

/// Origin of the DNA Spaces API key. Region and timeout are resolved per
/// setting and may come from elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// No key anywhere; [`ClientConfig::build_client`] will fail
    Default,
    /// `DNAS_API_KEY`
    Environment,
    /// `api_key` in `[api]`
    ConfigFile,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::ConfigFile => write!(f, "config file"),
        }
    }
}

impl ClientConfig {
    /// Build a [`Client`] from these settings.
    pub fn build_client(&self) -> Result<Client> {
        let api_key = self.api_key.as_deref().with_context(|| {
            format!(
                "No API key configured. Set {} or add api_key to {}",
                ENV_API_KEY,
                get_config_file_path_string()
            )
        })?;

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Client::with_http_client(api_key, &self.region, http)
            .context("Invalid client configuration")
    }
}

/// `<config_dir>/dnas/config.toml`, falling back to `~/.config` when the
/// platform has no config directory
fn get_config_file_path() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .map(|p| p.join("dnas").join("config.toml"))
}

/// Read `[api]` settings. A missing file is normal; an unreadable or
/// malformed one is logged and treated as absent so env settings still apply.
fn load_config_file() -> Option<ConfigFile> {
    let path = get_config_file_path()?;

    if !path.exists() {
        return None;
    }

    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!("Loaded DNA Spaces settings from {:?}", path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read config file {:?}: {}", path, e);
            None
        }
    }
}

/// Load client configuration. Each setting is taken from, in order:
/// 1. Environment variables (DNAS_API_KEY, DNAS_REGION, DNAS_TIMEOUT_SECS)
/// 2. Config file (~/.config/dnas/config.toml)
/// 3. Default values
pub fn load_client_config() -> ClientConfig {
    resolve(EnvOverrides::from_env(), load_config_file())
}

fn resolve(env: EnvOverrides, file: Option<ConfigFile>) -> ClientConfig {
    let file = file.and_then(|f| f.api).unwrap_or_default();
    let file_key = file
        .api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    let (api_key, source) = match (env.api_key, file_key) {
        (Some(key), _) => {
            tracing::debug!("Using API key from environment variable");
            (Some(key), ConfigSource::Environment)
        }
        (None, Some(key)) => {
            tracing::debug!("Using API key from config file");
            (Some(key), ConfigSource::ConfigFile)
        }
        (None, None) => (None, ConfigSource::Default),
    };

    let region = env
        .region
        .or(file.region.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()))
        .unwrap_or_else(|| DEFAULT_REGION.to_string());

    let timeout = env
        .timeout_secs
        .or(file.timeout_secs)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT);

    ClientConfig {
        api_key,
        region,
        timeout,
        source,
    }
}

/// Config file location as shown by `dnas config` and in error hints
pub fn get_config_file_path_string() -> String {
    get_config_file_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "~/.config/dnas/config.toml".to_string())
}

/// Commented `config.toml` template listing every `[api]` setting
pub fn generate_example_config() -> String {
    r#"# DNA Spaces client configuration
# Place this file at: ~/.config/dnas/config.toml

[api]
# API key generated in DNA Spaces (overridden by DNAS_API_KEY)
# api_key = "your-api-key"

# "io" for the Americas, "eu" elsewhere (overridden by DNAS_REGION)
# region = "io"

# Request timeout in seconds (overridden by DNAS_TIMEOUT_SECS)
# timeout_secs = 10
"#
    .to_string()
}
