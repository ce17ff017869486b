use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheOptions;
use crate::paths;
use crate::translation::Formality;

/// Environment variable consulted for the API key when the config file
/// names no other.
pub const DEFAULT_API_KEY_ENV: &str = "LINGO_API_KEY";

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_cache_enabled() -> bool {
    true
}

const fn default_cache_max_size() -> u64 {
    100 * 1024 * 1024
}

const fn default_cache_ttl_secs() -> u64 {
    30 * 24 * 60 * 60
}

const fn default_concurrency() -> usize {
    5
}

/// Default request settings in the `[defaults]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default target language code.
    pub to: Option<String>,
    /// Default formality (`default`, `more`, `less`, `prefer_more`,
    /// `prefer_less`).
    pub formality: Option<String>,
}

/// Remote service settings in the `[api]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// The translation service base URL.
    pub endpoint: Option<String>,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Per-attempt request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retry budget for retryable failures; 0 disables retries.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            api_key_env: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl ApiConfig {
    /// Gets the API key: named env var first, then the default env var,
    /// then the key stored in the config file.
    pub fn get_api_key(&self) -> Option<String> {
        let env_var = self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV);
        if let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone()
    }
}

/// Local cache settings in the `[cache]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_max_size")]
    pub max_size_bytes: u64,
    /// Entry lifetime; 0 disables expiry.
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            max_size_bytes: default_cache_max_size(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

/// Batch settings in the `[batch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Files translated simultaneously (1..=100).
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/lingo/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Target language code override.
    pub to: Option<String>,
    /// Formality override.
    pub formality: Option<Formality>,
    /// Disable the cache for this invocation.
    pub no_cache: bool,
    /// Batch concurrency override.
    pub concurrency: Option<usize>,
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub target_lang: String,
    pub formality: Option<Formality>,
    pub cache: CacheOptions,
    pub concurrency: usize,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// CLI options take precedence over config file values.
///
/// # Errors
///
/// Returns an error if required configuration (endpoint, API key, target
/// language) is missing, or a config value fails to parse.
pub fn resolve_config(options: &ResolveOptions, config: &ConfigFile) -> Result<ResolvedConfig> {
    let endpoint = config.api.endpoint.clone().ok_or_else(|| {
        anyhow::anyhow!(
            "Missing required configuration: 'endpoint'\n\n\
             Set it in ~/.config/lingo/config.toml:\n  \
             [api]\n  \
             endpoint = \"https://api.example.com\"\n\n\
             Or run 'lingo configure'."
        )
    })?;

    let api_key = config.api.get_api_key().ok_or_else(|| {
        let env_var = config
            .api
            .api_key_env
            .as_deref()
            .unwrap_or(DEFAULT_API_KEY_ENV);
        anyhow::anyhow!(
            "Missing API key\n\n\
             Set the {env_var} environment variable:\n  \
             export {env_var}=\"your-api-key\"\n\n\
             Or set api_key in ~/.config/lingo/config.toml"
        )
    })?;

    let target_lang = options
        .to
        .clone()
        .or_else(|| config.defaults.to.clone())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Missing required configuration: 'to' (target language)\n\n\
                 Please provide it via:\n  \
                 - CLI option: lingo --to <lang>\n  \
                 - Config file: ~/.config/lingo/config.toml"
            )
        })?;

    let formality = match (options.formality, config.defaults.formality.as_deref()) {
        (Some(formality), _) => Some(formality),
        (None, Some(value)) => {
            let parsed = Formality::parse(value);
            if parsed.is_none() {
                bail!(
                    "Invalid formality in config file: '{value}'\n\n\
                     Valid values: default, more, less, prefer_more, prefer_less"
                );
            }
            parsed
        }
        (None, None) => None,
    };

    let cache = CacheOptions {
        max_size: config.cache.max_size_bytes,
        ttl_secs: config.cache.ttl_secs,
        enabled: config.cache.enabled && !options.no_cache,
    };

    Ok(ResolvedConfig {
        endpoint,
        api_key,
        timeout: Duration::from_secs(config.api.timeout_secs),
        max_retries: config.api.max_retries,
        target_lang,
        formality,
        cache,
        concurrency: options.concurrency.unwrap_or(config.batch.concurrency),
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/lingo/config.toml`
    /// or `~/.config/lingo/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir().join("config.toml"),
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    pub fn load_or_default(&self) -> ConfigFile {
        self.load().unwrap_or_default()
    }
}
