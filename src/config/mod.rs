mod manager;

pub use manager::{
    ApiConfig, BatchConfig, CacheConfig, ConfigFile, ConfigManager, DEFAULT_API_KEY_ENV,
    DefaultsConfig, ResolveOptions, ResolvedConfig, resolve_config,
};
