use std::{fs, path::Path, time::Duration};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

// --- START REDIS CONFIG ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            pool_size: default_pool_size(),
            key_prefix: default_key_prefix(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRedisConfig {
    pub url: Option<String>,
    pub pool_size: Option<usize>,
    pub key_prefix: Option<String>,
}

impl PartialRedisConfig {
    fn merge_into(self, final_config: &mut RedisConfig) {
        if let Some(url) = self.url {
            final_config.url = url;
        }
        if let Some(pool_size) = self.pool_size {
            final_config.pool_size = pool_size;
        }
        if let Some(key_prefix) = self.key_prefix {
            final_config.key_prefix = key_prefix;
        }
    }
}

// --- START CACHE CONFIG ---

/// Cache backend type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendType {
    #[default]
    Memory,
    Redis,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheRedisConfig {
    #[serde(default = "default_cache_redis_key_prefix")]
    pub key_prefix: String,
}

impl Default for CacheRedisConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_cache_redis_key_prefix(),
        }
    }
}

/// Result cache configuration. `ttl` bounds how stale a cached
/// leaderboard or listing may get.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackendType,
    #[serde(default = "default_ttl_seconds")]
    pub ttl: u64,
    #[serde(default = "default_negative_ttl_seconds")]
    pub negative_ttl: u64,
    #[serde(default)]
    pub redis: CacheRedisConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendType::default(),
            ttl: default_ttl_seconds(),
            negative_ttl: default_negative_ttl_seconds(),
            redis: CacheRedisConfig::default(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl)
    }

    pub fn negative_ttl(&self) -> Duration {
        Duration::from_secs(self.negative_ttl)
    }
}

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialCacheRedisConfig {
    pub key_prefix: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialCacheConfig {
    pub backend: Option<CacheBackendType>,
    pub ttl: Option<u64>,
    pub negative_ttl: Option<u64>,
    pub redis: Option<PartialCacheRedisConfig>,
}

impl PartialCacheConfig {
    fn merge_into(self, final_config: &mut CacheConfig) {
        if let Some(backend) = self.backend {
            final_config.backend = backend;
        }
        if let Some(ttl) = self.ttl {
            final_config.ttl = ttl;
        }
        if let Some(negative_ttl) = self.negative_ttl {
            final_config.negative_ttl = negative_ttl;
        }
        if let Some(redis) = self.redis {
            if let Some(key_prefix) = redis.key_prefix {
                final_config.redis.key_prefix = key_prefix;
            }
        }
    }
}

fn default_ttl_seconds() -> u64 {
    600 // 10 minutes
}

fn default_negative_ttl_seconds() -> u64 {
    60
}

fn default_pool_size() -> usize {
    10
}

fn default_key_prefix() -> String {
    "devport:".to_string()
}

fn default_cache_redis_key_prefix() -> String {
    "cache:".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379/".to_string()
}

// Used for deserializing user-provided config files where all fields are optional.
#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub base_path: Option<String>,
    pub db_url: Option<String>,
    pub db_pool_size: Option<u32>,
    pub db_timeout_ms: Option<u64>,
    pub log_level: Option<String>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub redis: Option<PartialRedisConfig>,
    pub cache: Option<PartialCacheConfig>,
}

impl PartialConfig {
    /// Merges the fields of this partial config into a final config, overwriting existing values.
    fn merge_into(self, final_config: &mut FinalConfig) {
        if let Some(host) = self.host {
            final_config.host = host;
        }
        if let Some(port) = self.port {
            final_config.port = port;
        }
        if let Some(base_path) = self.base_path {
            final_config.base_path = base_path;
        }
        if let Some(db_url) = self.db_url {
            final_config.db_url = db_url;
        }
        if let Some(db_pool_size) = self.db_pool_size {
            final_config.db_pool_size = db_pool_size;
        }
        if let Some(db_timeout_ms) = self.db_timeout_ms {
            final_config.db_timeout_ms = db_timeout_ms;
        }
        if let Some(log_level) = self.log_level {
            final_config.log_level = log_level;
        }
        if let Some(origins) = self.cors_allowed_origins {
            final_config.cors_allowed_origins = origins;
        }
        if let Some(redis) = self.redis {
            redis.merge_into(final_config.redis.get_or_insert_with(Default::default));
        }
        if let Some(cache) = self.cache {
            cache.merge_into(&mut final_config.cache)
        }
    }
}

// The fully resolved configuration used by the application.
// This is also the format for the default configuration file.
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct FinalConfig {
    pub host: String,
    pub port: u16,
    pub base_path: String,
    pub db_url: String,
    pub db_pool_size: u32,
    pub db_timeout_ms: u64,
    pub log_level: String,
    pub cors_allowed_origins: Vec<String>,
    pub redis: Option<RedisConfig>,
    pub cache: CacheConfig,
}

impl Default for FinalConfig {
    fn default() -> Self {
        FinalConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            base_path: "/api".to_string(),
            db_url: "./storage/sqlite.db".to_string(),
            db_pool_size: 5,
            db_timeout_ms: 5000,
            log_level: "info".to_string(),
            cors_allowed_origins: Vec::new(),
            redis: None,
            cache: CacheConfig::default(),
        }
    }
}

impl FinalConfig {
    pub fn db_timeout(&self) -> Duration {
        Duration::from_millis(self.db_timeout_ms)
    }
}

fn get_env_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn get_config_from_env() -> PartialConfig {
    PartialConfig {
        host: get_env_var("HOST"),
        port: get_env_var("PORT"),
        base_path: get_env_var("BASE_PATH"),
        db_url: get_env_var("DB_URL"),
        db_pool_size: get_env_var("DB_POOL_SIZE"),
        db_timeout_ms: get_env_var("DB_TIMEOUT_MS"),
        log_level: get_env_var("LOG_LEVEL"),
        cors_allowed_origins: None,
        redis: get_env_var::<String>("REDIS_URL").map(|url| PartialRedisConfig {
            url: Some(url),
            ..Default::default()
        }),
        cache: None,
    }
}

fn read_partial(path: &Path) -> Result<Option<PartialConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let config_str = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read configuration file at {:?}: {}", path, e))?;
    serde_yaml::from_str(&config_str)
        .map(Some)
        .map_err(|e| format!("Failed to parse configuration file at {:?}: {}", path, e))
}

/// Resolves the configuration from programmatic defaults, the default file,
/// the user file, and finally `env` (highest priority).
pub fn load_config(
    default_config_path: &Path,
    user_config_path: &Path,
    env: PartialConfig,
) -> Result<FinalConfig, String> {
    let mut effective_default_config = FinalConfig::default();

    if let Some(file_defaults) = read_partial(default_config_path)? {
        file_defaults.merge_into(&mut effective_default_config);
    }

    // Write the defaults back so new keys show up in config.default.yaml.
    let yaml_str = serde_yaml::to_string(&effective_default_config)
        .map_err(|e| format!("Failed to serialize default configuration: {}", e))?;
    fs::write(default_config_path, yaml_str)
        .map_err(|e| format!("Failed to write default configuration file: {}", e))?;

    let mut final_config = effective_default_config;

    if let Some(user_config) = read_partial(user_config_path)? {
        user_config.merge_into(&mut final_config);
    }

    env.merge_into(&mut final_config);

    if final_config.redis.is_none() && final_config.cache.backend == CacheBackendType::Redis {
        final_config.cache.backend = CacheBackendType::Memory;
    }
    if final_config.db_pool_size == 0 {
        final_config.db_pool_size = 1;
    }

    Ok(final_config)
}

pub static CONFIG: Lazy<FinalConfig> = Lazy::new(|| {
    load_config(
        Path::new("config.default.yaml"),
        Path::new("config.yaml"),
        get_config_from_env(),
    )
    .unwrap_or_else(|e| panic!("{}", e))
});
