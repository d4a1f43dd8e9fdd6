//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "CREATE2MAKE";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `CREATE2MAKE_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `CREATE2MAKE_SERVER__PORT=8080`
/// - `CREATE2MAKE_GATEWAY__URL=https://project.supabase.co`
/// - `CREATE2MAKE_GATEWAY__ANON_KEY=...`
/// - `CREATE2MAKE_DATABASE__PATH=/data/create2make.db`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5080)?
        .set_default("gateway.url", "http://localhost:54321")?
        .set_default("gateway.anon_key", "")?
        .set_default("gateway.timeout_secs", 60)?
        .set_default("gateway.max_retries", 0)?
        .set_default("gateway.fake", false)?
        .set_default("database.path", "data/create2make.db")?
        .set_default("database.max_connections", 5)?
        .set_default("cache.max_entries", 1024)?
        .set_default("cache.ttl_secs", 300)?
        .set_default("tryon.secs_per_item", 25)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: CREATE2MAKE_GATEWAY__URL=https://project.supabase.co
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if !config.gateway.fake && config.gateway.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Gateway URL cannot be empty".to_string(),
        ));
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.cache.max_entries == 0 {
        return Err(ConfigError::ValidationError(
            "Cache max_entries must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
///
/// anon_key 不输出
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    if config.gateway.fake {
        tracing::info!("Gateway: fake (in-process)");
    } else {
        tracing::info!("Gateway URL: {}", config.gateway.url);
        tracing::info!("Gateway Timeout: {}s", config.gateway.timeout_secs);
        tracing::info!("Gateway Max Retries: {}", config.gateway.max_retries);
        tracing::info!("Gateway Anon Key Set: {}", !config.gateway.anon_key.is_empty());
    }
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    tracing::info!(
        "Query Cache: {} entries, ttl {}s",
        config.cache.max_entries,
        config.cache.ttl_secs
    );
    tracing::info!("Try-On Secs Per Item: {}", config.tryon.secs_per_item);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
