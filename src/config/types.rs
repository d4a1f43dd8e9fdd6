//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// Edge Function 网关配置
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 查询缓存配置
    #[serde(default)]
    pub cache: CacheConfig,

    /// 虚拟试穿配置
    #[serde(default)]
    pub tryon: TryOnConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Edge Function 网关配置
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// 项目基础 URL，函数地址为 {url}/functions/v1/{name}
    #[serde(default = "default_gateway_url")]
    pub url: String,

    /// 匿名 key，同时用于 Authorization 和 apikey 头
    #[serde(default)]
    pub anon_key: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_gateway_timeout")]
    pub timeout_secs: u64,

    /// 网络错误/超时的最大重试次数
    #[serde(default)]
    pub max_retries: u32,

    /// 使用内置的假网关（本地开发）
    #[serde(default)]
    pub fake: bool,
}

fn default_gateway_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_gateway_timeout() -> u64 {
    60
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
            anon_key: String::new(),
            timeout_secs: default_gateway_timeout(),
            max_retries: 0,
            fake: false,
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/create2make.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// 查询缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// 最大条目数，超出后按 LRU 淘汰
    #[serde(default = "default_cache_entries")]
    pub max_entries: usize,

    /// 条目存活时间（秒）
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

fn default_cache_entries() -> usize {
    1024
}

fn default_cache_ttl() -> u64 {
    300
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_cache_entries(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

/// 虚拟试穿配置
#[derive(Debug, Clone, Deserialize)]
pub struct TryOnConfig {
    /// 单张试穿的预估耗时（秒），用于计算剩余时间
    #[serde(default = "default_secs_per_item")]
    pub secs_per_item: u64,
}

fn default_secs_per_item() -> u64 {
    crate::application::DEFAULT_SECS_PER_ITEM
}

impl Default for TryOnConfig {
    fn default() -> Self {
        Self {
            secs_per_item: default_secs_per_item(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别（RUST_LOG 优先）
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5080);
        assert_eq!(config.gateway.url, "http://localhost:54321");
        assert!(!config.gateway.fake);
        assert_eq!(config.database.path, "data/create2make.db");
        assert_eq!(config.cache.max_entries, 1024);
        assert_eq!(config.tryon.secs_per_item, 25);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:5080");
    }
}
