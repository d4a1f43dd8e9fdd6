//! Create2Make - 设计到生产的编排服务
//!
//! 启动流程: 配置 -> 日志 -> 数据库 -> 网关 -> 缓存 -> AppState -> HTTP

use std::sync::Arc;
use std::time::Duration;

use create2make::application::EdgeFunctionPort;
use create2make::config::{load_config, print_config, LogConfig};
use create2make::infrastructure::adapters::{FakeEdgeClient, HttpEdgeClient, HttpEdgeClientConfig};
use create2make::infrastructure::cache::InMemoryQueryCache;
use create2make::infrastructure::events::EventPublisher;
use create2make::infrastructure::http::{AppState, HttpServer, ServerConfig};
use create2make::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteQuoteRepository,
    SqliteTryOnSessionRepository, SqliteWorkflowRepository,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(log: &LogConfig) {
    let log_filter = format!(
        "{},create2make={},tower_http=debug",
        log.level, log.level
    );
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!("Create2Make orchestration service");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig::new(&config.database.path)
        .with_max_connections(config.database.max_connections);
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let workflow_repo = Arc::new(SqliteWorkflowRepository::new(pool.clone()));
    let quote_repo = Arc::new(SqliteQuoteRepository::new(pool.clone()));
    let session_repo = Arc::new(SqliteTryOnSessionRepository::new(pool));

    // 创建 Edge Function 网关
    let gateway: Arc<dyn EdgeFunctionPort> = if config.gateway.fake {
        tracing::warn!("Using fake edge gateway, no remote calls will be made");
        FakeEdgeClient::new().arc()
    } else {
        let mut gateway_config = HttpEdgeClientConfig::new(&config.gateway.url)
            .with_timeout(config.gateway.timeout_secs)
            .with_retries(config.gateway.max_retries);
        if !config.gateway.anon_key.is_empty() {
            gateway_config = gateway_config.with_anon_key(&config.gateway.anon_key);
        }
        Arc::new(HttpEdgeClient::new(gateway_config)?)
    };

    if !gateway.health_check().await {
        tracing::warn!(url = %config.gateway.url, "Edge gateway is not reachable yet");
    }

    // 查询缓存和事件发布器
    let query_cache = InMemoryQueryCache::new(
        config.cache.max_entries,
        Duration::from_secs(config.cache.ttl_secs),
    )
    .arc();
    let event_publisher = EventPublisher::new().arc();

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(
        workflow_repo,
        quote_repo,
        session_repo,
        gateway,
        query_cache,
        event_publisher,
        config.tryon.secs_per_item,
    );

    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
