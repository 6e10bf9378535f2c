//! IronConnect 主入口

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use ironconnect::{api, app_state::AppState, config::Config, infrastructure::logging};

#[tokio::main]
async fn main() -> Result<()> {
    // ✅ 1. 加载环境变量
    dotenvy::dotenv().ok();

    // ✅ 2. 加载配置（CONFIG_PATH 指向的 TOML 文件优先）
    let config_path = std::env::var("CONFIG_PATH").ok();
    let config = Config::from_env_and_file(config_path.as_deref())?;

    // ✅ 3. 初始化日志
    if let Err(e) = logging::init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    config.validate()?;
    tracing::info!("🚀 Starting IronConnect wallet service");

    // ✅ 4. 初始化应用状态
    let config = Arc::new(config);
    let state = Arc::new(AppState::new(config.clone())?);

    // ✅ 5. 构建路由并启动服务器
    let app = api::routes(state);
    let bind_addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("🎉 Server running on port {}", config.server.port);
    tracing::info!("📖 Swagger UI: http://{}/docs", bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
