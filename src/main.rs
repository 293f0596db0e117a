//! LegalLens - 法律文档分析后端
//!
//! 使用 axum 框架构建的后端服务，接收浏览器扩展提交的页面文本，
//! 调用 Gemini 模型判断是否为法律文档并给出安全评估。

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod llm;
mod models;
mod services;
mod state;
mod utils;

use api::create_app;
use config::AppConfig;
use state::create_shared_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "legal_lens=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting LegalLens backend...");

    // 缺少密钥时直接退出，不监听端口
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Startup aborted: {}", e);
            return Err(e.into());
        }
    };

    // 创建共享状态
    let state = create_shared_state(&config).context("failed to initialise analysis service")?;
    info!("Using model: {}", config.model);

    let app = create_app(state);

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on: {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
