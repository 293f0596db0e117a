//! API 路由模块

mod analyze;
mod health;

pub use analyze::analyze_routes;
pub use health::health_routes;

use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::utils::assign_trace_id;
use std::sync::Arc;

/// 创建所有 API 路由
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(analyze_routes())
        .with_state(state)
}

/// 创建完整应用：路由 + trace id + CORS
pub fn create_app(state: Arc<AppState>) -> Router {
    // 配置 CORS（允许所有来源，供浏览器扩展调用）
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 越靠后的 layer 越靠外：CORS -> trace id -> TraceLayer -> 路由
    create_api_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(assign_trace_id))
        .layer(cors)
}
