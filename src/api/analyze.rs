//! 页面分析端点

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Extension, Json, Router,
};
use std::sync::Arc;
use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::models::AnalysisRequest;
use crate::state::AppState;
use crate::utils::TraceId;

/// 分析页面文本
///
/// 成功时直接返回模型生成的 JSON 对象
async fn analyze_page(
    State(state): State<Arc<AppState>>,
    Extension(trace_id): Extension<TraceId>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(request) = payload.map_err(|rejection| {
        let detail = rejection.body_text();
        warn!("Rejected analysis request: {}", detail);
        AppError::Validation(detail)
    })?;

    let raw = state.analysis.analyze(&trace_id, &request).await?;

    Ok(([(header::CONTENT_TYPE, "application/json")], raw).into_response())
}

/// 创建分析路由
///
/// 页面文本长度不限，由服务端截断，因此关闭默认的 2 MB 请求体上限
pub fn analyze_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/analyze",
        post(analyze_page).layer(DefaultBodyLimit::disable()),
    )
}
