//! 请求级 trace id
//!
//! 每个请求在入口处生成 trace id，放入请求扩展并作为 span 字段，
//! 请求内的所有日志都在该 span 下输出。

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::fmt;
use tracing::{info_span, Instrument};
use uuid::Uuid;

/// 响应头中回传的 trace id
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// 短 trace id（UUID v4 前 8 位）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraceId(String);

impl TraceId {
    /// 生成新的 trace id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string()[..8].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// trace id 中间件
pub async fn assign_trace_id(mut req: Request, next: Next) -> Response {
    let trace_id = TraceId::generate();
    let span = info_span!("request", trace_id = %trace_id);
    req.extensions_mut().insert(trace_id.clone());

    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(trace_id.as_str()) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_id_format() {
        let id = TraceId::generate();
        assert_eq!(id.as_str().len(), 8);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id.to_string(), id.as_str());
    }

    #[test]
    fn test_trace_ids_differ() {
        assert_ne!(TraceId::generate(), TraceId::generate());
    }
}
