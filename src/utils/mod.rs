//! 工具模块

pub mod request_logger;
pub mod trace;

pub use request_logger::RequestLogger;
pub use trace::{assign_trace_id, TraceId};
