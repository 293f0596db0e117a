//! LLM 模块
//!
//! 封装 Gemini generateContent 接口，支持按 JSON Schema 约束输出。

mod client;
mod format;
mod types;

pub use client::LlmClient;
pub use types::LlmError;
