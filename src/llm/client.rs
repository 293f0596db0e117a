//! Gemini LLM 客户端

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

use super::format::build_gemini_endpoint;
use super::types::{
    ApiErrorBody, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    LlmError,
};

/// 结构化输出要求的 MIME 类型
const JSON_MIME_TYPE: &str = "application/json";

/// Gemini generateContent 客户端
///
/// 只保存只读的连接参数，可在并发请求间共享。
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::ConfigError("API Key is required".to_string()));
        }
        let model = model.into();

        // 构建 HTTP 客户端
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(LlmError::HttpError)?;

        Ok(Self {
            client,
            api_key,
            endpoint: build_gemini_endpoint(base_url, &model),
            model,
        })
    }

    /// 模型名称
    pub fn model(&self) -> &str {
        &self.model
    }

    /// 以结构化 JSON 模式生成内容
    ///
    /// 返回模型输出的原始 JSON 文本，不做解析。
    pub async fn generate(
        &self,
        prompt: &str,
        schema: &Value,
        system_instruction: &str,
    ) -> Result<String, LlmError> {
        let payload = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            system_instruction: Some(Content::system(system_instruction)),
            generation_config: GenerationConfig {
                response_mime_type: JSON_MIME_TYPE,
                response_schema: schema,
            },
        };

        debug!(
            "Gemini API request: endpoint={}, model={}, prompt_chars={}",
            self.endpoint,
            self.model,
            prompt.chars().count()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        // 检查状态码
        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_text = response.text().await.unwrap_or_default();
            error!(
                "Gemini API error: status={}, body={}",
                status_code,
                preview(&error_text, 500)
            );
            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .map(|body| body.error.message)
                .unwrap_or_else(|_| preview(&error_text, 500));
            let message = if message.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                message
            };
            return Err(LlmError::ApiError {
                status: status_code,
                message,
            });
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        let parsed: GenerateContentResponse = serde_json::from_slice(&body)?;

        if let Some(text) = parsed.first_text() {
            return Ok(text);
        }

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            return Err(LlmError::Blocked(reason));
        }

        let finish_reason = parsed
            .candidates
            .first()
            .and_then(|c| c.finish_reason.clone())
            .unwrap_or_else(|| "NO_CANDIDATES".to_string());
        Err(LlmError::EmptyResponse(finish_reason))
    }
}

fn map_transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::HttpError(e)
    }
}

/// 按字符截断，用于日志和错误信息
fn preview(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
