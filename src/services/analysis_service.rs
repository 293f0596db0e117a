//! 法律文档分析服务
//!
//! 构建 prompt，调用模型，校验并原样转发模型输出。

use std::time::Instant;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::llm::LlmClient;
use crate::models::{AnalysisRequest, AnalysisResult};
use crate::utils::{RequestLogger, TraceId};

use super::prompt_service::{PromptService, MAX_TEXT_CHARS};

/// 日志中响应预览的长度
const SNIPPET_CHARS: usize = 100;

/// 分析服务
///
/// 启动后只读，跨请求共享。
pub struct AnalysisService {
    client: LlmClient,
    prompts: PromptService,
    request_logger: Option<RequestLogger>,
}

impl AnalysisService {
    /// 创建分析服务
    pub fn new(client: LlmClient, request_logger: Option<RequestLogger>) -> Self {
        Self {
            client,
            prompts: PromptService::new(),
            request_logger,
        }
    }

    /// 根据配置创建分析服务
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let client = LlmClient::new(&config.api_key, &config.base_url, &config.model)?;

        let request_logger = match &config.request_log_dir {
            Some(dir) => Some(RequestLogger::new(dir).map_err(|e| {
                AppError::Config(format!(
                    "cannot create request log dir {}: {}",
                    dir.display(),
                    e
                ))
            })?),
            None => None,
        };

        Ok(Self::new(client, request_logger))
    }

    /// 模型名称
    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// 分析页面文本
    ///
    /// 成功时返回模型输出的原始 JSON 文本。调用方需在请求 span 内调用，
    /// 日志行的 trace id 来自该 span。
    pub async fn analyze(&self, trace_id: &TraceId, request: &AnalysisRequest) -> AppResult<String> {
        let text_length = request.text.chars().count();
        info!("Request received for: {}", request.url);
        info!("Text Length: {} chars", text_length);

        let log_entry = self.request_logger.as_ref().map(|logger| {
            logger.begin(
                trace_id,
                &request.url,
                text_length,
                text_length > MAX_TEXT_CHARS,
                self.client.model(),
            )
        });

        let start_time = Instant::now();
        let result = self.run(request).await;

        match &result {
            Ok(raw) => {
                info!(
                    "AI Analysis complete in {:.2}s",
                    start_time.elapsed().as_secs_f64()
                );
                let snippet: String = raw.chars().take(SNIPPET_CHARS).collect();
                info!("Response Snippet: {}...", snippet);
                if let (Some(logger), Some(entry)) = (&self.request_logger, log_entry) {
                    logger.log_success(entry, start_time, raw);
                }
            }
            Err(e) => {
                error!("Agent Failure: {}", e);
                if let (Some(logger), Some(entry)) = (&self.request_logger, log_entry) {
                    logger.log_error(entry, start_time, &e.to_string());
                }
            }
        }

        result
    }

    /// 调用模型并校验输出结构
    async fn run(&self, request: &AnalysisRequest) -> AppResult<String> {
        let prompt = self.prompts.build_prompt(&request.url, &request.text);

        let raw = self
            .client
            .generate(
                &prompt,
                self.prompts.response_schema(),
                self.prompts.system_instruction(),
            )
            .await?;

        AnalysisResult::parse(&raw).map_err(|e| AppError::InvalidModelOutput(e.to_string()))?;

        Ok(raw)
    }
}
