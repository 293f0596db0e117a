//! 应用配置管理
//!
//! 启动时从环境变量（以及可选的 `.env` 文件）加载一次配置，之后只读。

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

/// API 密钥环境变量
const API_KEY_VAR: &str = "GOOGLE_API_KEY";
const MODEL_VAR: &str = "LEGAL_LENS_MODEL";
const BASE_URL_VAR: &str = "LEGAL_LENS_BASE_URL";
const HOST_VAR: &str = "LEGAL_LENS_HOST";
const PORT_VAR: &str = "LEGAL_LENS_PORT";
const REQUEST_LOG_DIR_VAR: &str = "LEGAL_LENS_REQUEST_LOG_DIR";

/// 应用配置结构体
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Gemini API 密钥
    pub api_key: String,

    /// Gemini API 基础 URL
    pub base_url: String,

    /// 模型名称
    pub model: String,

    /// 监听地址
    pub host: String,

    /// 监听端口
    pub port: u16,

    /// 分析日志目录，未设置时不写 JSONL 日志
    pub request_log_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl AppConfig {
    /// 从进程环境加载配置
    ///
    /// 会先尝试加载 `.env` 文件，文件不存在时忽略。
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 通过查找函数加载配置，便于测试
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 空白值与未设置同等对待
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(API_KEY_VAR)
            .ok_or_else(|| AppError::Config(format!("{} not found in environment or .env file", API_KEY_VAR)))?;

        let port = match get(PORT_VAR) {
            Some(raw) => raw.parse::<u16>().map_err(|e| {
                AppError::Config(format!("invalid {} '{}': {}", PORT_VAR, raw, e))
            })?,
            None => default_port(),
        };

        Ok(Self {
            api_key,
            base_url: get(BASE_URL_VAR).unwrap_or_else(default_base_url),
            model: get(MODEL_VAR).unwrap_or_else(default_model),
            host: get(HOST_VAR).unwrap_or_else(default_host),
            port,
            request_log_dir: get(REQUEST_LOG_DIR_VAR).map(PathBuf::from),
        })
    }

    /// 解析监听地址
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid listen address {}:{}: {}", self.host, self.port, e)))
    }
}
