//! 分析请求日志记录器
//!
//! 将每次分析请求记录到 JSONL 文件，便于调试和分析。

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::warn;

use super::trace::TraceId;

/// 日志文件名
pub const LOG_FILE_NAME: &str = "analysis_requests.jsonl";

/// 请求日志条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// 请求 trace id
    pub trace_id: String,
    /// 时间戳
    pub timestamp: DateTime<Utc>,
    /// 页面地址
    pub url: String,
    /// 原始文本长度（字符）
    pub text_length: usize,
    /// 是否被截断
    pub truncated: bool,
    /// 模型名称
    pub model: String,
    /// 状态
    pub status: String,
    /// 持续时间（毫秒）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// 响应长度
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_length: Option<usize>,
    /// 响应预览
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_preview: Option<String>,
    /// 错误信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// 每写入多少条检查一次文件行数
const CLEANUP_INTERVAL: usize = 100;

/// 日志文件句柄及写入计数
#[derive(Default)]
struct LogFile {
    file: Option<File>,
    writes_since_cleanup: usize,
}

/// 请求日志记录器
pub struct RequestLogger {
    log_path: PathBuf,
    max_entries: usize,
    cleanup_interval: usize,
    state: Mutex<LogFile>,
}

impl RequestLogger {
    /// 创建新的日志记录器
    pub fn new(log_dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(log_dir)?;

        Ok(Self {
            log_path: log_dir.join(LOG_FILE_NAME),
            max_entries: 1000,
            cleanup_interval: CLEANUP_INTERVAL,
            state: Mutex::new(LogFile::default()),
        })
    }

    #[cfg(test)]
    fn with_limits(mut self, max_entries: usize, cleanup_interval: usize) -> Self {
        self.max_entries = max_entries;
        self.cleanup_interval = cleanup_interval;
        self
    }

    /// 按字符截断
    fn truncate(s: &str, max_chars: usize) -> String {
        match s.char_indices().nth(max_chars) {
            Some((idx, _)) => format!("{}...", &s[..idx]),
            None => s.to_string(),
        }
    }

    /// 记录请求开始
    pub fn begin(
        &self,
        trace_id: &TraceId,
        url: &str,
        text_length: usize,
        truncated: bool,
        model: &str,
    ) -> LogEntry {
        LogEntry {
            trace_id: trace_id.to_string(),
            timestamp: Utc::now(),
            url: url.to_string(),
            text_length,
            truncated,
            model: model.to_string(),
            status: "pending".to_string(),
            duration_ms: None,
            response_length: None,
            response_preview: None,
            error_message: None,
        }
    }

    /// 记录成功
    pub fn log_success(&self, mut entry: LogEntry, start_time: Instant, response: &str) {
        entry.status = "success".to_string();
        entry.duration_ms = Some(start_time.elapsed().as_millis() as u64);
        entry.response_length = Some(response.chars().count());
        entry.response_preview = Some(Self::truncate(response, 300));
        self.write_entry(&entry);
    }

    /// 记录错误
    pub fn log_error(&self, mut entry: LogEntry, start_time: Instant, error_message: &str) {
        entry.status = "error".to_string();
        entry.duration_ms = Some(start_time.elapsed().as_millis() as u64);
        entry.error_message = Some(Self::truncate(error_message, 500));
        self.write_entry(&entry);
    }

    /// 写入日志条目，失败只记警告
    fn write_entry(&self, entry: &LogEntry) {
        if let Err(e) = self.append(entry) {
            warn!("Failed to write analysis log {}: {}", self.log_path.display(), e);
        }
    }

    fn append(&self, entry: &LogEntry) -> io::Result<()> {
        let json = serde_json::to_string(entry)?;
        let mut state = self.state.lock();

        // 懒加载文件
        if state.file.is_none() {
            let f = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_path)?;
            state.file = Some(f);
        }

        if let Some(file) = state.file.as_mut() {
            writeln!(file, "{}", json)?;
            file.flush()?;
        }

        // 只每隔 cleanup_interval 次写入才读取整个文件
        state.writes_since_cleanup += 1;
        if state.writes_since_cleanup < self.cleanup_interval {
            return Ok(());
        }
        state.writes_since_cleanup = 0;

        // 持锁清理，避免与并发追加交错
        if self.cleanup_if_needed()? {
            // 文件被重写，丢弃旧句柄
            state.file = None;
        }
        Ok(())
    }

    /// 清理旧日志，返回是否重写了文件
    fn cleanup_if_needed(&self) -> io::Result<bool> {
        let file = File::open(&self.log_path)?;
        let lines: Vec<String> = BufReader::new(file).lines().collect::<Result<_, _>>()?;

        if lines.len() <= self.max_entries {
            return Ok(false);
        }

        let keep_lines = &lines[lines.len() - self.max_entries..];
        let mut file = File::create(&self.log_path)?;
        for line in keep_lines {
            writeln!(file, "{}", line)?;
        }
        file.flush()?;
        Ok(true)
    }
}
