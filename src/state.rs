//! 应用状态管理
//!
//! 定义在请求处理器之间共享的只读状态。

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::services::AnalysisService;

/// 应用共享状态
///
/// 启动时初始化，之后只读，不含任何跨请求的可变数据
pub struct AppState {
    /// 分析服务
    pub analysis: AnalysisService,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(analysis: AnalysisService) -> Self {
        Self { analysis }
    }
}

/// 根据配置创建可共享的应用状态
pub fn create_shared_state(config: &AppConfig) -> AppResult<Arc<AppState>> {
    let analysis = AnalysisService::from_config(config)?;
    Ok(Arc::new(AppState::new(analysis)))
}
