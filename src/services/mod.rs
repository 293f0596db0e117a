//! 服务层模块

mod analysis_service;
mod prompt_service;

pub use analysis_service::AnalysisService;
