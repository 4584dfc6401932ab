// ==========================================
// 生物废弃物绩效指标 - API 层错误类型
// ==========================================
// 职责: 定义 API 边界上的错误；引擎与看板本身不会失败
// ==========================================

use crate::config::ConfigError;
use crate::domain::period::PeriodParseError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 配置与数据集错误
    // ==========================================
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("数据集解析失败: {0}")]
    DatasetDecode(#[from] serde_json::Error),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 PeriodParseError 转换
// ==========================================
impl From<PeriodParseError> for ApiError {
    fn from(err: PeriodParseError) -> Self {
        ApiError::InvalidInput(format!("未知的周期口令: {}", err.0))
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
