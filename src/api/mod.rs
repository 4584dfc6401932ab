// ==========================================
// 生物废弃物绩效指标 - API 层
// ==========================================
// 职责: 对外的看板查询接口（输入校验 + 请求日志 + 耗时）
// ==========================================

pub mod dashboard_api;
pub mod error;

// 重导出核心类型
pub use dashboard_api::DashboardApi;
pub use error::{ApiError, ApiResult};
