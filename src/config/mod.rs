// ==========================================
// 生物废弃物绩效指标 - 配置层
// ==========================================
// 职责: 产出模型、收入单价、预算口径等可调参数
// 红线: GIS 区间/权重、排放因子为固定常量，不可配置
// ==========================================

pub mod config_manager;
pub mod model_params;

// 重导出核心配置管理器
pub use config_manager::{ConfigError, ConfigManager, CONFIG_PATH_ENV};
pub use model_params::ModelParameters;
