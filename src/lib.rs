// ==========================================
// 生物废弃物绩效指标 - 核心库
// ==========================================
// 系统定位: 生物废弃物收集计划的指标核心（无界面、无存储）
// 输入: 只读数据集；输出: 可序列化的看板结果
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体、记录与类型
pub mod domain;

// 引擎层 - 纯计算原语
pub mod engine;

// 看板层 - 五个角色看板
pub mod dashboard;

// 配置层 - 模型参数
pub mod config;

// API 层 - 对外接口
pub mod api;

// 演示数据集生成器
pub mod generator;

// 日志系统
pub mod logging;

// 耗时统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    Dataset, GisClassification, PeriodToken, RouteState, SemaphoreColor, Severity, Shift,
    TrendDirection,
};

// 引擎
pub use engine::{
    GisIndexCalculator, PeriodResolver, RandomSource, SeededRandom, SemaphoreEngine, TrendPolicy,
};

// 看板
pub use dashboard::{
    Bee2WasteAggregator, CeoAggregator, CfoAggregator, CouncillorAggregator, DashboardFilter,
    OperationalAggregator, OperationalFilter,
};

// 配置与 API
pub use api::{ApiError, ApiResult, DashboardApi};
pub use config::{ConfigManager, ModelParameters};
pub use generator::DatasetGenerator;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "生物废弃物绩效指标";
