// ==========================================
// 生物废弃物绩效指标 - 领域模型层
// ==========================================
// 职责: 定义参考实体、月度记录、领域枚举、只读数据集
// 红线: 不含计算逻辑，不含 I/O
// ==========================================

pub mod dataset;
pub mod entities;
pub mod period;
pub mod records;
pub mod types;

// 重导出核心类型
pub use dataset::Dataset;
pub use entities::{ContaminationType, EmissionFactor, Municipality, Parish, Route, Team};
pub use period::{PeriodParseError, PeriodToken};
pub use records::{
    Incident, MonthlyCostRecord, MonthlyIncidentRecord, MonthlyParishRecord,
    MonthlyUrbanWasteRecord,
};
pub use types::{
    GisClassification, RouteFrequency, RouteState, SemaphoreColor, Severity, Shift, TeamKind,
    TrendDirection,
};
