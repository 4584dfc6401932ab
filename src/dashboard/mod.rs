// ==========================================
// 生物废弃物绩效指标 - 看板层
// ==========================================
// 职责: 五个面向角色的看板聚合器（CEO / CFO / 市议员 / 运营 / Bee2Waste）
// 红线: 每次调用从数据集重新计算，不缓存、不修改数据集
// ==========================================

pub mod bee2waste;
pub mod ceo;
pub mod cfo;
pub mod councillor;
pub mod filter;
pub mod kpi;
pub mod operational;
pub mod scope;

// 重导出看板类型
pub use bee2waste::{Bee2WasteAggregator, Bee2WasteMetrics};
pub use ceo::{CeoAggregator, CeoMetrics};
pub use cfo::{CfoAggregator, CfoMetrics};
pub use councillor::{CouncillorAggregator, CouncillorMetrics};
pub use filter::{DashboardFilter, OperationalFilter};
pub use kpi::{KpiCard, SparklinePoint};
pub use operational::{OperationalAggregator, OperationalMetrics};
pub use scope::PeriodScope;
