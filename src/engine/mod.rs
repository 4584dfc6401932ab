// ==========================================
// 生物废弃物绩效指标 - 引擎层
// ==========================================
// 职责: 纯计算原语（周期、聚合、GIS、CO2、趋势、信号灯、随机源）
// 红线: 引擎无状态、无 I/O，任何比值都有兜底，不产生 NaN
// ==========================================

pub mod aggregation;
pub mod co2;
pub mod gis_index;
pub mod period;
pub mod random_source;
pub mod semaphore;
pub mod trend;

// 重导出核心引擎
pub use aggregation::{
    group_sum_by, pct_change, round_to, safe_ratio, weighted_average, CollectionTotals,
};
pub use co2::{co2_complete, co2_intensity_per_ton, co2_landfill_reference, co2_simplified};
pub use gis_index::{GisComponents, GisIndexCalculator, GisIndexParams, GisIndexResult};
pub use period::{PeriodResolver, PeriodWindow};
pub use random_source::{RandomSource, SeededRandom};
pub use semaphore::{IndicatorSnapshot, SemaphoreEngine, SemaphoreResult};
pub use trend::{regression_slope, relative_slope, TrendPolicy};
