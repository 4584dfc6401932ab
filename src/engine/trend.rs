// ==========================================
// 生物废弃物绩效指标 - 趋势回归分类
// ==========================================
// 职责: 最小二乘斜率、相对斜率、按调用点阈值分类
// 红线: 阈值随信号不同，不得共用一个常量
// ==========================================

use crate::domain::types::TrendDirection;
use crate::engine::aggregation::{mean, safe_ratio};

/// 普通最小二乘斜率（x = 0..n−1）
///
/// n < 2 或分母为 0 时返回 0
pub fn regression_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let x_mean = (n as f64 - 1.0) / 2.0;
    let y_mean = mean(values);

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }

    safe_ratio(num, den)
}

/// 相对斜率 = 斜率 / 均值（均值为 0 时为 0）
pub fn relative_slope(values: &[f64]) -> f64 {
    safe_ratio(regression_slope(values), mean(values))
}

// ==========================================
// TrendPolicy - 分类阈值
// ==========================================

/// 趋势分类策略
///
/// `higher_is_better = true` 时: slope > positive_above → 正面, slope < negative_below → 负面
/// `higher_is_better = false` 时: slope < positive_below → 正面, slope > negative_above → 负面
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrendPolicy {
    HigherIsBetter { positive_above: f64, negative_below: f64 },
    LowerIsBetter { positive_below: f64, negative_above: f64 },
}

impl TrendPolicy {
    /// 收集量 (kg/月)
    pub const VOLUME: TrendPolicy = TrendPolicy::HigherIsBetter { positive_above: 0.0, negative_below: -50.0 };
    /// 污染率 (%)
    pub const CONTAMINATION: TrendPolicy = TrendPolicy::LowerIsBetter { positive_below: -0.1, negative_above: 0.1 };
    /// 严重告警/吨
    pub const CRITICAL_ALERTS: TrendPolicy = TrendPolicy::LowerIsBetter { positive_below: 0.0, negative_above: 0.01 };
    /// 每吨避免 CO2
    pub const CO2_PER_TON: TrendPolicy = TrendPolicy::HigherIsBetter { positive_above: 0.0, negative_below: -0.005 };
    /// 填埋转移率 (%)
    pub const DIVERSION: TrendPolicy = TrendPolicy::HigherIsBetter { positive_above: 0.0, negative_below: -0.1 };
    /// 相对斜率（卡片上的收集量与污染率趋势）
    pub const RELATIVE: TrendPolicy = TrendPolicy::HigherIsBetter { positive_above: 0.02, negative_below: -0.02 };

    /// 按阈值分类一个斜率
    pub fn classify(&self, slope: f64) -> TrendDirection {
        match *self {
            TrendPolicy::HigherIsBetter { positive_above, negative_below } => {
                if slope > positive_above {
                    TrendDirection::Positive
                } else if slope < negative_below {
                    TrendDirection::Negative
                } else {
                    TrendDirection::Neutral
                }
            }
            TrendPolicy::LowerIsBetter { positive_below, negative_above } => {
                if slope < positive_below {
                    TrendDirection::Positive
                } else if slope > negative_above {
                    TrendDirection::Negative
                } else {
                    TrendDirection::Neutral
                }
            }
        }
    }
}

/// 首尾差值的带宽分类（例如堂区 3 个月 GIS 走势，±band 为中性）
pub fn classify_band(first: f64, last: f64, band: f64) -> TrendDirection {
    if last > first + band {
        TrendDirection::Positive
    } else if last < first - band {
        TrendDirection::Negative
    } else {
        TrendDirection::Neutral
    }
}
