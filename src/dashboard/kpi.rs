// ==========================================
// 生物废弃物绩效指标 - KPI 卡片
// ==========================================

use crate::engine::aggregation::{pct_change, round_to};
use serde::{Deserialize, Serialize};

/// 迷你折线点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparklinePoint {
    pub month: String,
    pub value: f64,
}

/// KPI 卡片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiCard {
    pub label: String,
    pub value: f64,
    pub unit: String,

    /// 相对上一窗口的变化率 (%)
    pub change_pct: f64,

    #[serde(default)]
    pub sparkline: Vec<SparklinePoint>,
}

impl KpiCard {
    /// 构造卡片：value 按 decimals 舍入，变化率按当前/上期原值计算
    pub fn new(label: &str, unit: &str, current: f64, previous: f64, decimals: u32) -> Self {
        Self {
            label: label.to_string(),
            value: round_to(current, decimals),
            unit: unit.to_string(),
            change_pct: pct_change(current, previous),
            sparkline: Vec::new(),
        }
    }

    /// 无环比的卡片（例如增长率本身）
    pub fn value_only(label: &str, unit: &str, value: f64, decimals: u32) -> Self {
        Self {
            label: label.to_string(),
            value: round_to(value, decimals),
            unit: unit.to_string(),
            change_pct: 0.0,
            sparkline: Vec::new(),
        }
    }

    pub fn with_sparkline(mut self, sparkline: Vec<SparklinePoint>) -> Self {
        self.sparkline = sparkline;
        self
    }
}

/// 按月份构造折线，数值保留 2 位小数
pub fn sparkline<F>(months: &[String], value: F) -> Vec<SparklinePoint>
where
    F: Fn(&str) -> f64,
{
    months
        .iter()
        .map(|month| SparklinePoint {
            month: month.clone(),
            value: round_to(value(month), 2),
        })
        .collect()
}
