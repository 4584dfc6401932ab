// ==========================================
// 生物废弃物绩效指标 - GIS 综合指数
// ==========================================
// 五项指标 min-max 归一化后加权求和，得分 0-100
//
// | 指标                 | 区间       | 反向 | 权重 |
// | 人均年收集量 kg      | [5, 80]    | 否   | 0.25 |
// | 质量 = 100 − 污染率  | [60, 100]  | 否   | 0.30 |
// | 每吨告警数           | [0, 10]    | 是   | 0.15 |
// | 每吨避免 CO2 (t)     | [0, 0.80]  | 否   | 0.15 |
// | 人均月袋数           | [0, 4]     | 否   | 0.15 |
//
// 红线: 先截断再反向；NaN 视为区间下限；区间与权重为固定常量
// ==========================================

use crate::domain::types::GisClassification;
use crate::engine::aggregation::{round_to, weighted_average};
use serde::{Deserialize, Serialize};

// ==========================================
// 指标区间与权重
// ==========================================

/// 单项指标的归一化规则
#[derive(Debug, Clone, Copy, PartialEq)]
struct IndicatorRule {
    min: f64,
    max: f64,
    invert: bool,
    weight: f64,
}

const KG_PER_CAPITA: IndicatorRule = IndicatorRule { min: 5.0, max: 80.0, invert: false, weight: 0.25 };
const QUALITY: IndicatorRule = IndicatorRule { min: 60.0, max: 100.0, invert: false, weight: 0.30 };
const ALERTS_PER_TON: IndicatorRule = IndicatorRule { min: 0.0, max: 10.0, invert: true, weight: 0.15 };
const CO2_PER_TON: IndicatorRule = IndicatorRule { min: 0.0, max: 0.80, invert: false, weight: 0.15 };
const BAGS_PER_CAPITA: IndicatorRule = IndicatorRule { min: 0.0, max: 4.0, invert: false, weight: 0.15 };

/// 单月快照缺少事件口径时假定的告警/吨
pub const ASSUMED_ALERTS_PER_TON: f64 = 0.5;

impl IndicatorRule {
    /// 截断 → 线性缩放到 [0,100] → 必要时反向
    fn normalize(&self, value: f64) -> f64 {
        let value = if value.is_nan() { self.min } else { value };
        let clamped = value.clamp(self.min, self.max);
        let norm = (clamped - self.min) / (self.max - self.min) * 100.0;
        if self.invert {
            100.0 - norm
        } else {
            norm
        }
    }
}

// ==========================================
// 输入 / 输出
// ==========================================

/// GIS 计算输入
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GisIndexParams {
    /// 人均年收集量 (kg/人/年)
    pub kg_per_capita_year: f64,

    /// 污染率 (%)
    pub contamination_rate: f64,

    /// 每吨告警数
    pub alerts_per_ton: f64,

    /// 每吨避免排放 (tCO2e/t)
    pub co2_avoided_per_ton: f64,

    /// 人均月袋数
    pub bags_per_capita_month: f64,
}

/// 五项归一化分量 (0-100)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GisComponents {
    pub x1_capture: f64,
    pub x2_quality: f64,
    pub x3_alerts: f64,
    pub x4_environment: f64,
    pub x5_coverage: f64,
}

/// GIS 计算结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GisIndexResult {
    /// 得分 (0-100, 1 位小数)
    pub score: f64,
    pub classification: GisClassification,
    pub components: GisComponents,
}

// ==========================================
// GisIndexCalculator - 综合指数计算器
// ==========================================
pub struct GisIndexCalculator;

impl GisIndexCalculator {
    /// 计算 GIS 综合指数
    ///
    /// # 参数
    /// - `params`: 五项原始指标
    ///
    /// # 返回
    /// GisIndexResult（得分恒在 [0,100]）
    pub fn calculate(params: &GisIndexParams) -> GisIndexResult {
        let components = GisComponents {
            x1_capture: KG_PER_CAPITA.normalize(params.kg_per_capita_year),
            x2_quality: QUALITY.normalize(100.0 - params.contamination_rate),
            x3_alerts: ALERTS_PER_TON.normalize(params.alerts_per_ton),
            x4_environment: CO2_PER_TON.normalize(params.co2_avoided_per_ton),
            x5_coverage: BAGS_PER_CAPITA.normalize(params.bags_per_capita_month),
        };

        let raw = KG_PER_CAPITA.weight * components.x1_capture
            + QUALITY.weight * components.x2_quality
            + ALERTS_PER_TON.weight * components.x3_alerts
            + CO2_PER_TON.weight * components.x4_environment
            + BAGS_PER_CAPITA.weight * components.x5_coverage;
        let score = round_to(raw, 1);

        GisIndexResult {
            score,
            classification: GisClassification::from_score(score),
            components,
        }
    }

    /// 人口加权汇总（例如堂区 → 市镇）
    ///
    /// # 参数
    /// - `units`: (人口, 得分) 列表
    ///
    /// # 返回
    /// 加权得分（1 位小数），总人口为 0 时为 0
    pub fn population_weighted(units: &[(f64, f64)]) -> f64 {
        round_to(weighted_average(units, |u| u.1, |u| u.0), 1)
    }
}
