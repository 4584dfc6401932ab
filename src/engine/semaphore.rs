// ==========================================
// 生物废弃物绩效指标 - 信号灯引擎
// ==========================================
// 固定窗口: 最近 6 个可用月份（与看板请求周期无关），可按市镇过滤
// S1 收集量是否在保质增长: 3 个负面信号 → 绿/黄/橙/红
// S2 环境影响是否在改善: CO2/吨 与 填埋转移率 两个趋势
// S3 沼气潜力是否在上升: 相对斜率分档
// 红线: 三个信号灯各自独立计算，不合并
// ==========================================

use crate::domain::dataset::Dataset;
use crate::domain::types::{SemaphoreColor, Severity, TrendDirection};
use crate::engine::aggregation::{mean, round_to, safe_ratio, totals_by_month, CollectionTotals};
use crate::engine::co2::co2_simplified;
use crate::engine::trend::{regression_slope, relative_slope, TrendPolicy};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 信号灯窗口月数
pub const SEMAPHORE_WINDOW_MONTHS: usize = 6;

/// 每吨干净生物废弃物的沼气产量 (m³)
pub const BIOGAS_M3_PER_TON: f64 = 120.0;

/// 严重告警/吨 均值超过该值即视为负面
const CRITICAL_ALERTS_MEAN_LIMIT: f64 = 0.5;

/// 指标快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub indicator: String,
    pub value: f64,
    pub trend: TrendDirection,
}

impl IndicatorSnapshot {
    fn new(indicator: &str, value: f64, trend: TrendDirection) -> Self {
        Self {
            indicator: indicator.to_string(),
            value,
            trend,
        }
    }
}

/// 信号灯结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemaphoreResult {
    pub id: String,
    pub question: String,
    pub color: SemaphoreColor,
    pub rationale: String,
    pub indicators: Vec<IndicatorSnapshot>,
}

/// 窗口内逐月汇总（月份升序）
struct MonthlyWindow {
    months: Vec<String>,
    totals: Vec<CollectionTotals>,
}

impl MonthlyWindow {
    fn load(dataset: &Dataset, municipality: Option<&str>) -> Self {
        let filtered = dataset
            .monthly_parish
            .iter()
            .filter(|r| municipality.map_or(true, |id| r.municipality_id == id));
        let by_month = totals_by_month(filtered);
        let skip = by_month.len().saturating_sub(SEMAPHORE_WINDOW_MONTHS);

        let (months, totals): (Vec<String>, Vec<CollectionTotals>) = by_month.into_iter().skip(skip).unzip();
        Self { months, totals }
    }

    fn series<F: Fn(&CollectionTotals) -> f64>(&self, f: F) -> Vec<f64> {
        self.totals.iter().map(f).collect()
    }
}

fn last_or_zero(values: &[f64]) -> f64 {
    values.last().copied().unwrap_or(0.0)
}

// ==========================================
// SemaphoreEngine - 信号灯引擎
// ==========================================
pub struct SemaphoreEngine;

impl SemaphoreEngine {
    /// 计算全部三个信号灯
    pub fn compute_all(dataset: &Dataset, municipality: Option<&str>) -> Vec<SemaphoreResult> {
        vec![
            Self::growth_with_quality(dataset, municipality),
            Self::environmental_impact(dataset, municipality),
            Self::biogas_potential(dataset, municipality),
        ]
    }

    /// S1: 收集量是否在保质增长
    ///
    /// 负面信号: 收集量趋势负面 / 污染率趋势负面 / 严重告警偏高（均值 > 0.5 或趋势负面）
    pub fn growth_with_quality(dataset: &Dataset, municipality: Option<&str>) -> SemaphoreResult {
        let window = MonthlyWindow::load(dataset, municipality);

        let volume = window.series(|t| t.weight_kg);
        let volume_slope = regression_slope(&volume);
        let volume_trend = TrendPolicy::VOLUME.classify(volume_slope);

        let contamination = window.series(|t| t.contamination_pct());
        let contamination_slope = regression_slope(&contamination);
        let contamination_trend = TrendPolicy::CONTAMINATION.classify(contamination_slope);

        // 每月严重事件数 / 吨
        let alerts: Vec<f64> = window
            .months
            .iter()
            .zip(window.totals.iter())
            .map(|(month, totals)| {
                let criticals: usize = dataset
                    .monthly_incidents
                    .iter()
                    .filter(|r| &r.month == month)
                    .filter(|r| municipality.map_or(true, |id| r.municipality_id == id))
                    .map(|r| r.count_by_severity(Severity::Critical))
                    .sum();
                safe_ratio(criticals as f64, totals.tons())
            })
            .collect();
        let alerts_slope = regression_slope(&alerts);
        let alerts_mean = mean(&alerts);
        let alerts_trend = TrendPolicy::CRITICAL_ALERTS.classify(alerts_slope);

        let flags = [
            volume_trend.is_negative(),
            contamination_trend.is_negative(),
            alerts_mean > CRITICAL_ALERTS_MEAN_LIMIT || alerts_trend.is_negative(),
        ];
        let negatives = flags.iter().filter(|f| **f).count();
        let color = SemaphoreColor::from_negative_count(negatives);

        debug!(
            municipality = ?municipality,
            volume_slope,
            contamination_slope,
            alerts_mean,
            negatives,
            color = %color,
            "S1 计算完成"
        );

        let rationale = match color {
            SemaphoreColor::Green => "收集量增长，质量稳定，严重告警频率低",
            SemaphoreColor::Yellow => "一项指标需要关注",
            SemaphoreColor::Orange => "两项指标趋势负面，需要干预",
            SemaphoreColor::Red => "全部指标负面，需要紧急处置",
        };

        SemaphoreResult {
            id: "SEM-01".to_string(),
            question: "生物废弃物是否在保质增长？".to_string(),
            color,
            rationale: rationale.to_string(),
            indicators: vec![
                IndicatorSnapshot::new("volume_growth_kg_per_month", volume_slope.round(), volume_trend),
                IndicatorSnapshot::new(
                    "contamination_rate",
                    round_to(last_or_zero(&contamination), 1),
                    contamination_trend,
                ),
                IndicatorSnapshot::new("critical_alerts_per_ton", round_to(alerts_mean, 2), alerts_trend),
            ],
        }
    }

    /// S2: 环境影响是否在改善
    ///
    /// 两项均非负面 → 绿；两项均负面 → 红；其余 → 黄
    pub fn environmental_impact(dataset: &Dataset, municipality: Option<&str>) -> SemaphoreResult {
        let window = MonthlyWindow::load(dataset, municipality);

        let co2_per_ton = window.series(|t| {
            safe_ratio(co2_simplified(t.tons(), t.contamination_pct()), t.tons())
        });
        let co2_slope = regression_slope(&co2_per_ton);
        let co2_trend = TrendPolicy::CO2_PER_TON.classify(co2_slope);

        let diversion = window.series(|t| 100.0 - t.contamination_pct());
        let diversion_slope = regression_slope(&diversion);
        let diversion_trend = TrendPolicy::DIVERSION.classify(diversion_slope);

        let color = match (co2_trend.is_negative(), diversion_trend.is_negative()) {
            (false, false) => SemaphoreColor::Green,
            (true, true) => SemaphoreColor::Red,
            _ => SemaphoreColor::Yellow,
        };

        debug!(
            municipality = ?municipality,
            co2_slope,
            diversion_slope,
            color = %color,
            "S2 计算完成"
        );

        let rationale = match color {
            SemaphoreColor::Green => "避免排放与填埋转移率趋势向好",
            SemaphoreColor::Red => "两项环境指标均在下滑",
            _ => "一项环境指标需要关注",
        };

        SemaphoreResult {
            id: "SEM-02".to_string(),
            question: "环境影响是否在改善？".to_string(),
            color,
            rationale: rationale.to_string(),
            indicators: vec![
                IndicatorSnapshot::new("co2_avoided_per_ton", round_to(last_or_zero(&co2_per_ton), 3), co2_trend),
                IndicatorSnapshot::new("landfill_diversion_pct", round_to(last_or_zero(&diversion), 1), diversion_trend),
            ],
        }
    }

    /// S3: 沼气潜力是否在上升
    ///
    /// 相对斜率 > 0.02 绿, > −0.01 黄, > −0.03 橙, 其余红
    pub fn biogas_potential(dataset: &Dataset, municipality: Option<&str>) -> SemaphoreResult {
        let window = MonthlyWindow::load(dataset, municipality);

        let biogas = window.series(|t| {
            t.tons() * (1.0 - t.contamination_pct() / 100.0) * BIOGAS_M3_PER_TON
        });
        let rel = relative_slope(&biogas);

        let (color, trend) = if rel > 0.02 {
            (SemaphoreColor::Green, TrendDirection::Positive)
        } else if rel > -0.01 {
            (SemaphoreColor::Yellow, TrendDirection::Neutral)
        } else if rel > -0.03 {
            (SemaphoreColor::Orange, TrendDirection::Negative)
        } else {
            (SemaphoreColor::Red, TrendDirection::Negative)
        };

        debug!(municipality = ?municipality, relative_slope = rel, color = %color, "S3 计算完成");

        let rationale = match color {
            SemaphoreColor::Green => "沼气潜在产量在增长",
            SemaphoreColor::Yellow => "产量平稳，无明显增长",
            _ => "沼气产量下滑，请检查质量与收集量",
        };

        SemaphoreResult {
            id: "SEM-03".to_string(),
            question: "沼气潜在产量是否在上升？".to_string(),
            color,
            rationale: rationale.to_string(),
            indicators: vec![
                IndicatorSnapshot::new("biogas_potential_m3_per_month", last_or_zero(&biogas).round(), trend),
                IndicatorSnapshot::new("six_month_trend_pct", round_to(rel * 100.0, 2), trend),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::{Incident, MonthlyIncidentRecord, MonthlyParishRecord};
    use chrono::NaiveDate;

    fn record(month: &str, weight_kg: f64, contamination: f64) -> MonthlyParishRecord {
        MonthlyParishRecord {
            month: month.to_string(),
            parish_id: "P1".to_string(),
            municipality_id: "M1".to_string(),
            bag_count: (weight_kg / 8.0) as u32,
            total_weight_kg: weight_kg,
            total_volume_m3: 1.0,
            avg_bag_weight_kg: 8.0,
            contamination_rate: contamination,
            rejected_bags: 0,
            contamination_by_type: Default::default(),
        }
    }

    fn critical_incidents(month: &str, count: usize) -> MonthlyIncidentRecord {
        let occurred_at = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        MonthlyIncidentRecord {
            month: month.to_string(),
            municipality_id: "M1".to_string(),
            incidents: (0..count)
                .map(|i| Incident {
                    id: format!("INC-{}-{}", month, i),
                    kind: "blockage".to_string(),
                    severity: Severity::Critical,
                    sector: "reception".to_string(),
                    occurred_at,
                    resolution_minutes: 20,
                    resolved: true,
                })
                .collect(),
        }
    }

    fn dataset(weights: &[f64], contamination: &[f64]) -> Dataset {
        let monthly_parish = weights
            .iter()
            .zip(contamination.iter())
            .enumerate()
            .map(|(i, (w, c))| record(&format!("2025-{:02}", i + 1), *w, *c))
            .collect();
        Dataset {
            monthly_parish,
            ..Default::default()
        }
    }

    #[test]
    fn test_s1_green_when_growing_and_clean() {
        let ds = dataset(
            &[10_000.0, 11_000.0, 12_000.0, 13_000.0, 14_000.0, 15_000.0],
            &[10.0; 6],
        );
        let s1 = SemaphoreEngine::growth_with_quality(&ds, None);
        assert_eq!(s1.id, "SEM-01");
        assert_eq!(s1.color, SemaphoreColor::Green);
        assert_eq!(s1.indicators[0].value, 1000.0);
        assert_eq!(s1.indicators[0].trend, TrendDirection::Positive);
    }

    #[test]
    fn test_s1_monotone_in_flag_count() {
        // 1 个负面: 收集量下降
        let ds = dataset(
            &[15_000.0, 14_000.0, 13_000.0, 12_000.0, 11_000.0, 10_000.0],
            &[10.0; 6],
        );
        let one = SemaphoreEngine::growth_with_quality(&ds, None).color;

        // 2 个负面: 收集量下降 + 污染上升
        let ds = dataset(
            &[15_000.0, 14_000.0, 13_000.0, 12_000.0, 11_000.0, 10_000.0],
            &[8.0, 9.0, 10.0, 11.0, 12.0, 13.0],
        );
        let two = SemaphoreEngine::growth_with_quality(&ds, None).color;

        // 3 个负面: 再加上大量严重告警（每月 15 个，≥1.0/t）
        let mut ds = dataset(
            &[15_000.0, 14_000.0, 13_000.0, 12_000.0, 11_000.0, 10_000.0],
            &[8.0, 9.0, 10.0, 11.0, 12.0, 13.0],
        );
        ds.monthly_incidents = (1..=6)
            .map(|i| critical_incidents(&format!("2025-{:02}", i), 15))
            .collect();
        let three = SemaphoreEngine::growth_with_quality(&ds, None).color;

        assert_eq!(one, SemaphoreColor::Yellow);
        assert_eq!(two, SemaphoreColor::Orange);
        assert_eq!(three, SemaphoreColor::Red);
        assert!(SemaphoreColor::Green < one && one < two && two < three);
    }

    #[test]
    fn test_window_uses_last_six_months() {
        // 前 3 个月暴跌，后 6 个月增长：只看后 6 个月
        let ds = dataset(
            &[90_000.0, 50_000.0, 10_000.0, 10_000.0, 11_000.0, 12_000.0, 13_000.0, 14_000.0, 15_000.0],
            &[10.0; 9],
        );
        let s1 = SemaphoreEngine::growth_with_quality(&ds, None);
        assert_eq!(s1.indicators[0].trend, TrendDirection::Positive);
    }

    #[test]
    fn test_s2_red_when_quality_collapses() {
        let ds = dataset(&[10_000.0; 6], &[5.0, 10.0, 15.0, 20.0, 25.0, 30.0]);
        let s2 = SemaphoreEngine::environmental_impact(&ds, None);
        assert_eq!(s2.color, SemaphoreColor::Red);
        assert_eq!(s2.indicators[1].value, 70.0);
    }

    #[test]
    fn test_s2_green_when_stable() {
        let ds = dataset(&[10_000.0; 6], &[10.0; 6]);
        let s2 = SemaphoreEngine::environmental_impact(&ds, None);
        assert_eq!(s2.color, SemaphoreColor::Green);
        assert_eq!(s2.indicators[0].value, 0.72);
    }

    #[test]
    fn test_s3_bands() {
        let growing = dataset(&[10_000.0, 11_000.0, 12_000.0, 13_000.0, 14_000.0, 15_000.0], &[10.0; 6]);
        assert_eq!(SemaphoreEngine::biogas_potential(&growing, None).color, SemaphoreColor::Green);

        let flat = dataset(&[10_000.0; 6], &[10.0; 6]);
        assert_eq!(SemaphoreEngine::biogas_potential(&flat, None).color, SemaphoreColor::Yellow);

        let falling = dataset(&[15_000.0, 14_000.0, 13_000.0, 12_000.0, 11_000.0, 10_000.0], &[10.0; 6]);
        assert_eq!(SemaphoreEngine::biogas_potential(&falling, None).color, SemaphoreColor::Red);
    }

    #[test]
    fn test_empty_dataset_is_neutral() {
        let ds = Dataset::default();
        let all = SemaphoreEngine::compute_all(&ds, None);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].color, SemaphoreColor::Green);
        assert_eq!(all[2].indicators[0].value, 0.0);
    }

    #[test]
    fn test_municipality_filter() {
        let ds = dataset(&[10_000.0; 6], &[10.0; 6]);
        let s1 = SemaphoreEngine::growth_with_quality(&ds, Some("M2"));
        assert_eq!(s1.indicators[0].value, 0.0);
    }
}
