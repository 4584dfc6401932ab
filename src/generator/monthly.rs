// ==========================================
// 生物废弃物绩效指标 - 月度记录生成
// ==========================================
// 职责: 堂区月度收集、市镇事件、成本、城市垃圾总量
// 模型: 人口比例 × 季节系数 × 复合增长 × 噪声
// ==========================================

use crate::domain::entities::{ContaminationType, Municipality, Parish};
use crate::domain::records::{
    Incident, MonthlyCostRecord, MonthlyIncidentRecord, MonthlyParishRecord,
    MonthlyUrbanWasteRecord,
};
use crate::domain::types::Severity;
use crate::engine::aggregation::{round_to, safe_ratio};
use crate::engine::random_source::RandomSource;
use crate::generator::reference::profile;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

// ==========================================
// 收集量参数
// ==========================================

/// 季节系数（1 月 .. 12 月）
const SEASONAL: [f64; 12] = [0.85, 0.87, 0.92, 0.95, 1.0, 1.08, 1.15, 1.2, 1.1, 1.0, 0.93, 0.9];

/// 月复合增长率
const GROWTH_RATE: f64 = 0.015;

/// 每 10 位居民每月袋数
const BAGS_PER_10_INHABITANTS: f64 = 1.0;

/// 单袋重量分布 (kg)
const BAG_WEIGHT_MEAN: f64 = 8.0;
const BAG_WEIGHT_STD: f64 = 3.0;
const BAG_WEIGHT_MIN: f64 = 0.5;
const BAG_WEIGHT_MAX: f64 = 30.0;

/// 单袋体积 (m³)
const VOLUME_PER_BAG_M3: f64 = 0.012;

const NOISE: f64 = 0.15;

/// 拒收率基准（约 3%）
const REJECTION_BASE: f64 = 0.03;

// ==========================================
// 事件参数
// ==========================================

const INCIDENT_KINDS: [(&str, f64); 6] = [
    ("belt_failure", 0.25),
    ("blockage", 0.20),
    ("critical_contamination", 0.15),
    ("sensor_failure", 0.15),
    ("rfid_error", 0.15),
    ("maintenance", 0.10),
];

const SEVERITY_WEIGHTS: [f64; 4] = [0.35, 0.35, 0.20, 0.10];

const INCIDENT_SECTORS: [&str; 5] = ["sorting", "reception", "weighing", "compaction", "unloading"];

const MTTR_MEAN: f64 = 18.0;
const MTTR_STD: f64 = 8.0;

/// 成本拆分：收集 / 处理 / 运输 / 人工 / 管理
const COST_SPLIT: [f64; 5] = [0.35, 0.25, 0.15, 0.20, 0.05];

/// 从 first_month 起连续 count 个月 (YYYY-MM)
pub fn month_sequence(first: NaiveDate, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let index = first.year() * 12 + first.month0() as i32 + i as i32;
            format!("{}-{:02}", index / 12, index % 12 + 1)
        })
        .collect()
}

fn parse_month(month: &str) -> Option<(i32, u32)> {
    let (year, month) = month.split_once('-')?;
    Some((year.parse().ok()?, month.parse().ok()?))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

// ==========================================
// 堂区月度收集
// ==========================================

pub fn parish_records(
    parishes: &[Parish],
    contamination_types: &[ContaminationType],
    months: &[String],
    rng: &mut dyn RandomSource,
) -> Vec<MonthlyParishRecord> {
    let mut records = Vec::with_capacity(parishes.len() * months.len());

    for parish in parishes {
        let base_contamination = profile(&parish.municipality_id).contamination_base_pct;

        for (i, month) in months.iter().enumerate() {
            let month0 = parse_month(month).map(|(_, m)| (m as usize).saturating_sub(1)).unwrap_or(0);
            let seasonal = SEASONAL.get(month0).copied().unwrap_or(1.0);
            let growth = (1.0 + GROWTH_RATE).powi(i as i32);
            let base_bags = parish.population as f64 / 10.0 * BAGS_PER_10_INHABITANTS;

            let bag_count = rng.with_noise(base_bags * seasonal * growth, NOISE).round().max(0.0) as u32;
            let avg_weight = rng
                .normal(BAG_WEIGHT_MEAN, BAG_WEIGHT_STD)
                .clamp(BAG_WEIGHT_MIN, BAG_WEIGHT_MAX);
            let total_weight_kg = (bag_count as f64 * avg_weight).round();

            let contamination_rate = round_to(
                rng.with_noise(base_contamination, 0.2)
                    .clamp(base_contamination * 0.5, base_contamination * 2.0),
                1,
            );
            let rejection = rng.with_noise(REJECTION_BASE, 0.3).clamp(0.01, 0.08);

            records.push(MonthlyParishRecord {
                month: month.clone(),
                parish_id: parish.id.clone(),
                municipality_id: parish.municipality_id.clone(),
                bag_count,
                total_weight_kg,
                total_volume_m3: round_to(bag_count as f64 * VOLUME_PER_BAG_M3, 2),
                avg_bag_weight_kg: round_to(safe_ratio(total_weight_kg, bag_count as f64), 1),
                contamination_rate,
                rejected_bags: (bag_count as f64 * rejection).round() as u32,
                contamination_by_type: split_contamination(
                    total_weight_kg * contamination_rate / 100.0,
                    contamination_types,
                    rng,
                ),
            });
        }
    }

    records
}

/// 污染物重量按类型拆分，最后一类取余量
fn split_contamination(
    contaminated_kg: f64,
    types: &[ContaminationType],
    rng: &mut dyn RandomSource,
) -> BTreeMap<String, f64> {
    let mut split = BTreeMap::new();
    let mut assigned = 0.0;

    for (j, kind) in types.iter().enumerate() {
        let kg = if j + 1 == types.len() {
            round_to(contaminated_kg - assigned, 1)
        } else {
            let fraction = rng.with_noise(kind.typical_share_pct / 100.0, 0.25).clamp(0.01, 0.5);
            round_to(contaminated_kg * fraction, 1)
        };
        assigned += kg;
        split.insert(kind.id.clone(), kg);
    }

    split
}

// ==========================================
// 市镇月度事件
// ==========================================

pub fn incident_records(
    municipalities: &[Municipality],
    months: &[String],
    rng: &mut dyn RandomSource,
) -> Vec<MonthlyIncidentRecord> {
    let kind_weights: Vec<f64> = INCIDENT_KINDS.iter().map(|k| k.1).collect();
    let mut counter = 0u32;
    let mut records = Vec::with_capacity(municipalities.len() * months.len());

    for municipality in municipalities {
        for month in months {
            let Some((year, month_no)) = parse_month(month) else {
                continue;
            };
            let days = days_in_month(year, month_no);
            let count = rng.with_noise(6.5, 0.3).clamp(3.0, 12.0).round() as usize;

            let mut incidents: Vec<Incident> = (0..count)
                .filter_map(|_| {
                    counter += 1;
                    let day = rng.int_in(1, days as i64) as u32;
                    let hour = rng.int_in(6, 22) as u32;
                    let minute = rng.int_in(0, 59) as u32;
                    let kind = INCIDENT_KINDS[rng.weighted_index(&kind_weights)].0;
                    let severity = Severity::ALL[rng.weighted_index(&SEVERITY_WEIGHTS)];
                    let resolution_minutes =
                        rng.normal(MTTR_MEAN, MTTR_STD).clamp(3.0, 90.0).round() as u32;
                    // 危急事件更难当月解决
                    let resolved = if severity == Severity::Critical {
                        rng.next_f64() > 0.15
                    } else {
                        rng.next_f64() > 0.05
                    };
                    let sector = INCIDENT_SECTORS[rng.index(INCIDENT_SECTORS.len())];

                    let occurred_at = NaiveDate::from_ymd_opt(year, month_no, day)?
                        .and_hms_opt(hour, minute, 0)?;

                    Some(Incident {
                        id: format!("INC-{:05}", counter),
                        kind: kind.to_string(),
                        severity,
                        sector: sector.to_string(),
                        occurred_at,
                        resolution_minutes,
                        resolved,
                    })
                })
                .collect();
            incidents.sort_by(|a, b| a.occurred_at.cmp(&b.occurred_at));

            records.push(MonthlyIncidentRecord {
                month: month.clone(),
                municipality_id: municipality.id.clone(),
                incidents,
            });
        }
    }

    records
}

// ==========================================
// 市镇月度成本与城市垃圾总量
// ==========================================

fn municipality_month_kg(records: &[MonthlyParishRecord]) -> BTreeMap<(&str, &str), f64> {
    let mut kg: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for r in records {
        *kg.entry((r.municipality_id.as_str(), r.month.as_str())).or_default() += r.total_weight_kg;
    }
    kg
}

pub fn cost_records(
    municipalities: &[Municipality],
    months: &[String],
    parish_records: &[MonthlyParishRecord],
    rng: &mut dyn RandomSource,
) -> Vec<MonthlyCostRecord> {
    let kg = municipality_month_kg(parish_records);
    let mut records = Vec::with_capacity(municipalities.len() * months.len());

    for municipality in municipalities {
        let cost_per_ton = profile(&municipality.id).cost_per_ton_eur;
        for month in months {
            let tons = kg
                .get(&(municipality.id.as_str(), month.as_str()))
                .copied()
                .unwrap_or(0.0)
                / 1000.0;
            let total = rng.with_noise(tons * cost_per_ton, 0.08);
            let [collection, treatment, transport, labour, overhead] =
                COST_SPLIT.map(|share| round_to(total * share, 2));

            records.push(MonthlyCostRecord {
                month: month.clone(),
                municipality_id: municipality.id.clone(),
                collection_eur: collection,
                treatment_eur: treatment,
                transport_eur: transport,
                labour_eur: labour,
                overhead_eur: overhead,
                total_eur: round_to(collection + treatment + transport + labour + overhead, 2),
            });
        }
    }

    records
}

/// 城市垃圾总量：由生物废弃物量按目标占比反推
pub fn urban_waste_records(
    municipalities: &[Municipality],
    months: &[String],
    parish_records: &[MonthlyParishRecord],
    rng: &mut dyn RandomSource,
) -> Vec<MonthlyUrbanWasteRecord> {
    let kg = municipality_month_kg(parish_records);
    let mut records = Vec::with_capacity(municipalities.len() * months.len());

    for municipality in municipalities {
        let target = profile(&municipality.id).bio_share_target;
        for month in months {
            let bio_tons = kg
                .get(&(municipality.id.as_str(), month.as_str()))
                .copied()
                .unwrap_or(0.0)
                / 1000.0;
            let share = rng.with_noise(target, 0.10);

            records.push(MonthlyUrbanWasteRecord {
                month: month.clone(),
                municipality_id: municipality.id.clone(),
                total_urban_waste_ton: round_to(safe_ratio(bio_tons, share), 1),
            });
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::random_source::SeededRandom;
    use crate::generator::reference;

    #[test]
    fn test_month_sequence_crosses_year() {
        let first = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let months = month_sequence(first, 12);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], "2025-02");
        assert_eq!(months[10], "2025-12");
        assert_eq!(months[11], "2026-01");
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn test_parish_records_ranges() {
        let parishes = reference::parishes();
        let types = reference::contamination_types();
        let months = vec!["2025-06".to_string(), "2025-07".to_string()];
        let mut rng = SeededRandom::default();
        let records = parish_records(&parishes, &types, &months, &mut rng);

        assert_eq!(records.len(), 36);
        for r in &records {
            let base = profile(&r.municipality_id).contamination_base_pct;
            assert!(r.contamination_rate >= base * 0.5 - 1e-9);
            assert!(r.contamination_rate <= base * 2.0 + 1e-9);
            assert!(r.rejected_bags <= r.bag_count);
            assert_eq!(r.contamination_by_type.len(), 7);
            // 各类污染物合计 ≈ 污染物总重
            let split: f64 = r.contamination_by_type.values().sum();
            let expected = r.total_weight_kg * r.contamination_rate / 100.0;
            assert!((split - expected).abs() < 0.2, "{} vs {}", split, expected);
        }
    }

    #[test]
    fn test_incidents_sorted_and_bounded() {
        let municipalities = reference::municipalities();
        let months = vec!["2025-02".to_string()];
        let records = incident_records(&municipalities, &months, &mut SeededRandom::default());

        assert_eq!(records.len(), 4);
        for r in &records {
            assert!((3..=12).contains(&r.incidents.len()));
            let times: Vec<_> = r.incidents.iter().map(|i| i.occurred_at).collect();
            assert!(times.windows(2).all(|w| w[0] <= w[1]));
            for i in &r.incidents {
                assert!((3..=90).contains(&i.resolution_minutes));
                assert_eq!(i.occurred_at.date().month(), 2);
            }
        }
    }

    #[test]
    fn test_costs_sum_of_categories() {
        let municipalities = reference::municipalities();
        let parishes = reference::parishes();
        let types = reference::contamination_types();
        let months = vec!["2025-03".to_string()];
        let mut rng = SeededRandom::default();
        let parish = parish_records(&parishes, &types, &months, &mut rng);
        let costs = cost_records(&municipalities, &months, &parish, &mut rng);

        assert_eq!(costs.len(), 4);
        for c in &costs {
            let sum = c.collection_eur + c.treatment_eur + c.transport_eur + c.labour_eur + c.overhead_eur;
            assert!((sum - c.total_eur).abs() < 0.01);
            assert!(c.total_eur > 0.0);
        }
    }
}
