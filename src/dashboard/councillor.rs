// ==========================================
// 生物废弃物绩效指标 - 市议员看板
// ==========================================
// 职责: 堂区级 GIS 排名、市镇人口加权汇总、近 3 个月走势、污染物类型构成
// 口径:
// - 人均年收集量按窗口月数年化
// - 告警/吨: 市镇全部事件按堂区重量占比分摊
// - 走势快照使用假定告警率 0.5 与假定 CO2/吨 0.7
// ==========================================

use crate::dashboard::filter::DashboardFilter;
use crate::dashboard::scope::PeriodScope;
use crate::domain::dataset::Dataset;
use crate::domain::entities::Parish;
use crate::domain::types::{GisClassification, TrendDirection};
use crate::engine::aggregation::{round_to, safe_ratio, weighted_average, CollectionTotals};
use crate::engine::co2::co2_complete;
use crate::engine::gis_index::{
    GisIndexCalculator, GisIndexParams, GisIndexResult, ASSUMED_ALERTS_PER_TON,
};
use crate::engine::period::PeriodResolver;
use crate::engine::trend::classify_band;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// 排行榜长度
const RANKING_SIZE: usize = 5;

/// 走势窗口月数
const TREND_MONTHS: usize = 3;

/// 走势中性带宽（GIS 分）
const TREND_BAND: f64 = 2.0;

/// 单月快照假定的 CO2/吨
const ASSUMED_CO2_PER_TON: f64 = 0.7;

/// 堂区 GIS 得分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParishGisScore {
    pub parish_id: String,
    pub municipality_id: String,
    pub name: String,
    pub population: u32,
    pub gis: GisIndexResult,
    pub kg_per_capita_year: f64,
    pub contamination_rate: f64,
    pub bio_tons: f64,
    pub bags_per_capita_month: f64,
    pub co2_avoided_tons: f64,
}

/// 市镇汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalityGisSummary {
    pub municipality_id: String,
    pub name: String,

    /// 人口加权 GIS
    pub gis_score: f64,
    pub classification: GisClassification,
    pub bio_tons: f64,
    pub contamination_rate: f64,
    pub co2_avoided_tons: f64,
    pub population: u64,
    pub kg_per_capita_year: f64,
}

/// 月度得分点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyScore {
    pub month: String,
    pub score: f64,
}

/// 堂区走势
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParishTrend {
    pub parish_id: String,
    pub name: String,
    pub scores: Vec<MonthlyScore>,
    pub trend: TrendDirection,
}

/// 污染物类型构成
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContaminationShare {
    pub type_id: String,
    pub name: String,
    pub color: String,
    pub kg: f64,
    pub pct: f64,
}

/// 市议员看板结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouncillorMetrics {
    pub months: Vec<String>,

    /// 按得分降序
    pub parish_scores: Vec<ParishGisScore>,
    pub municipality_summaries: Vec<MunicipalityGisSummary>,
    pub top_parishes: Vec<ParishGisScore>,
    pub bottom_parishes: Vec<ParishGisScore>,
    pub aggregate_gis_score: f64,
    pub aggregate_classification: GisClassification,
    pub parish_trends: Vec<ParishTrend>,
    pub contamination_by_type: Vec<ContaminationShare>,
}

/// 单堂区单窗口 GIS 计算（保留未舍入的中间量）
struct ParishWindowStats {
    totals: CollectionTotals,
    kg_per_capita_year: f64,
    bags_per_capita_month: f64,
    co2: f64,
    gis: GisIndexResult,
}

// ==========================================
// CouncillorAggregator - 市议员看板聚合器
// ==========================================
#[derive(Debug, Default)]
pub struct CouncillorAggregator;

impl CouncillorAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 计算市议员看板
    pub fn compute(&self, dataset: &Dataset, filter: &DashboardFilter) -> CouncillorMetrics {
        let scope = PeriodScope::resolve(dataset, filter);
        let parishes = dataset.parishes_in(scope.municipality);

        // 堂区得分
        let mut stats: Vec<(&Parish, ParishWindowStats)> = parishes
            .iter()
            .map(|p| (*p, self.parish_stats(&scope, p)))
            .collect();
        stats.sort_by(|a, b| b.1.gis.score.total_cmp(&a.1.gis.score));

        let parish_scores: Vec<ParishGisScore> = stats
            .iter()
            .map(|(p, s)| ParishGisScore {
                parish_id: p.id.clone(),
                municipality_id: p.municipality_id.clone(),
                name: p.name.clone(),
                population: p.population,
                gis: s.gis,
                kg_per_capita_year: round_to(s.kg_per_capita_year, 1),
                contamination_rate: round_to(s.totals.contamination_pct(), 1),
                bio_tons: round_to(s.totals.tons(), 1),
                bags_per_capita_month: round_to(s.bags_per_capita_month, 2),
                co2_avoided_tons: round_to(s.co2, 1),
            })
            .collect();

        let aggregate_gis_score = GisIndexCalculator::population_weighted(
            &parish_scores
                .iter()
                .map(|p| (p.population as f64, p.gis.score))
                .collect::<Vec<_>>(),
        );

        let top_parishes: Vec<ParishGisScore> =
            parish_scores.iter().take(RANKING_SIZE).cloned().collect();
        let bottom_parishes: Vec<ParishGisScore> =
            parish_scores.iter().rev().take(RANKING_SIZE).cloned().collect();

        debug!(
            municipality = ?scope.municipality,
            parishes = parish_scores.len(),
            aggregate_gis_score,
            "市议员看板汇总完成"
        );

        CouncillorMetrics {
            municipality_summaries: self.municipality_summaries(&scope, &stats),
            top_parishes,
            bottom_parishes,
            aggregate_gis_score,
            aggregate_classification: GisClassification::from_score(aggregate_gis_score),
            parish_trends: parishes.iter().map(|p| self.parish_trend(dataset, p)).collect(),
            contamination_by_type: contamination_by_type(&scope),
            parish_scores,
            months: scope.months().to_vec(),
        }
    }

    fn parish_stats(&self, scope: &PeriodScope<'_>, parish: &Parish) -> ParishWindowStats {
        let records = scope.current_records();
        let totals = CollectionTotals::from_records(
            records.iter().copied().filter(|r| r.parish_id == parish.id),
        );
        let month_count = scope.months().len();
        let population = parish.population as f64;

        let kg_per_capita_year = safe_ratio(totals.weight_kg, population) * scope.window.annualize_factor();
        let bags_per_capita_month = safe_ratio(safe_ratio(totals.bags, population), month_count as f64);

        // 市镇事件按重量占比分摊到堂区
        let municipality_incidents: usize = scope
            .dataset
            .incident_records(scope.months(), Some(parish.municipality_id.as_str()))
            .iter()
            .map(|r| r.incidents.len())
            .sum();
        let municipality_kg: f64 = records
            .iter()
            .filter(|r| r.municipality_id == parish.municipality_id)
            .map(|r| r.total_weight_kg)
            .sum();
        let parish_incidents =
            municipality_incidents as f64 * safe_ratio(totals.weight_kg, municipality_kg);
        let alerts_per_ton = safe_ratio(parish_incidents, totals.tons());

        let co2 = co2_complete(totals.tons(), totals.contamination_pct());
        let gis = GisIndexCalculator::calculate(&GisIndexParams {
            kg_per_capita_year,
            contamination_rate: totals.contamination_pct(),
            alerts_per_ton,
            co2_avoided_per_ton: safe_ratio(co2, totals.tons()),
            bags_per_capita_month,
        });

        ParishWindowStats {
            totals,
            kg_per_capita_year,
            bags_per_capita_month,
            co2,
            gis,
        }
    }

    fn municipality_summaries(
        &self,
        scope: &PeriodScope<'_>,
        stats: &[(&Parish, ParishWindowStats)],
    ) -> Vec<MunicipalityGisSummary> {
        scope
            .dataset
            .municipality_ids(scope.municipality)
            .into_iter()
            .map(|id| {
                let members: Vec<&(&Parish, ParishWindowStats)> =
                    stats.iter().filter(|(p, _)| p.municipality_id == id).collect();

                let population: u64 = members.iter().map(|(p, _)| p.population as u64).sum();
                let gis_score = round_to(
                    weighted_average(&members, |m| m.1.gis.score, |m| m.0.population as f64),
                    1,
                );
                let weight_kg: f64 = members.iter().map(|(_, s)| s.totals.weight_kg).sum();
                let contamination =
                    weighted_average(&members, |m| m.1.totals.contamination_pct(), |m| m.1.totals.weight_kg);
                let co2: f64 = members.iter().map(|(_, s)| s.co2).sum();
                let kg_per_capita_year =
                    safe_ratio(weight_kg, population as f64) * scope.window.annualize_factor();

                MunicipalityGisSummary {
                    name: scope.dataset.municipality_name(&id),
                    municipality_id: id,
                    gis_score,
                    // 等级取自展示的加权得分，不按市镇合计指标另算一次 GIS
                    classification: GisClassification::from_score(gis_score),
                    bio_tons: round_to(weight_kg / 1000.0, 1),
                    contamination_rate: round_to(contamination, 1),
                    co2_avoided_tons: round_to(co2, 1),
                    population,
                    kg_per_capita_year: round_to(kg_per_capita_year, 1),
                }
            })
            .collect()
    }

    /// 最近 3 个可用月份的单月 GIS 快照（与请求周期无关）
    fn parish_trend(&self, dataset: &Dataset, parish: &Parish) -> ParishTrend {
        let last = PeriodResolver::last_months(&dataset.available_months(), TREND_MONTHS);
        let population = parish.population as f64;

        let scores: Vec<MonthlyScore> = last
            .iter()
            .map(|month| {
                let totals = CollectionTotals::from_records(
                    dataset
                        .monthly_parish
                        .iter()
                        .filter(|r| r.parish_id == parish.id && &r.month == month),
                );
                let gis = GisIndexCalculator::calculate(&GisIndexParams {
                    kg_per_capita_year: safe_ratio(totals.weight_kg, population) * 12.0,
                    contamination_rate: totals.contamination_pct(),
                    alerts_per_ton: ASSUMED_ALERTS_PER_TON,
                    co2_avoided_per_ton: ASSUMED_CO2_PER_TON,
                    bags_per_capita_month: safe_ratio(totals.bags, population),
                });
                MonthlyScore {
                    month: month.clone(),
                    score: gis.score,
                }
            })
            .collect();

        let trend = match (scores.first(), scores.last()) {
            (Some(first), Some(last)) if scores.len() >= 2 => {
                classify_band(first.score, last.score, TREND_BAND)
            }
            _ => TrendDirection::Neutral,
        };

        ParishTrend {
            parish_id: parish.id.clone(),
            name: parish.name.clone(),
            scores,
            trend,
        }
    }
}

/// 污染物类型构成（按类型目录顺序）
fn contamination_by_type(scope: &PeriodScope<'_>) -> Vec<ContaminationShare> {
    let mut kg_by_type: BTreeMap<&str, f64> = BTreeMap::new();
    for record in scope.current_records() {
        for (type_id, kg) in &record.contamination_by_type {
            *kg_by_type.entry(type_id.as_str()).or_insert(0.0) += kg;
        }
    }
    let total: f64 = kg_by_type.values().sum();

    scope
        .dataset
        .contamination_types
        .iter()
        .map(|ct| {
            let kg = kg_by_type.get(ct.id.as_str()).copied().unwrap_or(0.0);
            ContaminationShare {
                type_id: ct.id.clone(),
                name: ct.name.clone(),
                color: ct.color.clone(),
                kg: round_to(kg, 1),
                pct: round_to(safe_ratio(kg, total) * 100.0, 1),
            }
        })
        .collect()
}
