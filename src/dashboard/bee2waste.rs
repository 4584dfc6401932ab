// ==========================================
// 生物废弃物绩效指标 - Bee2Waste 运营商看板
// ==========================================
// 职责: 市镇卡片、系统总量、系统健康、车队、环境、月度趋势、综合 GIS、污染热力图
// 口径: 卡片与综合 GIS 的告警项使用真实事件数/吨；月度快照使用假定值
// ==========================================

use crate::config::ModelParameters;
use crate::dashboard::ceo::clean_tons;
use crate::dashboard::filter::DashboardFilter;
use crate::dashboard::scope::PeriodScope;
use crate::domain::dataset::Dataset;
use crate::domain::records::{Incident, MonthlyParishRecord};
use crate::domain::types::TrendDirection;
use crate::engine::aggregation::{round_to, safe_ratio, totals_by_month, CollectionTotals};
use crate::engine::co2::co2_complete;
use crate::engine::gis_index::{
    GisIndexCalculator, GisIndexParams, GisIndexResult, ASSUMED_ALERTS_PER_TON,
};
use crate::engine::period::annualize_factor;
use crate::engine::trend::{relative_slope, TrendPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// 市镇卡片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalityCard {
    pub municipality_id: String,
    pub name: String,
    pub color: String,
    pub population: u64,
    pub bio_tons: f64,
    pub bags: u64,
    pub contamination_rate: f64,
    pub co2_avoided_tons: f64,
    pub cost_total_eur: f64,
    pub cost_per_ton_eur: f64,
    pub gis: GisIndexResult,

    /// 收集量相对趋势（上升为正面）
    pub bio_trend: TrendDirection,

    /// 污染率相对趋势（与收集量同一口径：上升记为正向）
    pub contamination_trend: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentTypeCount {
    pub kind: String,
    pub count: usize,
    pub pct: f64,
}

/// 系统健康
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemHealth {
    pub total_incidents: usize,
    pub resolved_pct: f64,
    pub mttr_minutes: f64,
    pub uptime_pct: f64,
    pub incidents_by_type: Vec<IncidentTypeCount>,
}

/// 车队概况
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSummary {
    pub total_routes: usize,
    pub active_teams: usize,
    pub avg_routes_per_team: f64,
    pub total_collection_points: u64,
    pub avg_efficiency_pct: f64,
}

/// 环境与产出合计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalTotals {
    pub co2_avoided_tons: f64,
    pub compost_tons: f64,
    pub biogas_m3: f64,
    pub energy_kwh: f64,
    pub landfill_diversion_pct: f64,
    pub co2_per_ton: f64,
}

/// 系统级月度趋势行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrendRow {
    pub month: String,
    pub bio_tons: f64,
    pub contamination_rate: f64,
    pub co2_avoided_tons: f64,
    pub cost_total_eur: f64,
    pub cost_per_ton_eur: f64,
    pub bags: u64,
    pub gis_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub month: String,
    pub value: f64,
}

/// 污染热力图行（市镇 × 月份）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapRow {
    pub municipality_id: String,
    pub name: String,
    pub months: Vec<HeatmapCell>,
}

/// Bee2Waste 看板结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bee2WasteMetrics {
    pub months: Vec<String>,
    pub municipality_cards: Vec<MunicipalityCard>,

    pub total_bio_tons: f64,
    pub total_bags: u64,
    pub avg_contamination_rate: f64,
    pub total_cost_eur: f64,
    pub avg_cost_per_ton_eur: f64,

    pub system_health: SystemHealth,
    pub fleet: FleetSummary,
    pub environmental: EnvironmentalTotals,
    pub monthly_trends: Vec<MonthlyTrendRow>,
    pub aggregate_gis: GisIndexResult,
    pub contamination_heatmap: Vec<HeatmapRow>,
}

// ==========================================
// Bee2WasteAggregator - 运营商看板聚合器
// ==========================================
pub struct Bee2WasteAggregator {
    params: ModelParameters,
}

impl Default for Bee2WasteAggregator {
    fn default() -> Self {
        Self::new(ModelParameters::default())
    }
}

impl Bee2WasteAggregator {
    pub fn new(params: ModelParameters) -> Self {
        Self { params }
    }

    /// 计算 Bee2Waste 看板
    ///
    /// # 参数
    /// - `dataset`: 只读数据集
    /// - `filter`: 市镇 + 周期
    pub fn compute(&self, dataset: &Dataset, filter: &DashboardFilter) -> Bee2WasteMetrics {
        let scope = PeriodScope::resolve(dataset, filter);
        let months = scope.months().to_vec();
        let records = scope.current_records();
        let totals = CollectionTotals::from_records(records.iter().copied());

        let incidents: Vec<&Incident> = scope
            .current_incidents()
            .into_iter()
            .flat_map(|r| r.incidents.iter())
            .collect();

        let bio_tons = totals.tons();
        let contamination = totals.contamination_pct();
        let co2 = co2_complete(bio_tons, contamination);
        let cost = scope.cost_total(&months, scope.municipality);
        let population = dataset.population_in(scope.municipality);
        let n = months.len();

        let aggregate_gis = GisIndexCalculator::calculate(&GisIndexParams {
            kg_per_capita_year: safe_ratio(totals.weight_kg, population) * annualize_factor(n),
            contamination_rate: contamination,
            alerts_per_ton: safe_ratio(incidents.len() as f64, bio_tons),
            co2_avoided_per_ton: safe_ratio(co2, bio_tons),
            bags_per_capita_month: safe_ratio(safe_ratio(totals.bags, population), n as f64),
        });

        debug!(
            municipality = ?scope.municipality,
            months = n,
            bio_tons,
            incidents = incidents.len(),
            gis = aggregate_gis.score,
            "Bee2Waste 看板汇总完成"
        );

        Bee2WasteMetrics {
            municipality_cards: self.municipality_cards(&scope, &records),
            total_bio_tons: round_to(bio_tons, 1),
            total_bags: totals.bags as u64,
            avg_contamination_rate: round_to(contamination, 1),
            total_cost_eur: round_to(cost, 2),
            avg_cost_per_ton_eur: round_to(safe_ratio(cost, bio_tons), 2),
            system_health: self.system_health(&incidents, n),
            fleet: self.fleet(dataset, scope.municipality),
            environmental: self.environmental(&totals),
            monthly_trends: self.monthly_trends(&scope, &records, population),
            aggregate_gis,
            contamination_heatmap: contamination_heatmap(&scope, &records),
            months,
        }
    }

    fn municipality_cards(
        &self,
        scope: &PeriodScope<'_>,
        records: &[&MonthlyParishRecord],
    ) -> Vec<MunicipalityCard> {
        let months = scope.months();
        let n = months.len();
        let incident_records = scope.current_incidents();

        scope
            .dataset
            .municipality_ids(scope.municipality)
            .into_iter()
            .map(|id| {
                let own: Vec<&MonthlyParishRecord> = records
                    .iter()
                    .copied()
                    .filter(|r| r.municipality_id == id)
                    .collect();
                let totals = CollectionTotals::from_records(own.iter().copied());
                let by_month = totals_by_month(own.iter().copied());

                let bio_tons = totals.tons();
                let contamination = totals.contamination_pct();
                let co2 = co2_complete(bio_tons, contamination);
                let cost = scope.cost_total(months, Some(id.as_str()));
                let population = scope.dataset.population_in(Some(id.as_str()));

                let incidents: usize = incident_records
                    .iter()
                    .filter(|r| r.municipality_id == id)
                    .map(|r| r.incidents.len())
                    .sum();

                let gis = GisIndexCalculator::calculate(&GisIndexParams {
                    kg_per_capita_year: safe_ratio(totals.weight_kg, population) * annualize_factor(n),
                    contamination_rate: contamination,
                    alerts_per_ton: safe_ratio(incidents as f64, bio_tons),
                    co2_avoided_per_ton: safe_ratio(co2, bio_tons),
                    bags_per_capita_month: safe_ratio(safe_ratio(totals.bags, population), n as f64),
                });

                // 缺失月份按 0 计入序列
                let series = |f: fn(&CollectionTotals) -> f64| -> Vec<f64> {
                    months
                        .iter()
                        .map(|m| by_month.get(m).map(f).unwrap_or(0.0))
                        .collect()
                };
                let bio_series = series(|t| t.tons());
                let contamination_series = series(|t| t.contamination_pct());

                let municipality = scope.dataset.municipality(&id);
                MunicipalityCard {
                    name: scope.dataset.municipality_name(&id),
                    color: municipality.map(|m| m.color.clone()).unwrap_or_default(),
                    population: population as u64,
                    bio_tons: round_to(bio_tons, 1),
                    bags: totals.bags as u64,
                    contamination_rate: round_to(contamination, 1),
                    co2_avoided_tons: round_to(co2, 1),
                    cost_total_eur: round_to(cost, 2),
                    cost_per_ton_eur: round_to(safe_ratio(cost, bio_tons), 2),
                    gis,
                    bio_trend: TrendPolicy::RELATIVE.classify(relative_slope(&bio_series)),
                    contamination_trend: TrendPolicy::RELATIVE
                        .classify(relative_slope(&contamination_series)),
                    municipality_id: id,
                }
            })
            .collect()
    }

    /// 系统健康：解决率、MTTR、可用率、事件类型分布
    fn system_health(&self, incidents: &[&Incident], month_count: usize) -> SystemHealth {
        let total = incidents.len();
        let resolved = incidents.iter().filter(|i| i.resolved).count();
        let resolution_minutes: f64 = incidents.iter().map(|i| i.resolution_minutes as f64).sum();

        let resolved_pct = if total > 0 {
            (resolved as f64 / total as f64 * 100.0).round()
        } else {
            100.0
        };

        // 可用率：窗口总小时数扣除事件处理时长
        let total_hours = month_count as f64 * self.params.hours_per_month;
        let downtime_hours = resolution_minutes / 60.0;
        let uptime_pct = if total_hours > 0.0 {
            round_to((total_hours - downtime_hours) / total_hours * 100.0, 2)
        } else {
            100.0
        };

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for incident in incidents {
            *counts.entry(incident.kind.as_str()).or_default() += 1;
        }
        let mut incidents_by_type: Vec<IncidentTypeCount> = counts
            .into_iter()
            .map(|(kind, count)| IncidentTypeCount {
                kind: kind.to_string(),
                count,
                pct: round_to(safe_ratio(count as f64, total as f64) * 100.0, 1),
            })
            .collect();
        // 数量降序，同数量按类型名
        incidents_by_type.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.kind.cmp(&b.kind)));

        SystemHealth {
            total_incidents: total,
            resolved_pct,
            mttr_minutes: safe_ratio(resolution_minutes, total as f64).round(),
            uptime_pct,
            incidents_by_type,
        }
    }

    fn fleet(&self, dataset: &Dataset, municipality: Option<&str>) -> FleetSummary {
        let routes = dataset.routes_in(municipality);
        let teams = dataset.teams_in(municipality);

        FleetSummary {
            total_routes: routes.len(),
            active_teams: teams.len(),
            avg_routes_per_team: round_to(safe_ratio(routes.len() as f64, teams.len() as f64), 1),
            total_collection_points: routes.iter().map(|r| r.collection_points as u64).sum(),
            avg_efficiency_pct: self.params.fleet_efficiency_pct,
        }
    }

    fn environmental(&self, totals: &CollectionTotals) -> EnvironmentalTotals {
        let bio_tons = totals.tons();
        let contamination = totals.contamination_pct();
        let clean = clean_tons(totals);
        let co2 = co2_complete(bio_tons, contamination);

        EnvironmentalTotals {
            co2_avoided_tons: round_to(co2, 1),
            compost_tons: round_to(self.params.compost_tons(clean), 1),
            biogas_m3: round_to(self.params.biogas_m3(clean), 0),
            energy_kwh: round_to(self.params.energy_kwh(clean), 0),
            landfill_diversion_pct: round_to(100.0 - contamination, 1),
            co2_per_ton: round_to(safe_ratio(co2, bio_tons), 3),
        }
    }

    /// 月度趋势，每月附带 GIS 快照（告警项取假定值）
    fn monthly_trends(
        &self,
        scope: &PeriodScope<'_>,
        records: &[&MonthlyParishRecord],
        population: f64,
    ) -> Vec<MonthlyTrendRow> {
        let by_month = totals_by_month(records.iter().copied());

        scope
            .months()
            .iter()
            .map(|month| {
                let t = by_month.get(month).copied().unwrap_or_default();
                let tons = t.tons();
                let contamination = t.contamination_pct();
                let co2 = co2_complete(tons, contamination);
                let cost = scope.cost_total(std::slice::from_ref(month), scope.municipality);

                let gis = GisIndexCalculator::calculate(&GisIndexParams {
                    kg_per_capita_year: safe_ratio(t.weight_kg, population) * 12.0,
                    contamination_rate: contamination,
                    alerts_per_ton: ASSUMED_ALERTS_PER_TON,
                    co2_avoided_per_ton: safe_ratio(co2, tons),
                    bags_per_capita_month: safe_ratio(t.bags, population),
                });

                MonthlyTrendRow {
                    month: month.clone(),
                    bio_tons: round_to(tons, 1),
                    contamination_rate: round_to(contamination, 1),
                    co2_avoided_tons: round_to(co2, 1),
                    cost_total_eur: round_to(cost, 2),
                    cost_per_ton_eur: round_to(safe_ratio(cost, tons), 2),
                    bags: t.bags as u64,
                    gis_score: gis.score,
                }
            })
            .collect()
    }
}

/// 市镇 × 月份 污染率（1 位小数，无数据为 0）
fn contamination_heatmap(
    scope: &PeriodScope<'_>,
    records: &[&MonthlyParishRecord],
) -> Vec<HeatmapRow> {
    let mut cells: BTreeMap<(&str, &str), CollectionTotals> = BTreeMap::new();
    for r in records {
        cells
            .entry((r.municipality_id.as_str(), r.month.as_str()))
            .or_default()
            .add(r);
    }

    scope
        .dataset
        .municipality_ids(scope.municipality)
        .into_iter()
        .map(|id| HeatmapRow {
            name: scope.dataset.municipality_name(&id),
            months: scope
                .months()
                .iter()
                .map(|month| HeatmapCell {
                    month: month.clone(),
                    value: cells
                        .get(&(id.as_str(), month.as_str()))
                        .map(|t| round_to(t.contamination_pct(), 1))
                        .unwrap_or(0.0),
                })
                .collect(),
            municipality_id: id,
        })
        .collect()
}
