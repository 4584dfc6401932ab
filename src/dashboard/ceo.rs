// ==========================================
// 生物废弃物绩效指标 - CEO 看板
// ==========================================
// 职责: 规模、增长、覆盖、质量、环境、产出 KPI + 三个信号灯 + 月度与市镇对比
// 口径: 所有 KPI 与上一等长窗口比较；信号灯固定使用最近 6 个月
// ==========================================

use crate::config::ModelParameters;
use crate::dashboard::filter::DashboardFilter;
use crate::dashboard::kpi::{sparkline, KpiCard};
use crate::dashboard::scope::PeriodScope;
use crate::domain::dataset::Dataset;
use crate::domain::records::MonthlyParishRecord;
use crate::engine::aggregation::{pct_change, round_to, safe_ratio, CollectionTotals};
use crate::engine::co2::co2_complete;
use crate::engine::period::annualize_factor;
use crate::engine::semaphore::{SemaphoreEngine, SemaphoreResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 覆盖判定阈值：年化人均收集量 (kg/人/年)
const COVERAGE_MIN_KG_PER_CAPITA_YEAR: f64 = 1.0;

/// 月度明细行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBreakdownRow {
    pub month: String,
    pub bio_tons: f64,
    pub contamination_rate: f64,
    pub co2_avoided_tons: f64,
    pub bags: u64,
}

/// 市镇对比行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalityComparisonRow {
    pub municipality_id: String,
    pub name: String,
    pub bio_tons: f64,
    pub contamination_rate: f64,
    pub co2_avoided_tons: f64,
    pub cost_total_eur: f64,
}

/// CEO 看板结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CeoMetrics {
    pub months: Vec<String>,

    // ===== 规模 =====
    pub total_bio_tons: KpiCard,
    pub growth_pct: KpiCard,
    pub bio_share_of_urban_waste: KpiCard,
    pub total_bags: KpiCard,
    pub volume_m3: KpiCard,
    pub service_coverage: KpiCard,

    // ===== 信号灯 =====
    pub semaphores: Vec<SemaphoreResult>,

    // ===== 环境与产出 =====
    pub co2_avoided_tons: KpiCard,
    pub landfill_diversion_pct: KpiCard,
    pub compost_tons: KpiCard,
    pub biogas_m3: KpiCard,
    pub energy_kwh: KpiCard,

    // ===== 质量 =====
    pub contamination_rate: KpiCard,
    pub rejection_rate: KpiCard,

    pub monthly_breakdown: Vec<MonthlyBreakdownRow>,
    pub municipality_comparison: Vec<MunicipalityComparisonRow>,
}

// ==========================================
// CeoAggregator - CEO 看板聚合器
// ==========================================
pub struct CeoAggregator {
    params: ModelParameters,
}

impl Default for CeoAggregator {
    fn default() -> Self {
        Self::new(ModelParameters::default())
    }
}

impl CeoAggregator {
    pub fn new(params: ModelParameters) -> Self {
        Self { params }
    }

    /// 计算 CEO 看板
    ///
    /// # 参数
    /// - `dataset`: 只读数据集
    /// - `filter`: 市镇 + 周期
    ///
    /// # 返回
    /// CeoMetrics（空窗口时各项为 0）
    pub fn compute(&self, dataset: &Dataset, filter: &DashboardFilter) -> CeoMetrics {
        let scope = PeriodScope::resolve(dataset, filter);
        let current = scope.current_totals();
        let previous = scope.previous_totals();
        let by_month = scope.current_by_month();
        let months = scope.months().to_vec();

        let bio_tons = current.tons();
        let prev_bio_tons = previous.tons();
        let contamination = current.contamination_pct();
        let prev_contamination = previous.contamination_pct();

        // 城市垃圾占比
        let bio_share = safe_ratio(bio_tons, scope.urban_waste_tons(scope.months())) * 100.0;
        let prev_bio_share =
            safe_ratio(prev_bio_tons, scope.urban_waste_tons(scope.previous_months())) * 100.0;

        // 覆盖率
        let coverage = self.coverage_pct(&scope, &scope.current_records(), scope.months().len());
        let prev_coverage = self.coverage_pct(
            &scope,
            &scope.previous_records(),
            scope.previous_months().len(),
        );

        // 环境与产出
        let co2 = co2_complete(bio_tons, contamination);
        let prev_co2 = co2_complete(prev_bio_tons, prev_contamination);
        let clean = clean_tons(&current);
        let prev_clean = clean_tons(&previous);

        let by_month_ref = &by_month;
        let month_value = |f: fn(&CollectionTotals) -> f64| {
            move |month: &str| by_month_ref.get(month).map(f).unwrap_or(0.0)
        };

        debug!(
            municipality = ?scope.municipality,
            months = months.len(),
            bio_tons,
            contamination,
            "CEO 看板汇总完成"
        );

        CeoMetrics {
            total_bio_tons: KpiCard::new("Total bio-waste", "t", bio_tons, prev_bio_tons, 1)
                .with_sparkline(sparkline(&months, month_value(|t| t.tons()))),
            growth_pct: KpiCard::value_only("Growth", "%", pct_change(bio_tons, prev_bio_tons), 1),
            bio_share_of_urban_waste: KpiCard::new("Bio / urban waste", "%", bio_share, prev_bio_share, 1),
            total_bags: KpiCard::new("Total bags", "bags", current.bags, previous.bags, 0)
                .with_sparkline(sparkline(&months, month_value(|t| t.bags))),
            volume_m3: KpiCard::new("Volume", "m3", current.volume_m3, previous.volume_m3, 1)
                .with_sparkline(sparkline(&months, month_value(|t| t.volume_m3))),
            service_coverage: KpiCard::new("Service coverage", "%", coverage, prev_coverage, 1),

            semaphores: SemaphoreEngine::compute_all(dataset, scope.municipality),

            co2_avoided_tons: KpiCard::new("CO2 avoided", "tCO2e", co2, prev_co2, 1)
                .with_sparkline(sparkline(
                    &months,
                    month_value(|t| co2_complete(t.tons(), t.contamination_pct())),
                )),
            landfill_diversion_pct: KpiCard::new(
                "Landfill diversion",
                "%",
                100.0 - contamination,
                100.0 - prev_contamination,
                1,
            ),
            compost_tons: KpiCard::new(
                "Compost produced",
                "t",
                self.params.compost_tons(clean),
                self.params.compost_tons(prev_clean),
                1,
            ),
            biogas_m3: KpiCard::new(
                "Biogas produced",
                "m3",
                self.params.biogas_m3(clean),
                self.params.biogas_m3(prev_clean),
                0,
            ),
            energy_kwh: KpiCard::new(
                "Energy generated",
                "kWh",
                self.params.energy_kwh(clean),
                self.params.energy_kwh(prev_clean),
                0,
            ),

            contamination_rate: KpiCard::new("Contamination rate", "%", contamination, prev_contamination, 1)
                .with_sparkline(sparkline(&months, month_value(|t| t.contamination_pct()))),
            rejection_rate: KpiCard::new(
                "Rejection rate",
                "%",
                current.rejection_pct(),
                previous.rejection_pct(),
                1,
            ),

            monthly_breakdown: months
                .iter()
                .map(|month| {
                    let t = by_month.get(month).copied().unwrap_or_default();
                    MonthlyBreakdownRow {
                        month: month.clone(),
                        bio_tons: round_to(t.tons(), 1),
                        contamination_rate: round_to(t.contamination_pct(), 1),
                        co2_avoided_tons: round_to(co2_complete(t.tons(), t.contamination_pct()), 1),
                        bags: t.bags as u64,
                    }
                })
                .collect(),
            municipality_comparison: self.municipality_comparison(&scope),
            months,
        }
    }

    /// 覆盖率：年化人均收集量 > 1 kg 的堂区占比 (%)
    fn coverage_pct(
        &self,
        scope: &PeriodScope<'_>,
        records: &[&MonthlyParishRecord],
        month_count: usize,
    ) -> f64 {
        let parishes = scope.dataset.parishes_in(scope.municipality);
        let factor = annualize_factor(month_count);

        let active = parishes
            .iter()
            .filter(|p| {
                let kg: f64 = records
                    .iter()
                    .filter(|r| r.parish_id == p.id)
                    .map(|r| r.total_weight_kg)
                    .sum();
                safe_ratio(kg, p.population as f64) * factor > COVERAGE_MIN_KG_PER_CAPITA_YEAR
            })
            .count();

        safe_ratio(active as f64, parishes.len() as f64) * 100.0
    }

    fn municipality_comparison(&self, scope: &PeriodScope<'_>) -> Vec<MunicipalityComparisonRow> {
        let records = scope.current_records();
        scope
            .dataset
            .municipality_ids(scope.municipality)
            .into_iter()
            .map(|id| {
                let totals = CollectionTotals::from_records(
                    records.iter().copied().filter(|r| r.municipality_id == id),
                );
                MunicipalityComparisonRow {
                    name: scope.dataset.municipality_name(&id),
                    bio_tons: round_to(totals.tons(), 1),
                    contamination_rate: round_to(totals.contamination_pct(), 1),
                    co2_avoided_tons: round_to(
                        co2_complete(totals.tons(), totals.contamination_pct()),
                        1,
                    ),
                    cost_total_eur: round_to(scope.cost_total(scope.months(), Some(id.as_str())), 2),
                    municipality_id: id,
                }
            })
            .collect()
    }
}

/// 干净量 (t)
pub(crate) fn clean_tons(totals: &CollectionTotals) -> f64 {
    totals.tons() * (1.0 - totals.contamination_pct() / 100.0)
}
