// ==========================================
// 生物废弃物绩效指标 - CFO 看板
// ==========================================
// 职责: 成本、单位成本、收入估算、经营利润率、预算偏差、市镇对比
// 口径: 周期按成本记录的可用月份解析；吨数来自同月的堂区记录
// 注意: 计划预算 = 实际成本 × budget_ratio，为占位口径（is_placeholder = true）
// ==========================================

use crate::config::ModelParameters;
use crate::dashboard::ceo::clean_tons;
use crate::dashboard::filter::DashboardFilter;
use crate::dashboard::kpi::{sparkline, KpiCard};
use crate::dashboard::scope::PeriodScope;
use crate::domain::dataset::Dataset;
use crate::domain::records::MonthlyCostRecord;
use crate::engine::aggregation::{round_to, safe_ratio, CollectionTotals};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 五类成本明细
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub collection_eur: f64,
    pub treatment_eur: f64,
    pub transport_eur: f64,
    pub labour_eur: f64,
    pub overhead_eur: f64,
    pub total_eur: f64,
}

impl CostBreakdown {
    fn from_records(records: &[&MonthlyCostRecord]) -> Self {
        let mut sum = Self::default();
        for c in records {
            sum.collection_eur += c.collection_eur;
            sum.treatment_eur += c.treatment_eur;
            sum.transport_eur += c.transport_eur;
            sum.labour_eur += c.labour_eur;
            sum.overhead_eur += c.overhead_eur;
            sum.total_eur += c.total_eur;
        }
        sum
    }

    fn rounded(self) -> Self {
        Self {
            collection_eur: round_to(self.collection_eur, 2),
            treatment_eur: round_to(self.treatment_eur, 2),
            transport_eur: round_to(self.transport_eur, 2),
            labour_eur: round_to(self.labour_eur, 2),
            overhead_eur: round_to(self.overhead_eur, 2),
            total_eur: round_to(self.total_eur, 2),
        }
    }
}

/// 月度成本行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCostRow {
    pub month: String,
    pub costs: CostBreakdown,
}

/// 收入估算
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueEstimate {
    pub compost_eur: f64,
    pub energy_eur: f64,
    pub recyclables_eur: f64,
    pub total_eur: f64,
}

impl RevenueEstimate {
    /// 产出收入：堆肥 + 发电（不含可回收物）
    pub fn production_eur(&self) -> f64 {
        self.compost_eur + self.energy_eur
    }
}

/// 预算偏差
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetVariance {
    pub planned_eur: f64,
    pub actual_eur: f64,
    pub deviation_eur: f64,
    pub deviation_pct: f64,

    /// 计划值由实际值推算，没有真实预算来源
    pub is_placeholder: bool,
}

/// 市镇成本对比行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalityCostRow {
    pub municipality_id: String,
    pub name: String,
    pub cost_total_eur: f64,
    pub cost_per_ton_eur: f64,
    pub bio_tons: f64,
    pub revenue_eur: f64,
    pub margin_pct: f64,
}

/// CFO 看板结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CfoMetrics {
    pub months: Vec<String>,

    pub total_cost: KpiCard,
    pub cost_per_ton: KpiCard,
    pub cost_per_bag: KpiCard,
    pub revenue: KpiCard,
    pub operating_margin: KpiCard,

    pub cost_breakdown: CostBreakdown,
    pub monthly_costs: Vec<MonthlyCostRow>,
    pub revenue_breakdown: RevenueEstimate,
    pub budget: BudgetVariance,
    pub municipality_comparison: Vec<MunicipalityCostRow>,
}

// ==========================================
// CfoAggregator - CFO 看板聚合器
// ==========================================
pub struct CfoAggregator {
    params: ModelParameters,
}

impl Default for CfoAggregator {
    fn default() -> Self {
        Self::new(ModelParameters::default())
    }
}

impl CfoAggregator {
    pub fn new(params: ModelParameters) -> Self {
        Self { params }
    }

    /// 收入估算：堆肥 + 发电 + 可回收物（污染物按实际污染率）
    pub fn estimate_revenue(&self, totals: &CollectionTotals) -> RevenueEstimate {
        let contaminant_tons = totals.tons() * totals.contamination_pct() / 100.0;
        self.revenue_with_contaminants(totals, contaminant_tons)
    }

    /// 上期收入估算：可回收物一项按假定污染物占比
    pub fn estimate_previous_revenue(&self, totals: &CollectionTotals) -> RevenueEstimate {
        let contaminant_tons = totals.tons() * self.params.baseline_contaminant_share;
        self.revenue_with_contaminants(totals, contaminant_tons)
    }

    fn revenue_with_contaminants(
        &self,
        totals: &CollectionTotals,
        contaminant_tons: f64,
    ) -> RevenueEstimate {
        let p = &self.params;
        let clean = clean_tons(totals);
        let compost_eur = p.compost_tons(clean) * p.compost_eur_per_ton;
        let energy_eur = p.energy_kwh(clean) * p.energy_eur_per_kwh;
        let recyclables_eur =
            contaminant_tons * p.recyclable_recovery_share * p.recyclable_eur_per_ton;

        RevenueEstimate {
            compost_eur,
            energy_eur,
            recyclables_eur,
            total_eur: compost_eur + energy_eur + recyclables_eur,
        }
    }

    /// 预算偏差（占位口径）
    pub fn budget_variance(&self, actual: f64) -> BudgetVariance {
        let planned = round_to(actual * self.params.budget_ratio, 2);
        let deviation = round_to(actual - planned, 2);
        BudgetVariance {
            planned_eur: planned,
            actual_eur: round_to(actual, 2),
            deviation_eur: deviation,
            deviation_pct: round_to(safe_ratio(deviation, planned) * 100.0, 1),
            is_placeholder: true,
        }
    }

    /// 计算 CFO 看板
    pub fn compute(&self, dataset: &Dataset, filter: &DashboardFilter) -> CfoMetrics {
        let scope = PeriodScope::resolve_with_months(dataset, filter, &dataset.available_cost_months());
        let months = scope.months().to_vec();

        let costs = dataset.cost_records(scope.months(), scope.municipality);
        let prev_costs = dataset.cost_records(scope.previous_months(), scope.municipality);
        let breakdown = CostBreakdown::from_records(&costs);
        let total_cost = breakdown.total_eur;
        let prev_total_cost: f64 = prev_costs.iter().map(|c| c.total_eur).sum();

        let current = scope.current_totals();
        let previous = scope.previous_totals();

        let revenue = self.estimate_revenue(&current);
        let prev_revenue = self.estimate_previous_revenue(&previous);
        let margin = margin_pct(revenue.total_eur, total_cost);
        let prev_margin = margin_pct(prev_revenue.total_eur, prev_total_cost);

        debug!(
            municipality = ?scope.municipality,
            months = months.len(),
            total_cost,
            revenue = revenue.total_eur,
            "CFO 看板汇总完成"
        );

        let monthly_costs: Vec<MonthlyCostRow> = months
            .iter()
            .map(|month| {
                let month_costs: Vec<&MonthlyCostRecord> =
                    costs.iter().copied().filter(|c| &c.month == month).collect();
                MonthlyCostRow {
                    month: month.clone(),
                    costs: CostBreakdown::from_records(&month_costs).rounded(),
                }
            })
            .collect();

        let cost_sparkline = sparkline(&months, |month| {
            costs
                .iter()
                .filter(|c| c.month == month)
                .map(|c| c.total_eur)
                .sum()
        });

        CfoMetrics {
            total_cost: KpiCard::new("Total cost", "EUR", total_cost, prev_total_cost, 2)
                .with_sparkline(cost_sparkline),
            cost_per_ton: KpiCard::new(
                "Cost per ton",
                "EUR/t",
                safe_ratio(total_cost, current.tons()),
                safe_ratio(prev_total_cost, previous.tons()),
                2,
            ),
            cost_per_bag: KpiCard::new(
                "Cost per bag",
                "EUR",
                safe_ratio(total_cost, current.bags),
                safe_ratio(prev_total_cost, previous.bags),
                2,
            ),
            revenue: KpiCard::new("Estimated revenue", "EUR", revenue.total_eur, prev_revenue.total_eur, 2),
            operating_margin: KpiCard::new("Operating margin", "%", margin, prev_margin, 1),

            cost_breakdown: breakdown.rounded(),
            monthly_costs,
            revenue_breakdown: RevenueEstimate {
                compost_eur: round_to(revenue.compost_eur, 2),
                energy_eur: round_to(revenue.energy_eur, 2),
                recyclables_eur: round_to(revenue.recyclables_eur, 2),
                total_eur: round_to(revenue.total_eur, 2),
            },
            budget: self.budget_variance(total_cost),
            municipality_comparison: self.municipality_comparison(&scope, &costs),
            months,
        }
    }

    fn municipality_comparison(
        &self,
        scope: &PeriodScope<'_>,
        costs: &[&MonthlyCostRecord],
    ) -> Vec<MunicipalityCostRow> {
        let records = scope.current_records();
        scope
            .dataset
            .municipality_ids(scope.municipality)
            .into_iter()
            .map(|id| {
                let cost: f64 = costs
                    .iter()
                    .filter(|c| c.municipality_id == id)
                    .map(|c| c.total_eur)
                    .sum();
                let totals = CollectionTotals::from_records(
                    records.iter().copied().filter(|r| r.municipality_id == id),
                );
                let revenue = self.estimate_revenue(&totals).production_eur();

                MunicipalityCostRow {
                    name: scope.dataset.municipality_name(&id),
                    cost_total_eur: round_to(cost, 2),
                    cost_per_ton_eur: round_to(safe_ratio(cost, totals.tons()), 2),
                    bio_tons: round_to(totals.tons(), 1),
                    revenue_eur: round_to(revenue, 2),
                    margin_pct: round_to(margin_pct(revenue, cost), 1),
                    municipality_id: id,
                }
            })
            .collect()
    }
}

/// 经营利润率 (%)：收入为 0 时为 0
fn margin_pct(revenue: f64, cost: f64) -> f64 {
    if revenue <= 0.0 {
        return 0.0;
    }
    (revenue - cost) / revenue * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::period::PeriodToken;
    use crate::domain::records::MonthlyParishRecord;

    fn cost(month: &str, municipality: &str, total: f64) -> MonthlyCostRecord {
        MonthlyCostRecord {
            month: month.to_string(),
            municipality_id: municipality.to_string(),
            collection_eur: total * 0.35,
            treatment_eur: total * 0.25,
            transport_eur: total * 0.15,
            labour_eur: total * 0.20,
            overhead_eur: total * 0.05,
            total_eur: total,
        }
    }

    fn parish(month: &str, municipality: &str, kg: f64, contamination: f64) -> MonthlyParishRecord {
        MonthlyParishRecord {
            month: month.to_string(),
            parish_id: format!("{}-P", municipality),
            municipality_id: municipality.to_string(),
            bag_count: 1_000,
            total_weight_kg: kg,
            total_volume_m3: 12.0,
            avg_bag_weight_kg: kg / 1_000.0,
            contamination_rate: contamination,
            rejected_bags: 10,
            contamination_by_type: Default::default(),
        }
    }

    fn dataset() -> Dataset {
        Dataset {
            monthly_costs: vec![
                cost("2025-12", "M1", 4_000.0),
                cost("2026-01", "M1", 5_000.0),
                cost("2026-01", "M2", 3_000.0),
            ],
            monthly_parish: vec![
                parish("2025-12", "M1", 100_000.0, 10.0),
                parish("2026-01", "M1", 100_000.0, 10.0),
                parish("2026-01", "M2", 50_000.0, 20.0),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_revenue_model() {
        let ds = dataset();
        let totals = CollectionTotals::from_records(ds.monthly_parish.iter().skip(1).take(1));
        let revenue = CfoAggregator::default().estimate_revenue(&totals);
        // 100 t, 10 % → 干净 90 t
        // 堆肥 90·0.3·15 = 405；电 90·0.7·120·6·0.08 = 3628.8；回收 10·0.4·5 = 20
        assert!((revenue.compost_eur - 405.0).abs() < 1e-6);
        assert!((revenue.energy_eur - 3_628.8).abs() < 1e-6);
        assert!((revenue.recyclables_eur - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_previous_revenue_uses_baseline_contaminants() {
        // 100 t，实际污染 30 %；可回收物按假定 10 %：100·0.1·0.4·5 = 20
        let records = [parish("2025-12", "M1", 100_000.0, 30.0)];
        let totals = CollectionTotals::from_records(records.iter());
        let aggregator = CfoAggregator::default();

        let previous = aggregator.estimate_previous_revenue(&totals);
        let actual = aggregator.estimate_revenue(&totals);

        assert!((previous.recyclables_eur - 20.0).abs() < 1e-6);
        assert!((actual.recyclables_eur - 60.0).abs() < 1e-6);
        assert!((previous.production_eur() - actual.production_eur()).abs() < 1e-9);
    }

    #[test]
    fn test_budget_placeholder() {
        let budget = CfoAggregator::default().budget_variance(10_000.0);
        assert_eq!(budget.planned_eur, 9_500.0);
        assert_eq!(budget.deviation_eur, 500.0);
        assert_eq!(budget.deviation_pct, 5.3);
        assert!(budget.is_placeholder);
    }

    #[test]
    fn test_ytd_costs() {
        let ds = dataset();
        let metrics = CfoAggregator::default().compute(&ds, &DashboardFilter::system(PeriodToken::Ytd));

        assert_eq!(metrics.months, vec!["2026-01"]);
        assert_eq!(metrics.total_cost.value, 8_000.0);
        assert_eq!(metrics.total_cost.change_pct, 100.0);
        // 8000 / 150 t
        assert_eq!(metrics.cost_per_ton.value, 53.33);
        assert_eq!(metrics.cost_per_bag.value, 4.0);
        assert_eq!(metrics.cost_breakdown.collection_eur, 2_800.0);
        assert_eq!(metrics.monthly_costs.len(), 1);
        assert_eq!(metrics.monthly_costs[0].costs.total_eur, 8_000.0);
    }

    #[test]
    fn test_municipality_filter_and_comparison() {
        let ds = dataset();
        let filter = DashboardFilter::new(Some("M1"), PeriodToken::Ytd);
        let metrics = CfoAggregator::default().compute(&ds, &filter);

        assert_eq!(metrics.total_cost.value, 5_000.0);
        assert_eq!(metrics.municipality_comparison.len(), 1);
        let row = &metrics.municipality_comparison[0];
        assert_eq!(row.municipality_id, "M1");
        assert_eq!(row.name, "M1");
        assert_eq!(row.cost_per_ton_eur, 50.0);
        // 只计堆肥与发电：405 + 3628.8
        assert_eq!(row.revenue_eur, 4_033.8);
        // (4033.8 - 5000) / 4033.8
        assert_eq!(row.margin_pct, -24.0);
        assert_eq!(metrics.revenue_breakdown.total_eur, 4_053.8);
    }

    #[test]
    fn test_zero_revenue_margin() {
        assert_eq!(margin_pct(0.0, 100.0), 0.0);
        let metrics = CfoAggregator::default()
            .compute(&Dataset::default(), &DashboardFilter::system(PeriodToken::All));
        assert_eq!(metrics.operating_margin.value, 0.0);
        assert_eq!(metrics.budget.planned_eur, 0.0);
        assert_eq!(metrics.budget.deviation_pct, 0.0);
    }
}
