// ==========================================
// 生物废弃物绩效指标 - 看板计算范围
// ==========================================
// 职责: 过滤条件 + 解析后的周期窗口 → 当前/上期记录
// ==========================================

use crate::domain::dataset::Dataset;
use crate::domain::records::{MonthlyIncidentRecord, MonthlyParishRecord};
use crate::engine::aggregation::{totals_by_month, CollectionTotals};
use crate::engine::period::{PeriodResolver, PeriodWindow};
use crate::dashboard::filter::DashboardFilter;
use std::collections::BTreeMap;

/// 一次看板计算的范围
pub struct PeriodScope<'a> {
    pub dataset: &'a Dataset,
    pub municipality: Option<&'a str>,
    pub window: PeriodWindow,
}

impl<'a> PeriodScope<'a> {
    /// 以堂区记录的可用月份解析周期
    pub fn resolve(dataset: &'a Dataset, filter: &'a DashboardFilter) -> Self {
        let window = PeriodResolver::resolve(filter.period, &dataset.available_months());
        Self {
            dataset,
            municipality: filter.municipality(),
            window,
        }
    }

    /// 以指定的可用月份解析周期（例如成本记录的月份）
    pub fn resolve_with_months(
        dataset: &'a Dataset,
        filter: &'a DashboardFilter,
        all_months: &[String],
    ) -> Self {
        Self {
            dataset,
            municipality: filter.municipality(),
            window: PeriodResolver::resolve(filter.period, all_months),
        }
    }

    pub fn months(&self) -> &[String] {
        &self.window.current
    }

    pub fn previous_months(&self) -> &[String] {
        &self.window.previous
    }

    pub fn current_records(&self) -> Vec<&'a MonthlyParishRecord> {
        self.dataset
            .parish_records(&self.window.current, self.municipality)
    }

    pub fn previous_records(&self) -> Vec<&'a MonthlyParishRecord> {
        self.dataset
            .parish_records(&self.window.previous, self.municipality)
    }

    pub fn current_totals(&self) -> CollectionTotals {
        CollectionTotals::from_records(self.current_records())
    }

    pub fn previous_totals(&self) -> CollectionTotals {
        CollectionTotals::from_records(self.previous_records())
    }

    /// 当前窗口逐月汇总
    pub fn current_by_month(&self) -> BTreeMap<String, CollectionTotals> {
        totals_by_month(self.current_records())
    }

    pub fn current_incidents(&self) -> Vec<&'a MonthlyIncidentRecord> {
        self.dataset
            .incident_records(&self.window.current, self.municipality)
    }

    /// 当前窗口的城市垃圾总量 (t)
    pub fn urban_waste_tons(&self, months: &[String]) -> f64 {
        self.dataset
            .urban_waste_records(months, self.municipality)
            .iter()
            .map(|r| r.total_urban_waste_ton)
            .sum()
    }

    /// 指定月份的成本合计 (€)
    pub fn cost_total(&self, months: &[String], municipality: Option<&str>) -> f64 {
        self.dataset
            .cost_records(months, municipality)
            .iter()
            .map(|c| c.total_eur)
            .sum()
    }
}
