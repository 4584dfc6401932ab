// ==========================================
// 生物废弃物绩效指标 - 只读数据集
// ==========================================
// 职责: 上游生成的全部参考数据与月度记录
// 红线: 构造一次后不可变，通过 &Dataset / Arc<Dataset> 共享
// ==========================================

use crate::domain::entities::{
    ContaminationType, EmissionFactor, Municipality, Parish, Route, Team,
};
use crate::domain::records::{
    MonthlyCostRecord, MonthlyIncidentRecord, MonthlyParishRecord, MonthlyUrbanWasteRecord,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 数据集 (Dataset)
///
/// 所有看板计算的唯一输入，只读。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub municipalities: Vec<Municipality>,
    pub parishes: Vec<Parish>,
    pub teams: Vec<Team>,
    pub routes: Vec<Route>,
    pub contamination_types: Vec<ContaminationType>,
    pub emission_factors: Vec<EmissionFactor>,
    pub monthly_parish: Vec<MonthlyParishRecord>,
    pub monthly_costs: Vec<MonthlyCostRecord>,
    pub monthly_incidents: Vec<MonthlyIncidentRecord>,
    pub monthly_urban_waste: Vec<MonthlyUrbanWasteRecord>,
}

/// 市镇过滤: None 表示全系统
fn matches_municipality(record_municipality: &str, filter: Option<&str>) -> bool {
    filter.map_or(true, |id| id == record_municipality)
}

impl Dataset {
    /// 从 JSON 字符串加载（上游交接格式）
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    // ==========================================
    // 参考数据查询
    // ==========================================

    /// 全部可用月份（升序，去重），以堂区月度记录为准
    pub fn available_months(&self) -> Vec<String> {
        self.monthly_parish
            .iter()
            .map(|r| r.month.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 成本记录中的可用月份（升序）
    pub fn available_cost_months(&self) -> Vec<String> {
        self.monthly_costs
            .iter()
            .map(|r| r.month.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn municipality(&self, id: &str) -> Option<&Municipality> {
        self.municipalities.iter().find(|m| m.id == id)
    }

    pub fn has_municipality(&self, id: &str) -> bool {
        self.municipality(id).is_some()
    }

    /// 市镇名称，找不到时回退为 ID
    pub fn municipality_name(&self, id: &str) -> String {
        self.municipality(id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn parish(&self, id: &str) -> Option<&Parish> {
        self.parishes.iter().find(|p| p.id == id)
    }

    /// 过滤条件下的市镇 ID 列表（指定市镇时只返回该市镇）
    pub fn municipality_ids(&self, filter: Option<&str>) -> Vec<String> {
        match filter {
            Some(id) => vec![id.to_string()],
            None => self.municipalities.iter().map(|m| m.id.clone()).collect(),
        }
    }

    pub fn parishes_in(&self, filter: Option<&str>) -> Vec<&Parish> {
        self.parishes
            .iter()
            .filter(|p| matches_municipality(&p.municipality_id, filter))
            .collect()
    }

    /// 过滤范围内的人口（按堂区累加）
    pub fn population_in(&self, filter: Option<&str>) -> f64 {
        self.parishes_in(filter)
            .iter()
            .map(|p| p.population as f64)
            .sum()
    }

    pub fn teams_in(&self, filter: Option<&str>) -> Vec<&Team> {
        self.teams
            .iter()
            .filter(|t| matches_municipality(&t.municipality_id, filter))
            .collect()
    }

    pub fn routes_in(&self, filter: Option<&str>) -> Vec<&Route> {
        self.routes
            .iter()
            .filter(|r| matches_municipality(&r.municipality_id, filter))
            .collect()
    }

    // ==========================================
    // 月度记录查询
    // ==========================================

    pub fn parish_records(
        &self,
        months: &[String],
        filter: Option<&str>,
    ) -> Vec<&MonthlyParishRecord> {
        self.monthly_parish
            .iter()
            .filter(|r| months.contains(&r.month))
            .filter(|r| matches_municipality(&r.municipality_id, filter))
            .collect()
    }

    pub fn cost_records(&self, months: &[String], filter: Option<&str>) -> Vec<&MonthlyCostRecord> {
        self.monthly_costs
            .iter()
            .filter(|r| months.contains(&r.month))
            .filter(|r| matches_municipality(&r.municipality_id, filter))
            .collect()
    }

    pub fn incident_records(
        &self,
        months: &[String],
        filter: Option<&str>,
    ) -> Vec<&MonthlyIncidentRecord> {
        self.monthly_incidents
            .iter()
            .filter(|r| months.contains(&r.month))
            .filter(|r| matches_municipality(&r.municipality_id, filter))
            .collect()
    }

    pub fn urban_waste_records(
        &self,
        months: &[String],
        filter: Option<&str>,
    ) -> Vec<&MonthlyUrbanWasteRecord> {
        self.monthly_urban_waste
            .iter()
            .filter(|r| months.contains(&r.month))
            .filter(|r| matches_municipality(&r.municipality_id, filter))
            .collect()
    }
}
