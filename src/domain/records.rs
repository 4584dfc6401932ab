// ==========================================
// 生物废弃物绩效指标 - 月度记录
// ==========================================
// 职责: 堂区月度收集、市镇月度成本、事件、城市垃圾总量
// 连接键: (month, municipality_id | parish_id)
// ==========================================

use crate::domain::types::Severity;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 堂区月度收集记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyParishRecord {
    /// 月份 (YYYY-MM)
    pub month: String,

    pub parish_id: String,
    pub municipality_id: String,

    /// 收集袋数
    pub bag_count: u32,

    /// 总重量 (kg)
    pub total_weight_kg: f64,

    /// 总体积 (m³)
    pub total_volume_m3: f64,

    /// 平均袋重 (kg)
    pub avg_bag_weight_kg: f64,

    /// 污染率 (%, 0-100)
    pub contamination_rate: f64,

    /// 拒收袋数
    pub rejected_bags: u32,

    /// 按污染类型拆分 (类型 ID → kg)
    #[serde(default)]
    pub contamination_by_type: BTreeMap<String, f64>,
}

/// 市镇月度成本记录 (EUR)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCostRecord {
    pub month: String,
    pub municipality_id: String,
    pub collection_eur: f64,
    pub treatment_eur: f64,
    pub transport_eur: f64,
    pub labour_eur: f64,
    pub overhead_eur: f64,
    pub total_eur: f64,
}

/// 单个事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,

    /// 事件类型 (belt_failure / blockage / critical_contamination / ...)
    pub kind: String,

    pub severity: Severity,
    pub sector: String,
    pub occurred_at: NaiveDateTime,

    /// 处理时长 (分钟)
    pub resolution_minutes: u32,

    pub resolved: bool,
}

/// 市镇月度事件记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyIncidentRecord {
    pub month: String,
    pub municipality_id: String,
    pub incidents: Vec<Incident>,
}

impl MonthlyIncidentRecord {
    /// 指定严重度的事件数
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.incidents
            .iter()
            .filter(|i| i.severity == severity)
            .count()
    }
}

/// 市镇月度城市垃圾总量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyUrbanWasteRecord {
    pub month: String,
    pub municipality_id: String,
    pub total_urban_waste_ton: f64,
}
