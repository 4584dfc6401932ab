// ==========================================
// 生物废弃物绩效指标 - 参考实体
// ==========================================
// 职责: 市镇 / 堂区 / 班组 / 线路 / 污染类型 / 排放因子
// 红线: 只读参考数据，由上游生成一次
// ==========================================

use crate::domain::types::{RouteFrequency, Shift, TeamKind};
use serde::{Deserialize, Serialize};

/// 市镇 (Municipality)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Municipality {
    /// 市镇 ID (例如 MUN-CAS)
    pub id: String,

    /// 名称
    pub name: String,

    /// 人口
    pub population: u32,

    /// 面积 (km²)
    pub area_km2: f64,

    /// 展示颜色 (#RRGGBB)
    pub color: String,
}

/// 堂区 (Parish)，隶属唯一一个市镇
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parish {
    pub id: String,
    pub municipality_id: String,
    pub name: String,
    pub population: u32,
    pub area_km2: f64,
}

/// 收集班组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub municipality_id: String,
    pub kind: TeamKind,
    pub members: u32,
}

/// 收集线路
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub code: String,
    pub municipality_id: String,

    /// 覆盖堂区（第一个为主堂区）
    pub parish_ids: Vec<String>,

    pub team_id: String,
    pub frequency: RouteFrequency,
    pub shift: Shift,

    /// 收集点数量
    pub collection_points: u32,
}

/// 污染物类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContaminationType {
    pub id: String,
    pub name: String,
    pub color: String,

    /// 在污染物中的典型占比 (%)，全部类型合计 100
    pub typical_share_pct: f64,
}

/// 排放因子 (tCO2e / t)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactor {
    pub id: String,
    pub scenario: String,
    pub tco2e_per_ton: f64,
    pub source: String,
}
