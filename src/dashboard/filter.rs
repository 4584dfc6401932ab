// ==========================================
// 生物废弃物绩效指标 - 看板过滤条件
// ==========================================

use crate::domain::period::PeriodToken;
use crate::domain::types::Shift;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 月度看板过滤条件（CEO / CFO / 市议员 / Bee2Waste）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardFilter {
    /// None 表示全系统
    #[serde(default)]
    pub municipality: Option<String>,
    pub period: PeriodToken,
}

impl DashboardFilter {
    pub fn new(municipality: Option<&str>, period: PeriodToken) -> Self {
        Self {
            municipality: municipality.map(str::to_string),
            period,
        }
    }

    /// 全系统
    pub fn system(period: PeriodToken) -> Self {
        Self::new(None, period)
    }

    pub fn municipality(&self) -> Option<&str> {
        self.municipality.as_deref()
    }
}

/// 运营看板过滤条件（按日、可选班次）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalFilter {
    #[serde(default)]
    pub municipality: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub shift: Option<Shift>,
}

impl OperationalFilter {
    pub fn new(municipality: Option<&str>, date: NaiveDate, shift: Option<Shift>) -> Self {
        Self {
            municipality: municipality.map(str::to_string),
            date,
            shift,
        }
    }

    pub fn municipality(&self) -> Option<&str> {
        self.municipality.as_deref()
    }
}
