// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use biowaste_metrics::domain::records::{
    Incident, MonthlyCostRecord, MonthlyIncidentRecord, MonthlyParishRecord,
    MonthlyUrbanWasteRecord,
};
use biowaste_metrics::domain::types::{RouteFrequency, Severity, Shift, TeamKind};
use biowaste_metrics::domain::{Dataset, Municipality, Parish, Route, Team};
use chrono::NaiveDate;
use std::collections::BTreeMap;

// ==========================================
// 堂区月度记录构建器
// ==========================================

pub struct ParishMonthBuilder {
    record: MonthlyParishRecord,
}

impl ParishMonthBuilder {
    /// 默认 100 袋、1000 kg、污染率 10%、拒收 0
    pub fn new(month: &str, parish_id: &str, municipality_id: &str) -> Self {
        Self {
            record: MonthlyParishRecord {
                month: month.to_string(),
                parish_id: parish_id.to_string(),
                municipality_id: municipality_id.to_string(),
                bag_count: 100,
                total_weight_kg: 1_000.0,
                total_volume_m3: 1.2,
                avg_bag_weight_kg: 10.0,
                contamination_rate: 10.0,
                rejected_bags: 0,
                contamination_by_type: BTreeMap::new(),
            },
        }
    }

    pub fn weight(mut self, kg: f64) -> Self {
        self.record.total_weight_kg = kg;
        self.record.avg_bag_weight_kg = kg / self.record.bag_count.max(1) as f64;
        self
    }

    pub fn bags(mut self, bags: u32) -> Self {
        self.record.bag_count = bags;
        self
    }

    pub fn contamination(mut self, pct: f64) -> Self {
        self.record.contamination_rate = pct;
        self
    }

    pub fn rejected(mut self, bags: u32) -> Self {
        self.record.rejected_bags = bags;
        self
    }

    pub fn contaminant(mut self, type_id: &str, kg: f64) -> Self {
        self.record.contamination_by_type.insert(type_id.to_string(), kg);
        self
    }

    pub fn build(self) -> MonthlyParishRecord {
        self.record
    }
}

// ==========================================
// Dataset 构建器
// ==========================================

#[derive(Default)]
pub struct DatasetBuilder {
    dataset: Dataset,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 市镇（人口由堂区累加，这里只记名称）
    pub fn municipality(mut self, id: &str, name: &str) -> Self {
        self.dataset.municipalities.push(Municipality {
            id: id.to_string(),
            name: name.to_string(),
            population: 0,
            area_km2: 10.0,
            color: "#3B82F6".to_string(),
        });
        self
    }

    pub fn parish(mut self, id: &str, municipality_id: &str, population: u32) -> Self {
        self.dataset.parishes.push(Parish {
            id: id.to_string(),
            municipality_id: municipality_id.to_string(),
            name: format!("Parish {}", id),
            population,
            area_km2: 5.0,
        });
        if let Some(m) = self
            .dataset
            .municipalities
            .iter_mut()
            .find(|m| m.id == municipality_id)
        {
            m.population += population;
        }
        self
    }

    pub fn team(mut self, id: &str, municipality_id: &str) -> Self {
        self.dataset.teams.push(Team {
            id: id.to_string(),
            name: format!("Team {}", id),
            municipality_id: municipality_id.to_string(),
            kind: TeamKind::Collection,
            members: 4,
        });
        self
    }

    pub fn route(mut self, id: &str, parish_id: &str, team_id: &str, shift: Shift) -> Self {
        let municipality_id = self
            .dataset
            .parishes
            .iter()
            .find(|p| p.id == parish_id)
            .map(|p| p.municipality_id.clone())
            .unwrap_or_default();
        self.dataset.routes.push(Route {
            id: id.to_string(),
            code: id.to_string(),
            municipality_id,
            parish_ids: vec![parish_id.to_string()],
            team_id: team_id.to_string(),
            frequency: RouteFrequency::Daily,
            shift,
            collection_points: 40,
        });
        self
    }

    pub fn record(mut self, record: MonthlyParishRecord) -> Self {
        self.dataset.monthly_parish.push(record);
        self
    }

    /// 成本按 35/25/15/20/5 拆分
    pub fn cost(mut self, month: &str, municipality_id: &str, total_eur: f64) -> Self {
        self.dataset.monthly_costs.push(MonthlyCostRecord {
            month: month.to_string(),
            municipality_id: municipality_id.to_string(),
            collection_eur: total_eur * 0.35,
            treatment_eur: total_eur * 0.25,
            transport_eur: total_eur * 0.15,
            labour_eur: total_eur * 0.20,
            overhead_eur: total_eur * 0.05,
            total_eur,
        });
        self
    }

    pub fn urban_waste(mut self, month: &str, municipality_id: &str, tons: f64) -> Self {
        self.dataset.monthly_urban_waste.push(MonthlyUrbanWasteRecord {
            month: month.to_string(),
            municipality_id: municipality_id.to_string(),
            total_urban_waste_ton: tons,
        });
        self
    }

    /// 追加一个事件到 (月份, 市镇) 记录
    pub fn incident(
        mut self,
        month: &str,
        municipality_id: &str,
        kind: &str,
        severity: Severity,
        minutes: u32,
        resolved: bool,
    ) -> Self {
        let date = NaiveDate::parse_from_str(&format!("{}-10", month), "%Y-%m-%d")
            .expect("月份格式应为 YYYY-MM");
        let count = self
            .dataset
            .monthly_incidents
            .iter()
            .map(|r| r.incidents.len())
            .sum::<usize>();
        let incident = Incident {
            id: format!("INC-{:05}", count + 1),
            kind: kind.to_string(),
            severity,
            sector: "sorting".to_string(),
            occurred_at: date.and_hms_opt(10, 0, 0).expect("有效时间"),
            resolution_minutes: minutes,
            resolved,
        };

        match self
            .dataset
            .monthly_incidents
            .iter_mut()
            .find(|r| r.month == month && r.municipality_id == municipality_id)
        {
            Some(record) => record.incidents.push(incident),
            None => self.dataset.monthly_incidents.push(MonthlyIncidentRecord {
                month: month.to_string(),
                municipality_id: municipality_id.to_string(),
                incidents: vec![incident],
            }),
        }
        self
    }

    pub fn build(self) -> Dataset {
        self.dataset
    }
}

/// 单市镇、两堂区、n 个月的基础数据集
///
/// - M1 / Alpha: P1 (1000 人), P2 (3000 人)
/// - 每月每堂区 1000 kg、100 袋、污染 10%
pub fn two_parish_dataset(months: &[&str]) -> Dataset {
    let mut builder = DatasetBuilder::new()
        .municipality("M1", "Alpha")
        .parish("P1", "M1", 1_000)
        .parish("P2", "M1", 3_000);
    for month in months {
        builder = builder
            .record(ParishMonthBuilder::new(month, "P1", "M1").build())
            .record(ParishMonthBuilder::new(month, "P2", "M1").build());
    }
    builder.build()
}
