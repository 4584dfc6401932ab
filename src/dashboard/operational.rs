// ==========================================
// 生物废弃物绩效指标 - 运营看板（实时模拟）
// ==========================================
// 职责: 线路状态、最近抽检、活动告警、班组效率、分区事件、MTTR、逐时收集量
// 红线: 所有随机性来自注入的 RandomSource；同一种子 → 同一结果
// ==========================================

use crate::dashboard::filter::OperationalFilter;
use crate::domain::dataset::Dataset;
use crate::domain::entities::Route;
use crate::domain::types::{RouteState, Severity, Shift};
use crate::engine::aggregation::{round_to, safe_ratio};
use crate::engine::random_source::RandomSource;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 抽检袋数
const INSPECTED_BAGS: usize = 10;

/// 抽检污染概率
const INSPECTION_CONTAMINATION_P: f64 = 0.12;

/// 污染袋拒收概率
const CONTAMINATED_REJECTION_P: f64 = 0.30;

/// 处理中心分区
pub const SECTORS: [&str; 5] = ["sorting", "reception", "weighing", "compaction", "unloading"];

/// 告警类型与消息模板
const ALERT_KINDS: [(&str, &str); 5] = [
    ("belt_failure", "分拣传送带停机 - 分区 {s}"),
    ("blockage", "{s} 线路检测到堵塞"),
    ("critical_contamination", "{s} 污染水平严重"),
    ("sensor_failure", "分区 {s} 传感器故障"),
    ("rfid_error", "{s} RFID 读取错误"),
];

/// 线路状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStatus {
    pub route_id: String,
    pub code: String,
    pub shift: Shift,
    pub parish_name: String,
    pub team_id: String,
    pub planned_bags: u32,
    pub collected_bags: u32,
    pub weight_kg: f64,
    pub state: RouteState,
    pub started_at: Option<NaiveDateTime>,
    pub finished_at: Option<NaiveDateTime>,
}

/// 抽检记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectedBag {
    pub id: String,
    pub inspected_at: NaiveDateTime,
    pub route_code: String,
    pub weight_kg: f64,
    pub contaminated: bool,
    pub contamination_type: Option<String>,
    pub rejected: bool,
}

/// 活动告警
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveAlert {
    pub id: String,
    pub kind: String,
    pub severity: Severity,
    pub sector: String,
    pub raised_at: NaiveDateTime,
    pub message: String,
    pub resolved: bool,
}

/// 班组当日效率
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamProductivity {
    pub team_id: String,
    pub name: String,
    pub bags: u32,
    pub weight_kg: f64,
    pub routes_concluded: usize,
    pub routes_total: usize,
    pub efficiency_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorIncidents {
    pub sector: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyCollection {
    pub hour: u32,
    pub bags: u32,
    pub weight_kg: f64,
}

/// 当日汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub bags_today: u32,
    pub weight_today_kg: f64,
    pub routes_concluded: usize,
    pub routes_total: usize,
    pub open_alerts: usize,
}

/// 运营看板结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationalMetrics {
    pub date: NaiveDate,
    pub summary: DaySummary,
    pub routes: Vec<RouteStatus>,
    pub last_inspected_bags: Vec<InspectedBag>,
    pub active_alerts: Vec<ActiveAlert>,
    pub team_productivity: Vec<TeamProductivity>,
    pub incidents_by_sector: Vec<SectorIncidents>,
    pub mttr_minutes: f64,
    pub hourly_collection: Vec<HourlyCollection>,
}

// ==========================================
// OperationalAggregator - 运营看板聚合器
// ==========================================
#[derive(Debug, Default)]
pub struct OperationalAggregator;

impl OperationalAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 生成运营看板
    ///
    /// # 参数
    /// - `dataset`: 只读数据集（线路、班组、堂区、污染类型）
    /// - `filter`: 市镇 + 日期 + 可选班次
    /// - `rng`: 注入的随机源
    pub fn compute(
        &self,
        dataset: &Dataset,
        filter: &OperationalFilter,
        rng: &mut dyn RandomSource,
    ) -> OperationalMetrics {
        let routes: Vec<&Route> = dataset
            .routes_in(filter.municipality())
            .into_iter()
            .filter(|r| filter.shift.map_or(true, |s| r.shift == s))
            .collect();

        let statuses: Vec<RouteStatus> = routes
            .iter()
            .map(|route| simulate_route(dataset, route, filter.date, rng))
            .collect();

        let last_inspected_bags = inspect_bags(dataset, &routes, filter.date, rng);
        let active_alerts = raise_alerts(filter.date, rng);
        let team_productivity = team_productivity(dataset, filter, &statuses);

        let incidents_by_sector = SECTORS
            .iter()
            .map(|s| SectorIncidents {
                sector: s.to_string(),
                count: rng.int_in(0, 3) as u32,
            })
            .collect();

        let mttr_minutes = rng.normal(18.0, 8.0).clamp(5.0, 60.0).round();
        let hourly_collection = hourly_collection(rng);

        let summary = DaySummary {
            bags_today: statuses.iter().map(|r| r.collected_bags).sum(),
            weight_today_kg: statuses.iter().map(|r| r.weight_kg).sum(),
            routes_concluded: statuses
                .iter()
                .filter(|r| r.state == RouteState::Concluded)
                .count(),
            routes_total: statuses.len(),
            open_alerts: active_alerts.iter().filter(|a| !a.resolved).count(),
        };

        debug!(
            municipality = ?filter.municipality(),
            date = %filter.date,
            shift = ?filter.shift,
            routes = summary.routes_total,
            bags = summary.bags_today,
            "运营看板模拟完成"
        );

        OperationalMetrics {
            date: filter.date,
            summary,
            routes: statuses,
            last_inspected_bags,
            active_alerts,
            team_productivity,
            incidents_by_sector,
            mttr_minutes,
            hourly_collection,
        }
    }
}

// ==========================================
// 模拟步骤
// ==========================================

/// 日期 + 小时偏移 + 分钟（夜班可跨日）
fn at(date: NaiveDate, hour: i64, minute: i64) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::hours(hour) + Duration::minutes(minute)
}

fn simulate_route(
    dataset: &Dataset,
    route: &Route,
    date: NaiveDate,
    rng: &mut dyn RandomSource,
) -> RouteStatus {
    let planned = rng
        .with_noise(route.collection_points as f64 * 2.5, 0.15)
        .round()
        .max(0.0) as u32;
    let completion = rng.normal(0.88, 0.08).clamp(0.60, 1.0);
    let collected = (planned as f64 * completion).round() as u32;
    let weight_kg = (collected as f64 * rng.normal(8.0, 2.5).clamp(2.0, 20.0)).round();

    let roll = rng.next_f64();
    let state = if roll < 0.55 {
        RouteState::Concluded
    } else if roll < 0.75 {
        RouteState::InProgress
    } else if roll < 0.90 {
        RouteState::Pending
    } else {
        RouteState::Delayed
    };

    let base = route.shift.start_hour() as i64;
    let started_at = if state != RouteState::Pending {
        Some(at(date, base + rng.int_in(0, 1), rng.int_in(0, 59)))
    } else {
        None
    };
    let finished_at = if state == RouteState::Concluded {
        Some(at(date, base + rng.int_in(3, 6), rng.int_in(0, 59)))
    } else {
        None
    };

    let parish_name = route
        .parish_ids
        .first()
        .map(|id| {
            dataset
                .parish(id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| id.clone())
        })
        .unwrap_or_default();

    let pending = state == RouteState::Pending;
    RouteStatus {
        route_id: route.id.clone(),
        code: route.code.clone(),
        shift: route.shift,
        parish_name,
        team_id: route.team_id.clone(),
        planned_bags: planned,
        collected_bags: if pending { 0 } else { collected },
        weight_kg: if pending { 0.0 } else { weight_kg },
        state,
        started_at,
        finished_at,
    }
}

fn inspect_bags(
    dataset: &Dataset,
    routes: &[&Route],
    date: NaiveDate,
    rng: &mut dyn RandomSource,
) -> Vec<InspectedBag> {
    let mut bags: Vec<InspectedBag> = (0..INSPECTED_BAGS)
        .map(|i| {
            let contaminated = rng.chance(INSPECTION_CONTAMINATION_P);
            let weight_kg = round_to(rng.normal(8.0, 3.0).clamp(0.5, 30.0), 1);
            let contamination_type = if contaminated && !dataset.contamination_types.is_empty() {
                let idx = rng.index(dataset.contamination_types.len());
                Some(dataset.contamination_types[idx].id.clone())
            } else {
                None
            };
            let rejected = contaminated && rng.chance(CONTAMINATED_REJECTION_P);
            let route_code = if routes.is_empty() {
                "N/A".to_string()
            } else {
                routes[rng.index(routes.len())].code.clone()
            };

            InspectedBag {
                id: format!("BAG-{:06}", 1000 + i),
                inspected_at: at(date, rng.int_in(6, 20), rng.int_in(0, 59)),
                route_code,
                weight_kg,
                contaminated,
                contamination_type,
                rejected,
            }
        })
        .collect();

    // 最新的在前
    bags.sort_by(|a, b| b.inspected_at.cmp(&a.inspected_at));
    bags
}

fn raise_alerts(date: NaiveDate, rng: &mut dyn RandomSource) -> Vec<ActiveAlert> {
    let count = rng.int_in(2, 6) as usize;
    let mut alerts: Vec<ActiveAlert> = (0..count)
        .map(|i| {
            let (kind, template) = ALERT_KINDS[rng.index(ALERT_KINDS.len())];
            let sector = SECTORS[rng.index(SECTORS.len())];
            ActiveAlert {
                id: format!("ALR-{:04}", i + 1),
                kind: kind.to_string(),
                severity: Severity::ALL[rng.index(Severity::ALL.len())],
                sector: sector.to_string(),
                raised_at: at(date, rng.int_in(6, 20), rng.int_in(0, 59)),
                message: template.replace("{s}", sector),
                resolved: rng.chance(0.3),
            }
        })
        .collect();

    alerts.sort_by(|a, b| b.raised_at.cmp(&a.raised_at));
    alerts
}

fn team_productivity(
    dataset: &Dataset,
    filter: &OperationalFilter,
    statuses: &[RouteStatus],
) -> Vec<TeamProductivity> {
    dataset
        .teams_in(filter.municipality())
        .into_iter()
        .map(|team| {
            let team_routes: Vec<&RouteStatus> =
                statuses.iter().filter(|r| r.team_id == team.id).collect();
            let concluded = team_routes
                .iter()
                .filter(|r| r.state == RouteState::Concluded)
                .count();

            TeamProductivity {
                team_id: team.id.clone(),
                name: team.name.clone(),
                bags: team_routes.iter().map(|r| r.collected_bags).sum(),
                weight_kg: team_routes.iter().map(|r| r.weight_kg).sum(),
                routes_concluded: concluded,
                routes_total: team_routes.len(),
                efficiency_pct: (safe_ratio(concluded as f64, team_routes.len() as f64) * 100.0)
                    .round(),
            }
        })
        .collect()
}

/// 06:00 - 22:00 逐时收集量，高峰 08-12 与 15-18
fn hourly_collection(rng: &mut dyn RandomSource) -> Vec<HourlyCollection> {
    (6..=22)
        .map(|hour| {
            let peak = (8..=12).contains(&hour) || (15..=18).contains(&hour);
            let bags = if peak {
                rng.int_in(80, 200)
            } else {
                rng.int_in(20, 80)
            } as u32;
            let weight_kg = (bags as f64 * rng.normal(8.0, 2.0).clamp(3.0, 15.0)).round();
            HourlyCollection {
                hour,
                bags,
                weight_kg,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Parish, Team};
    use crate::domain::types::{RouteFrequency, TeamKind};
    use crate::engine::random_source::SeededRandom;

    fn route(id: &str, municipality: &str, shift: Shift, team: &str) -> Route {
        Route {
            id: id.to_string(),
            code: format!("R-{}", id),
            municipality_id: municipality.to_string(),
            parish_ids: vec!["P1".to_string()],
            team_id: team.to_string(),
            frequency: RouteFrequency::Daily,
            shift,
            collection_points: 40,
        }
    }

    fn dataset() -> Dataset {
        Dataset {
            parishes: vec![Parish {
                id: "P1".to_string(),
                municipality_id: "M1".to_string(),
                name: "Centro".to_string(),
                population: 10_000,
                area_km2: 3.0,
            }],
            teams: vec![Team {
                id: "T1".to_string(),
                name: "Team A".to_string(),
                municipality_id: "M1".to_string(),
                kind: TeamKind::Collection,
                members: 4,
            }],
            routes: vec![
                route("1", "M1", Shift::Morning, "T1"),
                route("2", "M1", Shift::Afternoon, "T1"),
                route("3", "M1", Shift::Night, "T1"),
                route("4", "M2", Shift::Morning, "T9"),
            ],
            ..Default::default()
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn test_shape_and_ranges() {
        let ds = dataset();
        let filter = OperationalFilter::new(None, date(), None);
        let mut rng = SeededRandom::default();
        let metrics = OperationalAggregator::new().compute(&ds, &filter, &mut rng);

        assert_eq!(metrics.routes.len(), 4);
        assert_eq!(metrics.last_inspected_bags.len(), 10);
        assert!((2..=6).contains(&metrics.active_alerts.len()));
        assert_eq!(metrics.incidents_by_sector.len(), 5);
        assert!(metrics.incidents_by_sector.iter().all(|s| s.count <= 3));
        assert!((5.0..=60.0).contains(&metrics.mttr_minutes));
        assert_eq!(metrics.hourly_collection.len(), 17);
        assert_eq!(metrics.hourly_collection[0].hour, 6);

        for r in &metrics.routes {
            assert!(r.collected_bags <= r.planned_bags);
            if r.state == RouteState::Pending {
                assert_eq!(r.collected_bags, 0);
                assert!(r.started_at.is_none());
            }
            if r.state == RouteState::Concluded {
                assert!(r.finished_at.is_some());
            }
        }
        for h in &metrics.hourly_collection {
            assert!((20..=200).contains(&h.bags));
        }
        for bag in &metrics.last_inspected_bags {
            assert!(!bag.rejected || bag.contaminated);
            assert!((0.5..=30.0).contains(&bag.weight_kg));
        }
        let times: Vec<_> = metrics.last_inspected_bags.iter().map(|b| b.inspected_at).collect();
        assert!(times.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_same_seed_same_output() {
        let ds = dataset();
        let filter = OperationalFilter::new(Some("M1"), date(), None);
        let a = OperationalAggregator::new().compute(&ds, &filter, &mut SeededRandom::from_seed_u64(3));
        let b = OperationalAggregator::new().compute(&ds, &filter, &mut SeededRandom::from_seed_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_shift_and_municipality_filter() {
        let ds = dataset();
        let filter = OperationalFilter::new(Some("M1"), date(), Some(Shift::Night));
        let metrics = OperationalAggregator::new().compute(&ds, &filter, &mut SeededRandom::default());
        assert_eq!(metrics.routes.len(), 1);
        assert_eq!(metrics.routes[0].shift, Shift::Night);
        assert_eq!(metrics.routes[0].parish_name, "Centro");
        assert_eq!(metrics.team_productivity.len(), 1);
        assert_eq!(metrics.team_productivity[0].routes_total, 1);
    }

    #[test]
    fn test_summary_matches_routes() {
        let ds = dataset();
        let filter = OperationalFilter::new(None, date(), None);
        let metrics = OperationalAggregator::new().compute(&ds, &filter, &mut SeededRandom::default());
        let bags: u32 = metrics.routes.iter().map(|r| r.collected_bags).sum();
        assert_eq!(metrics.summary.bags_today, bags);
        assert_eq!(metrics.summary.routes_total, 4);
        assert!(metrics.summary.open_alerts <= metrics.active_alerts.len());
    }

    #[test]
    fn test_no_routes() {
        let filter = OperationalFilter::new(None, date(), None);
        let metrics =
            OperationalAggregator::new().compute(&Dataset::default(), &filter, &mut SeededRandom::default());
        assert!(metrics.routes.is_empty());
        assert_eq!(metrics.summary.bags_today, 0);
        assert!(metrics.last_inspected_bags.iter().all(|b| b.route_code == "N/A"));
    }
}
