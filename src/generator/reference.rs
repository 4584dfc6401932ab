// ==========================================
// 生物废弃物绩效指标 - 参考数据
// ==========================================
// 职责: 4 个市镇、18 个堂区、8 个班组、40 条线路、7 类污染物
// 红线: 固定数据，不消耗随机数
// ==========================================

use crate::domain::entities::{ContaminationType, Municipality, Parish, Route, Team};
use crate::domain::types::RouteFrequency::{Daily as D, ThreeTimesWeekly as W3, TwiceWeekly as W2};
use crate::domain::types::Shift::{Afternoon as PM, Morning as AM, Night as NT};
use crate::domain::types::{RouteFrequency, Shift, TeamKind};

// ==========================================
// 市镇级生成参数
// ==========================================

/// 市镇基准参数
pub(crate) struct MunicipalityProfile {
    pub id: &'static str,

    /// 基准污染率 (%)
    pub contamination_base_pct: f64,

    /// 每吨基准成本 (€)
    pub cost_per_ton_eur: f64,

    /// 生物废弃物占城市垃圾目标比例
    pub bio_share_target: f64,
}

pub(crate) static PROFILES: [MunicipalityProfile; 4] = [
    MunicipalityProfile { id: "MUN-CAS", contamination_base_pct: 9.0, cost_per_ton_eur: 45.0, bio_share_target: 0.20 },
    MunicipalityProfile { id: "MUN-SIN", contamination_base_pct: 12.0, cost_per_ton_eur: 42.0, bio_share_target: 0.18 },
    MunicipalityProfile { id: "MUN-OEI", contamination_base_pct: 10.0, cost_per_ton_eur: 48.0, bio_share_target: 0.22 },
    MunicipalityProfile { id: "MUN-MAF", contamination_base_pct: 7.0, cost_per_ton_eur: 40.0, bio_share_target: 0.15 },
];

/// 未登记市镇的兜底参数
pub(crate) static FALLBACK_PROFILE: MunicipalityProfile = MunicipalityProfile {
    id: "",
    contamination_base_pct: 10.0,
    cost_per_ton_eur: 44.0,
    bio_share_target: 0.19,
};

pub(crate) fn profile(municipality_id: &str) -> &'static MunicipalityProfile {
    PROFILES
        .iter()
        .find(|p| p.id == municipality_id)
        .unwrap_or(&FALLBACK_PROFILE)
}

// ==========================================
// 参考表
// ==========================================

const MUNICIPALITIES: [(&str, &str, u32, f64, &str); 4] = [
    ("MUN-CAS", "Cascais", 214_158, 97.4, "#3B82F6"),
    ("MUN-SIN", "Sintra", 391_066, 319.2, "#22C55E"),
    ("MUN-OEI", "Oeiras", 178_984, 45.7, "#F59E0B"),
    ("MUN-MAF", "Mafra", 82_552, 291.7, "#8B5CF6"),
];

const PARISHES: [(&str, &str, &str, u32, f64); 18] = [
    ("FRG-CAS-01", "MUN-CAS", "Cascais e Estoril", 64_000, 18.5),
    ("FRG-CAS-02", "MUN-CAS", "Carcavelos e Parede", 52_000, 9.8),
    ("FRG-CAS-03", "MUN-CAS", "São Domingos de Rana", 58_000, 22.4),
    ("FRG-CAS-04", "MUN-CAS", "Alcabideche", 40_158, 46.7),
    ("FRG-SIN-01", "MUN-SIN", "Agualva e Mira-Sintra", 85_000, 10.2),
    ("FRG-SIN-02", "MUN-SIN", "Queluz e Belas", 110_000, 28.5),
    ("FRG-SIN-03", "MUN-SIN", "Rio de Mouro", 78_000, 16.4),
    ("FRG-SIN-04", "MUN-SIN", "Cacém e São Marcos", 68_000, 11.8),
    ("FRG-SIN-05", "MUN-SIN", "Sintra (São Pedro)", 50_066, 252.3),
    ("FRG-OEI-01", "MUN-OEI", "Oeiras e São Julião", 52_000, 10.3),
    ("FRG-OEI-02", "MUN-OEI", "Algés, Linda-a-Velha e Cruz Quebrada", 55_000, 8.1),
    ("FRG-OEI-03", "MUN-OEI", "Carnaxide e Queijas", 42_000, 12.5),
    ("FRG-OEI-04", "MUN-OEI", "Porto Salvo", 29_984, 14.8),
    ("FRG-MAF-01", "MUN-MAF", "Mafra", 18_000, 42.1),
    ("FRG-MAF-02", "MUN-MAF", "Ericeira", 12_000, 28.5),
    ("FRG-MAF-03", "MUN-MAF", "Malveira e São Miguel de Alcainça", 15_000, 58.3),
    ("FRG-MAF-04", "MUN-MAF", "Enxara do Bispo e A-dos-Cunhados", 20_000, 85.6),
    ("FRG-MAF-05", "MUN-MAF", "Venda do Pinheiro e Santo Estêvão", 17_552, 77.2),
];

const TEAMS: [(&str, &str, &str, u32); 8] = [
    ("EQ-CAS-A", "Cascais A", "MUN-CAS", 4),
    ("EQ-CAS-B", "Cascais B", "MUN-CAS", 4),
    ("EQ-SIN-A", "Sintra A", "MUN-SIN", 5),
    ("EQ-SIN-B", "Sintra B", "MUN-SIN", 5),
    ("EQ-OEI-A", "Oeiras A", "MUN-OEI", 4),
    ("EQ-OEI-B", "Oeiras B", "MUN-OEI", 3),
    ("EQ-MAF-A", "Mafra A", "MUN-MAF", 3),
    ("EQ-MAF-B", "Mafra B", "MUN-MAF", 3),
];

/// 每市镇 10 条线路：(堂区序号, 班组后缀, 频次, 班次, 收集点)
type RouteRow = (&'static [u8], char, RouteFrequency, Shift, u32);

const ROUTES: [(&str, [RouteRow; 10]); 4] = [
    ("CAS", [
        (&[1], 'A', D, AM, 45),
        (&[1], 'A', D, PM, 38),
        (&[2], 'A', W3, AM, 52),
        (&[2], 'B', W3, PM, 41),
        (&[3], 'B', D, AM, 60),
        (&[3], 'B', W3, PM, 48),
        (&[4], 'A', W2, AM, 32),
        (&[4], 'B', W2, PM, 28),
        (&[1, 2], 'A', W3, NT, 35),
        (&[3, 4], 'B', W2, NT, 30),
    ]),
    ("SIN", [
        (&[1], 'A', D, AM, 55),
        (&[1], 'A', D, PM, 48),
        (&[2], 'A', D, AM, 70),
        (&[2], 'B', W3, PM, 62),
        (&[3], 'B', D, AM, 50),
        (&[3], 'A', W3, PM, 44),
        (&[4], 'B', W3, AM, 42),
        (&[4], 'B', W2, PM, 38),
        (&[5], 'A', W2, AM, 28),
        (&[5], 'B', W2, PM, 25),
    ]),
    ("OEI", [
        (&[1], 'A', D, AM, 50),
        (&[1], 'A', D, PM, 42),
        (&[2], 'A', D, AM, 55),
        (&[2], 'B', W3, PM, 46),
        (&[3], 'B', W3, AM, 40),
        (&[3], 'A', W3, PM, 36),
        (&[4], 'B', W2, AM, 28),
        (&[4], 'B', W2, PM, 24),
        (&[1, 2], 'A', W3, NT, 38),
        (&[3, 4], 'B', W2, NT, 30),
    ]),
    ("MAF", [
        (&[1], 'A', W3, AM, 30),
        (&[1], 'A', W2, PM, 22),
        (&[2], 'A', W3, AM, 18),
        (&[2], 'B', W2, PM, 15),
        (&[3], 'B', W3, AM, 22),
        (&[3], 'A', W2, PM, 18),
        (&[4], 'B', W2, AM, 25),
        (&[4], 'A', W2, PM, 20),
        (&[5], 'B', W2, AM, 20),
        (&[5], 'A', W2, PM, 18),
    ]),
];

/// 污染物类型：(ID, 名称, 颜色, 典型占比 %)，占比合计 100
const CONTAMINATION_TYPES: [(&str, &str, &str, f64); 7] = [
    ("CT-PLA", "Plastic", "#EF4444", 28.0),
    ("CT-VID", "Glass", "#10B981", 22.0),
    ("CT-PAP", "Paper/Cardboard", "#3B82F6", 18.0),
    ("CT-MET", "Metal", "#F59E0B", 12.0),
    ("CT-TEX", "Textile", "#8B5CF6", 8.0),
    ("CT-ORG", "Non-bio organic", "#06B6D4", 7.0),
    ("CT-OUT", "Other", "#94A3B8", 5.0),
];

// ==========================================
// 构造函数
// ==========================================

pub fn municipalities() -> Vec<Municipality> {
    MUNICIPALITIES
        .iter()
        .map(|&(id, name, population, area_km2, color)| Municipality {
            id: id.to_string(),
            name: name.to_string(),
            population,
            area_km2,
            color: color.to_string(),
        })
        .collect()
}

pub fn parishes() -> Vec<Parish> {
    PARISHES
        .iter()
        .map(|&(id, municipality_id, name, population, area_km2)| Parish {
            id: id.to_string(),
            municipality_id: municipality_id.to_string(),
            name: name.to_string(),
            population,
            area_km2,
        })
        .collect()
}

pub fn teams() -> Vec<Team> {
    TEAMS
        .iter()
        .map(|&(id, name, municipality_id, members)| Team {
            id: id.to_string(),
            name: name.to_string(),
            municipality_id: municipality_id.to_string(),
            kind: TeamKind::Collection,
            members,
        })
        .collect()
}

pub fn routes() -> Vec<Route> {
    ROUTES
        .iter()
        .flat_map(|(code, rows)| {
            rows.iter().enumerate().map(move |(i, (parishes, team, frequency, shift, points))| {
                Route {
                    id: format!("RT-{}-{:03}", code, i + 1),
                    code: format!("{}-{:03}", code, i + 1),
                    municipality_id: format!("MUN-{}", code),
                    parish_ids: parishes
                        .iter()
                        .map(|n| format!("FRG-{}-{:02}", code, n))
                        .collect(),
                    team_id: format!("EQ-{}-{}", code, team),
                    frequency: *frequency,
                    shift: *shift,
                    collection_points: *points,
                }
            })
        })
        .collect()
}

pub fn contamination_types() -> Vec<ContaminationType> {
    CONTAMINATION_TYPES
        .iter()
        .map(|&(id, name, color, typical_share_pct)| ContaminationType {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
            typical_share_pct,
        })
        .collect()
}
