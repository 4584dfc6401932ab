// ==========================================
// 生物废弃物绩效指标 - CO2 避免排放计算
// ==========================================
// 完整公式:
//   CO2e = B·(1−c)·(EF_ref − EF_treat) − B·c·EF_rej − B·EF_ops
// 简化公式:
//   CO2e = B·(1−c)·(EF_ref − EF_treat)
// B = 收集量 (t), c = 污染率 (0-1)
// 红线: 结果不截断，高污染时允许为负
// ==========================================

use crate::domain::entities::EmissionFactor;
use crate::engine::aggregation::safe_ratio;

/// 填埋参考排放因子 (tCO2e/t)
pub const EF_LANDFILL: f64 = 0.900;
/// 厌氧消化处理排放因子
pub const EF_ANAEROBIC_DIGESTION: f64 = 0.100;
/// 堆肥处理排放因子（仅目录项）
pub const EF_COMPOSTING: f64 = 0.050;
/// 运营排放因子
pub const EF_OPERATIONS: f64 = 0.030;
/// 拒收物处置排放因子
pub const EF_REJECTED: f64 = 0.500;

/// 每吨净减排 = EF_ref − EF_treat
const NET_TREATMENT_GAIN: f64 = EF_LANDFILL - EF_ANAEROBIC_DIGESTION;

/// 完整口径的避免排放 (tCO2e)
///
/// # 参数
/// - `bio_tons`: 收集量 (t)
/// - `contamination_pct`: 污染率 (0-100)
pub fn co2_complete(bio_tons: f64, contamination_pct: f64) -> f64 {
    let c = contamination_pct / 100.0;
    let clean = bio_tons * (1.0 - c);
    let rejected = bio_tons * c;
    clean * NET_TREATMENT_GAIN - rejected * EF_REJECTED - bio_tons * EF_OPERATIONS
}

/// 简化口径：只计干净部分的净减排
pub fn co2_simplified(bio_tons: f64, contamination_pct: f64) -> f64 {
    let c = contamination_pct / 100.0;
    bio_tons * (1.0 - c) * NET_TREATMENT_GAIN
}

/// 全部填埋时的参考排放
pub fn co2_landfill_reference(bio_tons: f64) -> f64 {
    bio_tons * EF_LANDFILL
}

/// 每吨避免排放强度，收集量为 0 时为 0
pub fn co2_intensity_per_ton(bio_tons: f64, contamination_pct: f64) -> f64 {
    if bio_tons == 0.0 {
        return 0.0;
    }
    safe_ratio(co2_complete(bio_tons, contamination_pct), bio_tons)
}

/// 排放因子目录
pub fn emission_factor_catalogue() -> Vec<EmissionFactor> {
    let entry = |id: &str, scenario: &str, factor: f64, source: &str| EmissionFactor {
        id: id.to_string(),
        scenario: scenario.to_string(),
        tco2e_per_ton: factor,
        source: source.to_string(),
    };

    vec![
        entry("EF-REF", "landfill", EF_LANDFILL, "IPCC 2019"),
        entry("EF-DA", "anaerobic_digestion", EF_ANAEROBIC_DIGESTION, "IPCC 2019"),
        entry("EF-COMP", "composting", EF_COMPOSTING, "IPCC 2019"),
        entry("EF-OPS", "operations", EF_OPERATIONS, "operator estimate"),
        entry("EF-REJ", "rejected_to_landfill", EF_REJECTED, "IPCC 2019"),
    ]
}
