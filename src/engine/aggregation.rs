// ==========================================
// 生物废弃物绩效指标 - 加权聚合原语
// ==========================================
// 职责: 分组求和、加权平均、安全除法、环比、定精度舍入
// 红线: 任何比值都必须保护分母，分母为 0 时返回 0（不得产生 NaN/Inf）
// ==========================================

use crate::domain::records::MonthlyParishRecord;
use std::collections::BTreeMap;

/// 分组求和
///
/// # 参数
/// - `records`: 记录集合
/// - `key`: 分组键提取
/// - `value`: 数值提取
///
/// # 返回
/// 键 → 合计（按键有序）
pub fn group_sum_by<T, K, FK, FV>(records: &[T], key: FK, value: FV) -> BTreeMap<K, f64>
where
    K: Ord,
    FK: Fn(&T) -> K,
    FV: Fn(&T) -> f64,
{
    let mut groups = BTreeMap::new();
    for record in records {
        *groups.entry(key(record)).or_insert(0.0) += value(record);
    }
    groups
}

/// 加权平均 Σ(value·weight) / Σweight
///
/// 总权重为 0 时返回 0
pub fn weighted_average<T, FV, FW>(records: &[T], value: FV, weight: FW) -> f64
where
    FV: Fn(&T) -> f64,
    FW: Fn(&T) -> f64,
{
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for record in records {
        let w = weight(record);
        weighted_sum += value(record) * w;
        total_weight += w;
    }
    safe_ratio(weighted_sum, total_weight)
}

/// 安全除法：分母为 0 或结果非有限时返回 0
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

/// 简单均值，空序列返回 0
pub fn mean(values: &[f64]) -> f64 {
    safe_ratio(values.iter().sum(), values.len() as f64)
}

/// 环比变化率 (%)，保留 1 位小数
///
/// 口径: (current − previous) / previous · 100
/// previous 为 0 时: current > 0 → 100, 否则 0
pub fn pct_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    round_to((current - previous) / previous * 100.0, 1)
}

/// 定精度舍入（唯一的舍入原语，不做本地化格式化）
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

// ==========================================
// 堂区月度记录的常用聚合
// ==========================================

/// 收集量与污染的累计器
///
/// 污染率按重量加权
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollectionTotals {
    pub weight_kg: f64,
    pub bags: f64,
    pub volume_m3: f64,
    pub rejected_bags: f64,
    contamination_weighted: f64,
}

impl CollectionTotals {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a MonthlyParishRecord>,
    {
        let mut totals = Self::default();
        for r in records {
            totals.add(r);
        }
        totals
    }

    pub fn add(&mut self, record: &MonthlyParishRecord) {
        self.weight_kg += record.total_weight_kg;
        self.bags += record.bag_count as f64;
        self.volume_m3 += record.total_volume_m3;
        self.rejected_bags += record.rejected_bags as f64;
        self.contamination_weighted += record.contamination_rate * record.total_weight_kg;
    }

    pub fn tons(&self) -> f64 {
        self.weight_kg / 1000.0
    }

    /// 按重量加权的污染率 (%)
    pub fn contamination_pct(&self) -> f64 {
        safe_ratio(self.contamination_weighted, self.weight_kg)
    }

    /// 拒收率 (%)
    pub fn rejection_pct(&self) -> f64 {
        safe_ratio(self.rejected_bags, self.bags) * 100.0
    }
}

/// 按月份汇总（仅包含出现过的月份）
pub fn totals_by_month<'a, I>(records: I) -> BTreeMap<String, CollectionTotals>
where
    I: IntoIterator<Item = &'a MonthlyParishRecord>,
{
    let mut by_month: BTreeMap<String, CollectionTotals> = BTreeMap::new();
    for r in records {
        by_month.entry(r.month.clone()).or_default().add(r);
    }
    by_month
}
