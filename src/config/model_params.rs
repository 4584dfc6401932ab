use serde::{Deserialize, Serialize};

/// 模型参数（产出模型、收入单价、预算口径、运行时长）
///
/// 所有字段都有默认值，JSON 中只需写要覆写的键。
/// GIS 区间/权重与排放因子不在此处，属于固定常量。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    // ===== 产出模型 =====
    /// 堆肥占干净量比例
    pub compost_share: f64,

    /// 厌氧消化占干净量比例
    pub digestion_share: f64,

    /// 每吨消化原料的沼气产量 (m³/t)
    pub biogas_m3_per_ton: f64,

    /// 每 m³ 沼气发电量 (kWh/m³)
    pub kwh_per_m3: f64,

    // ===== 收入单价 =====
    /// 堆肥售价 (€/t)
    pub compost_eur_per_ton: f64,

    /// 电价 (€/kWh)
    pub energy_eur_per_kwh: f64,

    /// 污染物中可回收部分比例
    pub recyclable_recovery_share: f64,

    /// 可回收物售价 (€/t)
    pub recyclable_eur_per_ton: f64,

    /// 上期收入估算中假定的污染物占比（可回收物一项）
    pub baseline_contaminant_share: f64,

    // ===== 预算 =====
    /// 计划预算 = 实际成本 × 该比例（占位口径，尚无真实预算数据）
    pub budget_ratio: f64,

    // ===== 系统健康 =====
    /// 每月运行小时数（可用率分母）
    pub hours_per_month: f64,

    /// 车队平均效率 (%)，模拟值
    pub fleet_efficiency_pct: f64,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            compost_share: 0.30,
            digestion_share: 0.70,
            biogas_m3_per_ton: 120.0,
            kwh_per_m3: 6.0,
            compost_eur_per_ton: 15.0,
            energy_eur_per_kwh: 0.08,
            recyclable_recovery_share: 0.40,
            recyclable_eur_per_ton: 5.0,
            baseline_contaminant_share: 0.10,
            budget_ratio: 0.95,
            hours_per_month: 30.0 * 24.0,
            fleet_efficiency_pct: 88.0,
        }
    }
}

impl ModelParameters {
    /// 参数校验
    ///
    /// # 返回
    /// - Ok(()): 合法
    /// - Err(String): 第一个不合法的字段说明
    pub fn validate(&self) -> Result<(), String> {
        let shares = [
            ("compost_share", self.compost_share),
            ("digestion_share", self.digestion_share),
            ("recyclable_recovery_share", self.recyclable_recovery_share),
            ("baseline_contaminant_share", self.baseline_contaminant_share),
        ];
        for (name, value) in shares {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} 必须在 [0, 1] 内, 实际为 {}", name, value));
            }
        }
        if self.compost_share + self.digestion_share > 1.0 + 1e-9 {
            return Err("compost_share + digestion_share 不能超过 1".to_string());
        }

        let non_negative = [
            ("biogas_m3_per_ton", self.biogas_m3_per_ton),
            ("kwh_per_m3", self.kwh_per_m3),
            ("compost_eur_per_ton", self.compost_eur_per_ton),
            ("energy_eur_per_kwh", self.energy_eur_per_kwh),
            ("recyclable_eur_per_ton", self.recyclable_eur_per_ton),
            ("fleet_efficiency_pct", self.fleet_efficiency_pct),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} 必须为非负数, 实际为 {}", name, value));
            }
        }

        if !self.budget_ratio.is_finite() || self.budget_ratio <= 0.0 {
            return Err(format!("budget_ratio 必须为正数, 实际为 {}", self.budget_ratio));
        }
        if !self.hours_per_month.is_finite() || self.hours_per_month <= 0.0 {
            return Err(format!(
                "hours_per_month 必须为正数, 实际为 {}",
                self.hours_per_month
            ));
        }
        Ok(())
    }

    /// 干净量 (t) 对应的堆肥产量 (t)
    pub fn compost_tons(&self, clean_tons: f64) -> f64 {
        clean_tons * self.compost_share
    }

    /// 干净量 (t) 对应的沼气量 (m³)
    pub fn biogas_m3(&self, clean_tons: f64) -> f64 {
        clean_tons * self.digestion_share * self.biogas_m3_per_ton
    }

    /// 干净量 (t) 对应的发电量 (kWh)
    pub fn energy_kwh(&self, clean_tons: f64) -> f64 {
        self.biogas_m3(clean_tons) * self.kwh_per_m3
    }
}
