// ==========================================
// 生物废弃物绩效指标 - 可注入随机源
// ==========================================
// 职责: 为运营看板实时模拟与数据生成器提供随机数
// 红线: 核心计算中唯一的随机来源；同一种子 → 同一输出
// ==========================================

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// 默认种子
pub const DEFAULT_SEED: u64 = 42;

/// 随机源 Trait
///
/// 实现者提供 `next_f64` 与 `normal`，其余分布由默认方法推导。
/// 保持对象安全，调用方以 `&mut dyn RandomSource` 注入。
pub trait RandomSource {
    /// 均匀分布 [0, 1)
    fn next_f64(&mut self) -> f64;

    /// 均匀分布 [min, max)
    fn float_in(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// 闭区间整数 [min, max]
    fn int_in(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f64;
        let offset = (self.next_f64() * span).floor() as i64;
        min + offset.min(max - min)
    }

    /// 正态分布 N(mean, std_dev)
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64;

    /// 乘性噪声: value · (1 + U(−noise, noise))
    fn with_noise(&mut self, value: f64, noise: f64) -> f64 {
        value * (1.0 + self.float_in(-noise, noise))
    }

    /// 以概率 p 返回 true
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// 均匀选取下标，len 为 0 时返回 0
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.int_in(0, len as i64 - 1) as usize
    }

    /// 按权重选取下标（权重无需归一化）
    fn weighted_index(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        if weights.is_empty() || total <= 0.0 {
            return 0;
        }
        let mut roll = self.next_f64() * total;
        for (i, w) in weights.iter().enumerate() {
            if roll < *w {
                return i;
            }
            roll -= w;
        }
        weights.len() - 1
    }
}

// ==========================================
// SeededRandom - ChaCha8 确定性随机源
// ==========================================

/// 确定性随机源（跨平台可复现）
pub struct SeededRandom(ChaCha8Rng);

impl Default for SeededRandom {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl SeededRandom {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    /// 标准差非法（负数或非有限）时退化为均值
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        match Normal::new(mean, std_dev) {
            Ok(dist) => dist.sample(&mut self.0),
            Err(_) => mean,
        }
    }
}
