// ==========================================
// 生物废弃物绩效指标 - 统计周期解析
// ==========================================
// 职责: 周期口令 → 当前窗口 + 等长的上一窗口（用于环比）
// 规则:
// - YTD = 与最新月份同一日历年的全部月份
// - 上一窗口紧邻当前窗口之前，在历史起点处截断
// - 历史为空 → 两个空窗口
// ==========================================

use crate::domain::period::PeriodToken;
use serde::{Deserialize, Serialize};

/// 解析后的周期窗口
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    /// 当前窗口月份（升序）
    pub current: Vec<String>,

    /// 上一窗口月份（升序，可能短于当前窗口）
    pub previous: Vec<String>,
}

impl PeriodWindow {
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// 当前窗口月数
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// 年化系数 12 / 月数（空窗口为 1）
    pub fn annualize_factor(&self) -> f64 {
        annualize_factor(self.current.len())
    }
}

/// 年化系数 12 / 月数（月数为 0 时为 1）
pub fn annualize_factor(month_count: usize) -> f64 {
    if month_count == 0 {
        1.0
    } else {
        12.0 / month_count as f64
    }
}

// ==========================================
// PeriodResolver - 周期解析器
// ==========================================
pub struct PeriodResolver;

impl PeriodResolver {
    /// 解析周期
    ///
    /// # 参数
    /// - `token`: 周期口令
    /// - `all_months`: 全部可用月份 (YYYY-MM)，无需预先排序
    ///
    /// # 返回
    /// PeriodWindow
    pub fn resolve(token: PeriodToken, all_months: &[String]) -> PeriodWindow {
        let mut sorted: Vec<String> = all_months.to_vec();
        sorted.sort();
        sorted.dedup();

        let current: Vec<String> = match token {
            PeriodToken::Last6Months => last_n(&sorted, 6),
            PeriodToken::Last12Months => last_n(&sorted, 12),
            PeriodToken::Ytd => match sorted.last() {
                Some(latest) => {
                    let year = year_prefix(latest);
                    sorted
                        .iter()
                        .filter(|m| year_prefix(m) == year)
                        .cloned()
                        .collect()
                }
                None => Vec::new(),
            },
            PeriodToken::All => sorted.clone(),
        };

        let previous = match current.first() {
            Some(first) => {
                let end = sorted.iter().position(|m| m == first).unwrap_or(0);
                let start = end.saturating_sub(current.len());
                sorted[start..end].to_vec()
            }
            None => Vec::new(),
        };

        if current.is_empty() {
            tracing::warn!(period = %token, "统计周期解析为空窗口");
        }

        PeriodWindow { current, previous }
    }

    /// 最近 n 个月（用于信号灯等固定窗口）
    pub fn last_months(all_months: &[String], n: usize) -> Vec<String> {
        let mut sorted: Vec<String> = all_months.to_vec();
        sorted.sort();
        sorted.dedup();
        last_n(&sorted, n)
    }
}

fn last_n(sorted: &[String], n: usize) -> Vec<String> {
    sorted[sorted.len().saturating_sub(n)..].to_vec()
}

fn year_prefix(month: &str) -> &str {
    month.split('-').next().unwrap_or(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn months() -> Vec<String> {
        // 2025-02 .. 2026-01
        let mut out = Vec::new();
        for m in 2..=12 {
            out.push(format!("2025-{:02}", m));
        }
        out.push("2026-01".to_string());
        out
    }

    #[test]
    fn test_ytd_only_latest_year() {
        let window = PeriodResolver::resolve(PeriodToken::Ytd, &months());
        assert_eq!(window.current, vec!["2026-01"]);
        assert!(window.current.iter().all(|m| m.starts_with("2026-")));
        assert_eq!(window.previous, vec!["2025-12"]);
    }

    #[test]
    fn test_last_6_months_with_previous() {
        let window = PeriodResolver::resolve(PeriodToken::Last6Months, &months());
        assert_eq!(window.current.first().unwrap(), "2025-08");
        assert_eq!(window.current.last().unwrap(), "2026-01");
        assert_eq!(window.previous.len(), 6);
        assert_eq!(window.previous.first().unwrap(), "2025-02");
        assert_eq!(window.previous.last().unwrap(), "2025-07");
    }

    #[test]
    fn test_previous_window_clipped_at_history_start() {
        let window = PeriodResolver::resolve(PeriodToken::Last12Months, &months());
        assert_eq!(window.current.len(), 12);
        assert!(window.previous.is_empty());

        let short: Vec<String> = months().into_iter().skip(4).collect(); // 8 个月
        let window = PeriodResolver::resolve(PeriodToken::Last6Months, &short);
        assert_eq!(window.previous.len(), 2);
    }

    #[test]
    fn test_empty_history() {
        let window = PeriodResolver::resolve(PeriodToken::Ytd, &[]);
        assert!(window.is_empty());
        assert!(window.previous.is_empty());
        assert_eq!(window.annualize_factor(), 1.0);
    }

    #[test]
    fn test_unsorted_input() {
        let mut shuffled = months();
        shuffled.reverse();
        let window = PeriodResolver::resolve(PeriodToken::Last6Months, &shuffled);
        assert_eq!(window.current.last().unwrap(), "2026-01");
    }
}
