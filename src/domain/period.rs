// ==========================================
// 生物废弃物绩效指标 - 统计周期
// ==========================================
// 周期口令: last_6_months / ytd / last_12_months / all
// 兼容旧口令: ultimos_6m / ultimos_12m
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 周期口令解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("未知的统计周期: {0}")]
pub struct PeriodParseError(pub String);

/// 统计周期口令
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodToken {
    /// 最近 6 个月
    #[serde(rename = "last_6_months", alias = "ultimos_6m")]
    Last6Months,

    /// 本年至今（以最新月份所在年为准）
    Ytd,

    /// 最近 12 个月
    #[serde(rename = "last_12_months", alias = "ultimos_12m")]
    Last12Months,

    /// 全部历史
    All,
}

impl fmt::Display for PeriodToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodToken::Last6Months => write!(f, "last_6_months"),
            PeriodToken::Ytd => write!(f, "ytd"),
            PeriodToken::Last12Months => write!(f, "last_12_months"),
            PeriodToken::All => write!(f, "all"),
        }
    }
}

impl FromStr for PeriodToken {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last_6_months" | "last-6-months" | "ultimos_6m" => Ok(PeriodToken::Last6Months),
            "ytd" | "year-to-date" | "year_to_date" => Ok(PeriodToken::Ytd),
            "last_12_months" | "last-12-months" | "ultimos_12m" => Ok(PeriodToken::Last12Months),
            "all" => Ok(PeriodToken::All),
            other => Err(PeriodParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens() {
        assert_eq!("ytd".parse::<PeriodToken>().unwrap(), PeriodToken::Ytd);
        assert_eq!(
            "ultimos_6m".parse::<PeriodToken>().unwrap(),
            PeriodToken::Last6Months
        );
        assert_eq!(
            " Last-12-Months ".parse::<PeriodToken>().unwrap(),
            PeriodToken::Last12Months
        );
        assert!("trimestre".parse::<PeriodToken>().is_err());
    }

    #[test]
    fn test_serde_alias() {
        let token: PeriodToken = serde_json::from_str("\"ultimos_12m\"").unwrap();
        assert_eq!(token, PeriodToken::Last12Months);
        assert_eq!(
            serde_json::to_string(&PeriodToken::Last6Months).unwrap(),
            "\"last_6_months\""
        );
    }
}
