// ==========================================
// 生物废弃物绩效指标 - 领域类型定义
// ==========================================
// 职责: 枚举型领域概念（信号灯颜色、趋势、等级、班次等）
// 序列化格式: SCREAMING_SNAKE_CASE
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 信号灯颜色 (Semaphore Color)
// ==========================================
// 顺序: Green < Yellow < Orange < Red
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemaphoreColor {
    Green,  // 正常
    Yellow, // 关注
    Orange, // 需干预
    Red,    // 紧急
}

impl SemaphoreColor {
    /// 按负面信号数量映射颜色 (0→绿, 1→黄, 2→橙, ≥3→红)
    pub fn from_negative_count(count: usize) -> Self {
        match count {
            0 => SemaphoreColor::Green,
            1 => SemaphoreColor::Yellow,
            2 => SemaphoreColor::Orange,
            _ => SemaphoreColor::Red,
        }
    }
}

impl fmt::Display for SemaphoreColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemaphoreColor::Green => write!(f, "GREEN"),
            SemaphoreColor::Yellow => write!(f, "YELLOW"),
            SemaphoreColor::Orange => write!(f, "ORANGE"),
            SemaphoreColor::Red => write!(f, "RED"),
        }
    }
}

// ==========================================
// 趋势方向 (Trend Direction)
// ==========================================
// 三态: 正面 / 中性 / 负面（"正面"指对业务有利，不一定是数值上升）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Positive,
    Neutral,
    Negative,
}

impl TrendDirection {
    pub fn is_negative(&self) -> bool {
        matches!(self, TrendDirection::Negative)
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Positive => write!(f, "POSITIVE"),
            TrendDirection::Neutral => write!(f, "NEUTRAL"),
            TrendDirection::Negative => write!(f, "NEGATIVE"),
        }
    }
}

// ==========================================
// 综合指数等级 (GIS Classification)
// ==========================================
// 阈值: ≥80 优秀, ≥65 良好, ≥50 合格, ≥35 不足, 其余 危急
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GisClassification {
    Critical,
    Insufficient,
    Satisfactory,
    Good,
    Excellent,
}

impl GisClassification {
    /// 由 0-100 分值映射等级
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            GisClassification::Excellent
        } else if score >= 65.0 {
            GisClassification::Good
        } else if score >= 50.0 {
            GisClassification::Satisfactory
        } else if score >= 35.0 {
            GisClassification::Insufficient
        } else {
            GisClassification::Critical
        }
    }
}

impl fmt::Display for GisClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GisClassification::Excellent => write!(f, "EXCELLENT"),
            GisClassification::Good => write!(f, "GOOD"),
            GisClassification::Satisfactory => write!(f, "SATISFACTORY"),
            GisClassification::Insufficient => write!(f, "INSUFFICIENT"),
            GisClassification::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ==========================================
// 事件严重度 (Incident Severity)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ==========================================
// 班次 (Shift)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shift {
    Morning,   // 早班 06:00
    Afternoon, // 午班 14:00
    Night,     // 夜班 22:00
}

impl Shift {
    /// 班次起始小时
    pub fn start_hour(&self) -> u32 {
        match self {
            Shift::Morning => 6,
            Shift::Afternoon => 14,
            Shift::Night => 22,
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Morning => write!(f, "MORNING"),
            Shift::Afternoon => write!(f, "AFTERNOON"),
            Shift::Night => write!(f, "NIGHT"),
        }
    }
}

// ==========================================
// 线路执行状态 (Route State)
// ==========================================
// 仅用于运营看板的实时模拟
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteState {
    Concluded,  // 已完成
    InProgress, // 进行中
    Pending,    // 待执行
    Delayed,    // 延误
}

impl fmt::Display for RouteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteState::Concluded => write!(f, "CONCLUDED"),
            RouteState::InProgress => write!(f, "IN_PROGRESS"),
            RouteState::Pending => write!(f, "PENDING"),
            RouteState::Delayed => write!(f, "DELAYED"),
        }
    }
}

// ==========================================
// 收集频次 (Route Frequency)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteFrequency {
    Daily,
    ThreeTimesWeekly,
    TwiceWeekly,
}

// ==========================================
// 班组类型 (Team Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamKind {
    Collection, // 收集
    Inspection, // 检验
}
