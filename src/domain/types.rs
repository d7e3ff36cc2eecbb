// ==========================================
// 货运撮合系统 - 领域类型定义
// ==========================================
// 职责: 挂车/车厢类型、匹配状态、拒绝原因等枚举
// 红线: 枚举的序列化格式即持久化格式,不得随意改名
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 挂车用途类型 (Implement Application Type)
// ==========================================
// 序列化格式: kebab-case (与对外接口一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImplementApplicationType {
    BulkTanker,        // 散装罐
    DryVan,            // 厢式干货
    RefrigeratedVan,   // 冷藏厢
    Tanker,            // 液罐
    Flatbed,           // 平板
    ExtendableFlatbed, // 加长平板
    ContainerChassis,  // 集装箱骨架
    Livestock,         // 牲畜
    Dump,              // 自卸
    CoilCarrier,       // 卷钢专用
    Forestry,          // 林木
}

impl ImplementApplicationType {
    /// 全部类型 (按声明顺序)
    pub const ALL: [ImplementApplicationType; 11] = [
        ImplementApplicationType::BulkTanker,
        ImplementApplicationType::DryVan,
        ImplementApplicationType::RefrigeratedVan,
        ImplementApplicationType::Tanker,
        ImplementApplicationType::Flatbed,
        ImplementApplicationType::ExtendableFlatbed,
        ImplementApplicationType::ContainerChassis,
        ImplementApplicationType::Livestock,
        ImplementApplicationType::Dump,
        ImplementApplicationType::CoilCarrier,
        ImplementApplicationType::Forestry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImplementApplicationType::BulkTanker => "bulk-tanker",
            ImplementApplicationType::DryVan => "dry-van",
            ImplementApplicationType::RefrigeratedVan => "refrigerated-van",
            ImplementApplicationType::Tanker => "tanker",
            ImplementApplicationType::Flatbed => "flatbed",
            ImplementApplicationType::ExtendableFlatbed => "extendable-flatbed",
            ImplementApplicationType::ContainerChassis => "container-chassis",
            ImplementApplicationType::Livestock => "livestock",
            ImplementApplicationType::Dump => "dump",
            ImplementApplicationType::CoilCarrier => "coil-carrier",
            ImplementApplicationType::Forestry => "forestry",
        }
    }
}

impl fmt::Display for ImplementApplicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImplementApplicationType {
    type Err = String;

    /// 宽松解析: 忽略大小写, `_` 与空格视同 `-`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        ImplementApplicationType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("未知挂车类型: {}", s.trim()))
    }
}

// ==========================================
// 匹配状态 (Match Status)
// ==========================================
// 生命周期完全由调用方管理, 引擎从不读写
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Pending,  // 待处理
    Accepted, // 已接受
    Rejected, // 已拒绝
    Expired,  // 已过期
}

impl MatchStatus {
    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MatchStatus::Pending)
    }

    /// 状态流转是否合法
    ///
    /// 仅允许 PENDING → ACCEPTED / REJECTED / EXPIRED, 终态不可再变
    pub fn can_transition_to(&self, next: MatchStatus) -> bool {
        matches!(
            (self, next),
            (MatchStatus::Pending, MatchStatus::Accepted)
                | (MatchStatus::Pending, MatchStatus::Rejected)
                | (MatchStatus::Pending, MatchStatus::Expired)
        )
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Pending => write!(f, "PENDING"),
            MatchStatus::Accepted => write!(f, "ACCEPTED"),
            MatchStatus::Rejected => write!(f, "REJECTED"),
            MatchStatus::Expired => write!(f, "EXPIRED"),
        }
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(MatchStatus::Pending),
            "ACCEPTED" => Ok(MatchStatus::Accepted),
            "REJECTED" => Ok(MatchStatus::Rejected),
            "EXPIRED" => Ok(MatchStatus::Expired),
            other => Err(format!("未知匹配状态: {}", other)),
        }
    }
}

// ==========================================
// 拒绝原因 (Rejection Reason)
// ==========================================
// 按优先级只取一个: 路线 > 运力 > 总分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    #[serde(rename = "incompatible route")]
    IncompatibleRoute,
    #[serde(rename = "inadequate capacity")]
    InadequateCapacity,
    #[serde(rename = "insufficient total score")]
    InsufficientTotalScore,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::IncompatibleRoute => "incompatible route",
            RejectionReason::InadequateCapacity => "inadequate capacity",
            RejectionReason::InsufficientTotalScore => "insufficient total score",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
