// ==========================================
// 货运撮合系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod announcement;
pub mod freight;
pub mod matching;
pub mod types;

// 重导出核心类型
pub use announcement::{Implement, ReturnAnnouncement};
pub use freight::{FreightRequest, Location};
pub use matching::{
    MatchDetails, MatchRecord, MatchResult, RankedMatch, ScoreBreakdown, ScoredPair,
};
pub use types::{ImplementApplicationType, MatchStatus, RejectionReason};
