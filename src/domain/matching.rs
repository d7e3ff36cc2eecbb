// ==========================================
// 货运撮合系统 - 匹配结果领域模型
// ==========================================
// 职责: 单次评分结果、排序输出、持久化匹配记录
// 红线: total == route + vehicle_type + capacity + time + reputation
// ==========================================

use crate::domain::announcement::ReturnAnnouncement;
use crate::domain::types::{MatchStatus, RejectionReason};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ScoreBreakdown - 分项得分
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub route: i32,        // [0, 40]
    pub vehicle_type: i32, // {0, 5, 15, 25}
    pub capacity: i32,     // [0, 15]
    pub time: i32,         // {0, 5, 10, 12, 15}
    pub reputation: i32,   // [0, 5]
}

impl ScoreBreakdown {
    /// 分项之和 (未截断)
    pub fn sum(&self) -> i32 {
        self.route + self.vehicle_type + self.capacity + self.time + self.reputation
    }
}

// ==========================================
// MatchResult - 单对评分结果
// ==========================================
// 每次评分全新生成, 不可变, 可直接序列化落库
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub total: i32,
    pub breakdown: ScoreBreakdown,
    pub compatible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectionReason>,
}

impl MatchResult {
    /// 生成对外输出的明细
    pub fn details(&self) -> MatchDetails {
        MatchDetails {
            breakdown: self.breakdown,
            compatible: self.compatible,
            reason: self.reason,
        }
    }
}

// ==========================================
// MatchDetails - 对外输出/落库的明细 (扁平结构)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetails {
    #[serde(flatten)]
    pub breakdown: ScoreBreakdown,
    pub compatible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectionReason>,
}

// ==========================================
// ScoredPair - 已评分的一对 (不论是否入选)
// ==========================================
// 用于重算时刷新已落库但本轮落选的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredPair {
    pub announcement_id: String,
    pub result: MatchResult,
}

// ==========================================
// RankedMatch - 排序输出条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedMatch {
    pub announcement: ReturnAnnouncement,
    pub score: i32,
    pub details: MatchDetails,
}

// ==========================================
// MatchRecord - 持久化匹配记录
// ==========================================
// 唯一键: (freight_id, announcement_id)
// 重算只覆盖 score/details, 不得重置 status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub freight_id: String,
    pub announcement_id: String,
    pub score: i32,
    pub details: String, // MatchDetails 的 JSON 文本
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MatchRecord {
    /// 解析明细 JSON
    pub fn parsed_details(&self) -> serde_json::Result<MatchDetails> {
        serde_json::from_str(&self.details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_serialize_flat_camel_case() {
        let details = MatchDetails {
            breakdown: ScoreBreakdown {
                route: 40,
                vehicle_type: 25,
                capacity: 10,
                time: 15,
                reputation: 5,
            },
            compatible: true,
            reason: None,
        };

        let value = serde_json::to_value(details).unwrap();
        assert_eq!(value["route"], 40);
        assert_eq!(value["vehicleType"], 25);
        assert_eq!(value["compatible"], true);
        assert!(value.get("reason").is_none());
    }

    #[test]
    fn test_details_reason_present_when_rejected() {
        let details = MatchDetails {
            breakdown: ScoreBreakdown {
                route: 0,
                vehicle_type: 25,
                capacity: 10,
                time: 15,
                reputation: 5,
            },
            compatible: false,
            reason: Some(RejectionReason::IncompatibleRoute),
        };

        let json = serde_json::to_string(&details).unwrap();
        assert!(json.contains("\"reason\":\"incompatible route\""));

        let back: MatchDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(back, details);
    }
}
