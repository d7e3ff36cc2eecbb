// ==========================================
// 货运撮合系统 - 信誉评分
// ==========================================
// 职责: 信誉分来源 (当前为固定占位值)
// 红线: 任何实现的输出都必须落在 [0, 5], 编排器会再次截断
// ==========================================

use crate::domain::announcement::ReturnAnnouncement;

/// 信誉分上限
pub const REPUTATION_MAX_POINTS: i32 = 5;

// ==========================================
// Trait: ReputationProvider
// ==========================================
pub trait ReputationProvider: Send + Sync {
    fn reputation_points(&self, announcement: &ReturnAnnouncement) -> i32;
}

// ==========================================
// FixedReputation - 固定占位实现
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct FixedReputation {
    points: i32,
}

impl FixedReputation {
    pub fn new(points: i32) -> Self {
        Self { points }
    }
}

impl Default for FixedReputation {
    fn default() -> Self {
        Self::new(REPUTATION_MAX_POINTS)
    }
}

impl ReputationProvider for FixedReputation {
    fn reputation_points(&self, _announcement: &ReturnAnnouncement) -> i32 {
        self.points
    }
}
