// ==========================================
// 货运撮合系统 - 匹配编排器
// ==========================================
// 用途: 汇总五项分项得分, 判定兼容性并给出拒绝原因
// 红线: 纯计算, 不做 I/O, 对已校验输入不报错、不 panic
// ==========================================

use crate::domain::announcement::ReturnAnnouncement;
use crate::domain::freight::FreightRequest;
use crate::domain::matching::{MatchResult, ScoreBreakdown};
use crate::domain::types::RejectionReason;
use crate::engine::cargo_table::CargoCompatibilityTable;
use crate::engine::capacity::CapacityScorer;
use crate::engine::distance::{DistanceEstimator, RegionTierDistance};
use crate::engine::reputation::{FixedReputation, ReputationProvider, REPUTATION_MAX_POINTS};
use crate::engine::route::RouteScorer;
use crate::engine::time_window::TimeWindowScorer;
use crate::engine::vehicle_type::VehicleTypeScorer;
use std::sync::Arc;
use tracing::{debug, instrument};

/// 兼容所需最低总分
pub const MIN_COMPATIBLE_TOTAL: i32 = 30;

/// 兼容所需最低路线分
pub const MIN_COMPATIBLE_ROUTE: i32 = 10;

/// 兼容所需最低运力分
pub const MIN_COMPATIBLE_CAPACITY: i32 = 5;

/// 总分上限
pub const MAX_TOTAL_SCORE: i32 = 100;

// ==========================================
// MatchOrchestrator - 匹配编排器
// ==========================================
#[derive(Debug, Clone)]
pub struct MatchOrchestrator<D = RegionTierDistance, R = FixedReputation> {
    route: RouteScorer<D>,
    vehicle_type: VehicleTypeScorer,
    reputation: R,
}

impl MatchOrchestrator {
    /// 默认配置: 三档距离 + 内置兼容表 + 固定信誉分
    pub fn new() -> Self {
        Self::with_components(
            RegionTierDistance::new(),
            Arc::new(CargoCompatibilityTable::default()),
            FixedReputation::default(),
        )
    }

    /// 默认距离/信誉, 注入兼容表
    pub fn with_cargo_table(table: Arc<CargoCompatibilityTable>) -> Self {
        Self::with_components(RegionTierDistance::new(), table, FixedReputation::default())
    }
}

impl Default for MatchOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, R> MatchOrchestrator<D, R>
where
    D: DistanceEstimator,
    R: ReputationProvider,
{
    /// 创建编排器实例
    ///
    /// # 参数
    /// - distance: 距离估算器
    /// - table: 货物/挂车兼容表
    /// - reputation: 信誉分来源
    pub fn with_components(distance: D, table: Arc<CargoCompatibilityTable>, reputation: R) -> Self {
        Self {
            route: RouteScorer::new(distance),
            vehicle_type: VehicleTypeScorer::new(table),
            reputation,
        }
    }

    pub fn cargo_table(&self) -> &CargoCompatibilityTable {
        self.vehicle_type.table()
    }

    /// 计算单对 (货运需求, 回程公告) 的匹配结果
    ///
    /// # 流程
    /// 1. 计算五项分项得分
    /// 2. total = clamp(分项之和, 0, 100)
    /// 3. compatible = total ≥ 30 且 route ≥ 10 且 capacity ≥ 5
    /// 4. 不兼容时按优先级给出唯一拒绝原因
    #[instrument(
        level = "debug",
        skip(self, freight, announcement),
        fields(freight_id = %freight.id, announcement_id = %announcement.id)
    )]
    pub fn compute_match(
        &self,
        freight: &FreightRequest,
        announcement: &ReturnAnnouncement,
    ) -> MatchResult {
        let breakdown = self.score_breakdown(freight, announcement);
        let total = breakdown.sum().clamp(0, MAX_TOTAL_SCORE);
        let compatible = Self::is_compatible(total, breakdown.route, breakdown.capacity);
        let reason = if compatible {
            None
        } else {
            Some(Self::rejection_reason(breakdown.route, breakdown.capacity))
        };

        debug!(
            total,
            route = breakdown.route,
            vehicle_type = breakdown.vehicle_type,
            capacity = breakdown.capacity,
            time = breakdown.time,
            reputation = breakdown.reputation,
            compatible,
            "匹配评分完成"
        );

        MatchResult {
            total,
            breakdown,
            compatible,
            reason,
        }
    }

    /// 计算五项分项得分
    pub fn score_breakdown(
        &self,
        freight: &FreightRequest,
        announcement: &ReturnAnnouncement,
    ) -> ScoreBreakdown {
        ScoreBreakdown {
            route: self.route.score(freight, announcement),
            vehicle_type: self.vehicle_type.score(freight, announcement),
            capacity: CapacityScorer::score(freight, announcement),
            time: TimeWindowScorer::score(freight, announcement),
            reputation: self
                .reputation
                .reputation_points(announcement)
                .clamp(0, REPUTATION_MAX_POINTS),
        }
    }

    /// 兼容性判定
    pub fn is_compatible(total: i32, route: i32, capacity: i32) -> bool {
        total >= MIN_COMPATIBLE_TOTAL
            && route >= MIN_COMPATIBLE_ROUTE
            && capacity >= MIN_COMPATIBLE_CAPACITY
    }

    /// 拒绝原因 (仅在不兼容时调用)
    ///
    /// 优先级: 路线不符 > 运力不足 > 总分不足
    pub fn rejection_reason(route: i32, capacity: i32) -> RejectionReason {
        if route < MIN_COMPATIBLE_ROUTE {
            RejectionReason::IncompatibleRoute
        } else if capacity < MIN_COMPATIBLE_CAPACITY {
            RejectionReason::InadequateCapacity
        } else {
            RejectionReason::InsufficientTotalScore
        }
    }
}
