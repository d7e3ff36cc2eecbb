// ==========================================
// 货运撮合系统 - 运力评分
// ==========================================
// 职责: 评估货物重量/体积对挂车运力的利用率
// 输出: [0, 15] (重量项 [0, 10] + 体积项 [0, 5])
// 红线: 无状态、无副作用; 载重/容积 ≤ 0 视为超载, 不做除零
// ==========================================

use crate::domain::announcement::{Implement, ReturnAnnouncement};
use crate::domain::freight::FreightRequest;

// ==========================================
// CapacityScorer - 纯函数工具类
// ==========================================
pub struct CapacityScorer;

impl CapacityScorer {
    /// 运力得分: 对全部挂车取最大值 (无挂车 → 0)
    pub fn score(freight: &FreightRequest, announcement: &ReturnAnnouncement) -> i32 {
        announcement
            .implements
            .iter()
            .map(|implement| Self::implement_score(freight, implement))
            .fold(0, i32::max)
    }

    /// 单台挂车得分 = 重量项 + 体积项 (体积项仅在两侧体积都存在时计入)
    pub fn implement_score(freight: &FreightRequest, implement: &Implement) -> i32 {
        let weight_points =
            Self::weight_points(Self::utilization_pct(freight.weight_kg, implement.weight_capacity_kg));

        let volume_points = match (freight.volume_m3, implement.volume_capacity_m3) {
            (Some(volume), Some(capacity)) => {
                Self::volume_points(Self::utilization_pct(volume, capacity))
            }
            _ => 0,
        };

        weight_points + volume_points
    }

    /// 利用率百分比
    ///
    /// 容量 ≤ 0 (或非有限值) 时返回 +∞, 即按超载处理
    pub fn utilization_pct(load: f64, capacity: f64) -> f64 {
        if capacity <= 0.0 || !capacity.is_finite() {
            return f64::INFINITY;
        }
        load / capacity * 100.0
    }

    /// 重量项分档
    ///
    /// - 70 ≤ pct ≤ 100 → 10 (充分利用)
    /// - 50 ≤ pct < 70 → 8
    /// - pct < 50 → 5 (利用不足)
    /// - pct > 100 → 0 (超载)
    pub fn weight_points(pct: f64) -> i32 {
        if pct > 100.0 {
            0
        } else if pct >= 70.0 {
            10
        } else if pct >= 50.0 {
            8
        } else {
            5
        }
    }

    /// 体积项分档 (满分 5)
    ///
    /// - 70 ≤ pct ≤ 100 → 5
    /// - 50 ≤ pct < 70 → 3
    /// - pct < 50 → 2
    /// - pct > 100 → 0
    pub fn volume_points(pct: f64) -> i32 {
        if pct > 100.0 {
            0
        } else if pct >= 70.0 {
            5
        } else if pct >= 50.0 {
            3
        } else {
            2
        }
    }
}
