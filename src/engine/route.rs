// ==========================================
// 货运撮合系统 - 路线评分
// ==========================================
// 职责: 评估回程路线与货运路线的地理契合度
// 输出: [0, 40] (两段各 [0, 20])
// ==========================================

use crate::domain::announcement::ReturnAnnouncement;
use crate::domain::freight::FreightRequest;
use crate::engine::distance::{DistanceEstimator, RegionTierDistance};

/// 单段满分
pub const LEG_MAX_POINTS: i32 = 20;

/// 路线满分
pub const ROUTE_MAX_POINTS: i32 = 2 * LEG_MAX_POINTS;

// ==========================================
// RouteScorer - 路线评分器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RouteScorer<D = RegionTierDistance> {
    distance: D,
}

impl<D: DistanceEstimator> RouteScorer<D> {
    pub fn new(distance: D) -> Self {
        Self { distance }
    }

    /// 路线得分
    ///
    /// # 规则
    /// - 提货段: 货物起点 ↔ 回程终点
    /// - 送达段: 货物终点 ↔ 回程起点
    /// - 两段按作业半径分档后相加
    pub fn score(&self, freight: &FreightRequest, announcement: &ReturnAnnouncement) -> i32 {
        let radius = announcement.operating_radius_km;

        let dist_origin = self
            .distance
            .estimate_km(&freight.origin, &announcement.destination);
        let dist_dest = self
            .distance
            .estimate_km(&freight.destination, &announcement.origin);

        Self::leg_points(dist_origin, radius) + Self::leg_points(dist_dest, radius)
    }

    /// 单段分档
    ///
    /// | 距离 | 得分 |
    /// |---|---|
    /// | = 0 | 20 |
    /// | ≤ 半径/2 | 15 |
    /// | ≤ 半径 | 10 |
    /// | ≤ 半径×1.5 | 5 |
    /// | 其他 | 0 |
    pub fn leg_points(distance_km: f64, radius_km: f64) -> i32 {
        if distance_km == 0.0 {
            LEG_MAX_POINTS
        } else if distance_km <= radius_km / 2.0 {
            15
        } else if distance_km <= radius_km {
            10
        } else if distance_km <= radius_km * 1.5 {
            5
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::freight::Location;
    use crate::engine::test_support::{create_test_announcement, create_test_freight};

    #[test]
    fn test_leg_points_tiers() {
        type R = RouteScorer;
        assert_eq!(R::leg_points(0.0, 100.0), 20);
        assert_eq!(R::leg_points(50.0, 100.0), 15);
        assert_eq!(R::leg_points(50.1, 100.0), 10);
        assert_eq!(R::leg_points(100.0, 100.0), 10);
        assert_eq!(R::leg_points(150.0, 100.0), 5);
        assert_eq!(R::leg_points(150.1, 100.0), 0);
    }

    #[test]
    fn test_leg_points_zero_radius() {
        // 半径为 0: 只有同城得分
        assert_eq!(RouteScorer::<RegionTierDistance>::leg_points(0.0, 0.0), 20);
        assert_eq!(RouteScorer::<RegionTierDistance>::leg_points(200.0, 0.0), 0);
    }

    #[test]
    fn test_mirrored_route_scores_full() {
        let scorer: RouteScorer = RouteScorer::default();
        let freight = create_test_freight();
        let announcement = create_test_announcement("A1");
        assert_eq!(scorer.score(&freight, &announcement), ROUTE_MAX_POINTS);
    }

    #[test]
    fn test_same_region_legs_with_wide_radius() {
        // 两段均为同州不同城 (200km), 半径 400 → 每段 15
        let scorer: RouteScorer = RouteScorer::default();
        let freight = create_test_freight();
        let mut announcement = create_test_announcement("A1");
        announcement.origin = Location::new("Niterói", "RJ");
        announcement.destination = Location::new("Campinas", "SP");
        announcement.operating_radius_km = 400.0;
        assert_eq!(scorer.score(&freight, &announcement), 30);
    }

    #[test]
    fn test_cross_region_legs_beyond_radius() {
        let scorer: RouteScorer = RouteScorer::default();
        let freight = create_test_freight();
        let mut announcement = create_test_announcement("A1");
        announcement.origin = Location::new("Curitiba", "PR");
        announcement.destination = Location::new("Belo Horizonte", "MG");
        announcement.operating_radius_km = 50.0;
        assert_eq!(scorer.score(&freight, &announcement), 0);
    }

    #[test]
    fn test_custom_distance_estimator() {
        struct Fixed(f64);
        impl DistanceEstimator for Fixed {
            fn estimate_km(&self, _a: &Location, _b: &Location) -> f64 {
                self.0
            }
        }

        let scorer = RouteScorer::new(Fixed(90.0));
        let freight = create_test_freight();
        let announcement = create_test_announcement("A1");
        // 90 ≤ 100 → 每段 10
        assert_eq!(scorer.score(&freight, &announcement), 20);
    }
}
