// ==========================================
// 货运撮合系统 - 距离估算
// ==========================================
// 职责: 按 (城市, 州) 三档粗略估算城际距离
// 红线: 启发式结果直接决定路线得分, 不得替换为真实测距
// ==========================================

use crate::domain::freight::Location;

/// 同州不同城的估算距离 (km)
pub const SAME_REGION_KM: f64 = 200.0;

/// 跨州估算距离 (km)
pub const CROSS_REGION_KM: f64 = 800.0;

// ==========================================
// Trait: DistanceEstimator
// ==========================================
// 用途: 路线评分的距离来源 (扩展点, 可接入真实地理编码)
pub trait DistanceEstimator: Send + Sync {
    /// 估算两地距离 (km), 不报错, 总有返回值
    fn estimate_km(&self, a: &Location, b: &Location) -> f64;
}

// ==========================================
// RegionTierDistance - 三档启发式 (默认实现)
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionTierDistance;

impl RegionTierDistance {
    pub fn new() -> Self {
        Self
    }
}

impl DistanceEstimator for RegionTierDistance {
    /// # 规则
    /// - 同州且同城 (城市名忽略大小写) → 0
    /// - 同州不同城 → 200
    /// - 不同州 → 800
    fn estimate_km(&self, a: &Location, b: &Location) -> f64 {
        if a.region.trim() != b.region.trim() {
            return CROSS_REGION_KM;
        }

        if a.city.trim().to_lowercase() == b.city.trim().to_lowercase() {
            0.0
        } else {
            SAME_REGION_KM
        }
    }
}

impl<T: DistanceEstimator + ?Sized> DistanceEstimator for &T {
    fn estimate_km(&self, a: &Location, b: &Location) -> f64 {
        (**self).estimate_km(a, b)
    }
}
