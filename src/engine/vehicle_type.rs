// ==========================================
// 货运撮合系统 - 车型评分
// ==========================================
// 职责: 判断回程挂车能否承运该货物类型
// 输出: {0, 5, 15, 25}
// ==========================================

use crate::domain::announcement::ReturnAnnouncement;
use crate::domain::freight::FreightRequest;
use crate::engine::cargo_table::CargoCompatibilityTable;
use std::sync::Arc;

/// 任一挂车命中兼容集合
pub const PERFECT_MATCH_POINTS: i32 = 25;

/// 货物类型未登记 (宽松默认, 不因目录缺失而惩罚)
pub const UNMAPPED_CARGO_POINTS: i32 = 15;

/// 已登记但无挂车命中
pub const MISMATCH_POINTS: i32 = 5;

// ==========================================
// VehicleTypeScorer - 车型评分器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct VehicleTypeScorer {
    table: Arc<CargoCompatibilityTable>,
}

impl VehicleTypeScorer {
    pub fn new(table: Arc<CargoCompatibilityTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CargoCompatibilityTable {
        &self.table
    }

    /// 车型得分
    ///
    /// # 规则
    /// 1. 无挂车 → 0
    /// 2. 任一挂车类型 ∈ 兼容集合 → 25
    /// 3. 兼容集合为空 (货物类型未登记) → 15
    /// 4. 否则 → 5
    pub fn score(&self, freight: &FreightRequest, announcement: &ReturnAnnouncement) -> i32 {
        if announcement.implements.is_empty() {
            return 0;
        }

        let compatible_types = self.table.compatible_types(&freight.cargo_type);

        if announcement
            .implements
            .iter()
            .any(|implement| compatible_types.contains(&implement.application_type))
        {
            PERFECT_MATCH_POINTS
        } else if compatible_types.is_empty() {
            UNMAPPED_CARGO_POINTS
        } else {
            MISMATCH_POINTS
        }
    }
}
