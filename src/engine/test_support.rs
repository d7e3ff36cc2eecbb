// ==========================================
// 引擎单元测试辅助函数
// ==========================================

use crate::domain::announcement::{Implement, ReturnAnnouncement};
use crate::domain::freight::{FreightRequest, Location};
use crate::domain::types::ImplementApplicationType;
use chrono::{Duration, NaiveDate};

/// 基准提货日期
pub fn pickup_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
}

/// 创建测试用货运需求: 圣保罗/SP → 里约/RJ, 15000kg 谷物
pub fn create_test_freight() -> FreightRequest {
    FreightRequest {
        id: "F001".to_string(),
        origin: Location::new("São Paulo", "SP"),
        destination: Location::new("Rio de Janeiro", "RJ"),
        weight_kg: 15000.0,
        volume_m3: None,
        cargo_type: "Grains".to_string(),
        pickup_deadline: pickup_date(),
        delivery_deadline: pickup_date() + Duration::days(3),
    }
}

/// 创建测试用挂车
pub fn create_test_implement(
    application_type: ImplementApplicationType,
    weight_capacity_kg: f64,
    volume_capacity_m3: Option<f64>,
) -> Implement {
    Implement {
        application_type,
        weight_capacity_kg,
        volume_capacity_m3,
    }
}

/// 创建测试用回程公告: 里约/RJ → 圣保罗/SP, 提货日前 2 天可用, 一台 20t 散装罐
///
/// 回程终点 = 货物起点, 回程起点 = 货物终点, 两段距离均为 0
pub fn create_test_announcement(id: &str) -> ReturnAnnouncement {
    ReturnAnnouncement {
        id: id.to_string(),
        origin: Location::new("Rio de Janeiro", "RJ"),
        destination: Location::new("São Paulo", "SP"),
        available_date: pickup_date() - Duration::days(2),
        operating_radius_km: 100.0,
        implements: vec![create_test_implement(
            ImplementApplicationType::BulkTanker,
            20000.0,
            None,
        )],
    }
}
