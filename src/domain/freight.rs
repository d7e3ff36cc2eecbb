// ==========================================
// 货运撮合系统 - 货运需求领域模型
// ==========================================
// 职责: 货主发布的运输需求 (撮合引擎的只读输入)
// 红线: 引擎从不修改 FreightRequest
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Location - 城市 + 州/地区
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub region: String,
}

impl Location {
    pub fn new(city: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            region: region.into(),
        }
    }
}

// ==========================================
// FreightRequest - 货运需求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreightRequest {
    // ===== 主键 =====
    pub id: String,

    // ===== 路线 =====
    pub origin: Location,
    pub destination: Location,

    // ===== 货物 =====
    pub weight_kg: f64,             // 重量 (kg, > 0)
    #[serde(default)]
    pub volume_m3: Option<f64>,     // 体积 (m³, 可选)
    pub cargo_type: String,         // 货物类型 (如 "Grains")

    // ===== 时间窗 =====
    pub pickup_deadline: NaiveDate,   // 最晚提货日期
    pub delivery_deadline: NaiveDate, // 最晚送达日期
}
