// ==========================================
// 货运撮合系统 - 回程运力公告领域模型
// ==========================================
// 职责: 司机发布的回程空载运力 (撮合引擎的只读输入)
// ==========================================

use crate::domain::freight::Location;
use crate::domain::types::ImplementApplicationType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Implement - 挂车/车厢
// ==========================================
// 用途: 车型评分与运力评分按挂车逐个计算, 取最大值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Implement {
    pub application_type: ImplementApplicationType,
    pub weight_capacity_kg: f64,          // 载重 (kg, > 0)
    #[serde(default)]
    pub volume_capacity_m3: Option<f64>,  // 容积 (m³, 可选)
}

// ==========================================
// ReturnAnnouncement - 回程公告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnAnnouncement {
    // ===== 主键 =====
    pub id: String,

    // ===== 回程路线 =====
    pub origin: Location,
    pub destination: Location,

    // ===== 可用性 =====
    pub available_date: NaiveDate,
    pub operating_radius_km: f64, // 作业半径 (km, >= 0)

    // ===== 挂车列表 =====
    #[serde(default)]
    pub implements: Vec<Implement>,
}
