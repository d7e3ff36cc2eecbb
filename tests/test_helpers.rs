// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================
#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use freight_match::db::open_and_init;
use freight_match::domain::{
    FreightRequest, Implement, ImplementApplicationType, Location, ReturnAnnouncement,
};
use rusqlite::{params, Connection};
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    open_and_init(&db_path)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_and_init(db_path)?)
}

/// 写入一条 global 配置
pub fn insert_test_config(conn: &Connection, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

// ==========================================
// 测试数据构建
// ==========================================

/// 基准提货日期 D
pub fn pickup_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
}

/// 基准货运需求: São Paulo/SP → Rio de Janeiro/RJ, 15000kg, Grains
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

pub fn create_test_implement(
    application_type: ImplementApplicationType,
    weight_capacity_kg: f64,
) -> Implement {
    Implement {
        application_type,
        weight_capacity_kg,
        volume_capacity_m3: None,
    }
}

/// 基准回程公告: Rio de Janeiro/RJ → São Paulo/SP (与货运路线镜像)
///
/// 半径 100km, D-2 可用, 一台 20000kg bulk-tanker; 对基准货运评分 95
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
        )],
    }
}

/// 同州不同城的公告 (每段 200km)
pub fn create_nearby_announcement(id: &str, radius_km: f64) -> ReturnAnnouncement {
    ReturnAnnouncement {
        origin: Location::new("Niterói", "RJ"),
        destination: Location::new("Campinas", "SP"),
        operating_radius_km: radius_km,
        ..create_test_announcement(id)
    }
}
