// ==========================================
// 导入集成测试
// ==========================================
// 测试目标: CSV 公告池 → 排序 的完整链路
// ==========================================

mod test_helpers;

use freight_match::engine::BatchRanker;
use freight_match::importer::{load_announcement_pool, ImportError};
use std::io::Write;
use tempfile::Builder;
use test_helpers::create_test_freight;

const POOL_CSV: &str = "\
announcement_id,origin_city,origin_region,destination_city,destination_region,available_date,operating_radius_km,implement_type,weight_capacity_kg,volume_capacity_m3
A_NEAR,Niterói,RJ,Campinas,SP,2025-03-18,500,dry-van,30000,
A_BEST,Rio de Janeiro,RJ,São Paulo,SP,2025-03-18,100,flatbed,12000,
A_FAR,Salvador,BA,Recife,PE,2025-03-18,100,bulk-tanker,20000,
A_BEST,Rio de Janeiro,RJ,São Paulo,SP,2025-03-18,100,bulk-tanker,20000,
";

#[test]
fn test_csv_pool_ranks_end_to_end() {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(POOL_CSV.as_bytes()).unwrap();

    let pool = load_announcement_pool(file.path()).expect("Failed to load pool");
    assert_eq!(pool.len(), 3);
    assert_eq!(pool[1].implements.len(), 2);

    let ranked = BatchRanker::default().rank(&create_test_freight(), &pool, 30);
    let ids: Vec<&str> = ranked.iter().map(|m| m.announcement.id.as_str()).collect();

    // A_BEST: 两台挂车取最优 (bulk-tanker 25 分, 75% 载重 10 分) → 95
    // A_NEAR: 每段 200km ≤ 250 → 30, dry-van 25, 50% 载重 8 → 83
    assert_eq!(ids, vec!["A_BEST", "A_NEAR"]);
    assert_eq!(ranked[0].score, 95);
    assert_eq!(ranked[1].score, 83);
}

#[test]
fn test_unsupported_pool_format() {
    let file = Builder::new().suffix(".xlsx").tempfile().unwrap();
    let err = load_announcement_pool(file.path()).unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat(_)));
}
