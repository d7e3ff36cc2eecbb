// ==========================================
// 货运撮合系统 - 引擎层
// ==========================================
// 职责: 兼容性评分与排序, 纯计算
// 红线: Engine 不做 I/O, 不拼 SQL, 所有拒绝必须给出 reason
// ==========================================

pub mod capacity;
pub mod cargo_table;
pub mod distance;
pub mod orchestrator;
pub mod ranking;
pub mod reputation;
pub mod route;
pub mod time_window;
pub mod vehicle_type;

#[cfg(test)]
pub(crate) mod test_support;

// 重导出核心引擎
pub use capacity::CapacityScorer;
pub use cargo_table::CargoCompatibilityTable;
pub use distance::{DistanceEstimator, RegionTierDistance};
pub use orchestrator::{
    MatchOrchestrator, MAX_TOTAL_SCORE, MIN_COMPATIBLE_CAPACITY, MIN_COMPATIBLE_ROUTE,
    MIN_COMPATIBLE_TOTAL,
};
pub use ranking::{
    max_worker_threads, BatchControl, BatchOptions, BatchOutcome, BatchRanker, DEFAULT_MIN_SCORE,
};
pub use reputation::{FixedReputation, ReputationProvider};
pub use route::RouteScorer;
pub use time_window::TimeWindowScorer;
pub use vehicle_type::VehicleTypeScorer;
