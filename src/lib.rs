// ==========================================
// 货运撮合系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + rayon
// 系统定位: 回程运力与货运需求的兼容性评分与排序
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 评分与排序
pub mod engine;

// 配置层 - 撮合配置
pub mod config;

// 数据仓储层 - 匹配记录
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// API 层 - 校验、编排、落库
pub mod api;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    FreightRequest, Implement, ImplementApplicationType, Location, MatchDetails, MatchRecord,
    MatchResult, MatchStatus, RankedMatch, RejectionReason, ReturnAnnouncement, ScoreBreakdown,
};

// 引擎
pub use engine::{
    BatchControl, BatchOptions, BatchOutcome, BatchRanker, CargoCompatibilityTable,
    DistanceEstimator, MatchOrchestrator, RegionTierDistance, ReputationProvider,
};

// 配置
pub use config::{ConfigManager, MatchConfigReader, StaticMatchConfig};

// 仓储
pub use repository::MatchRepository;

// API
pub use api::{ApiError, ApiResult, MatchApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "货运撮合系统";
