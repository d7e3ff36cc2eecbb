// ==========================================
// 货运撮合系统 - 配置层
// ==========================================
// 职责: 撮合配置管理
// 存储: config_kv 表 / 内存
// ==========================================

pub mod cargo_profile;
pub mod config_manager;
pub mod error;
pub mod match_config_trait;
pub mod static_config;

// 重导出核心配置管理器
pub use cargo_profile::CargoCompatibilityOverrides;
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use match_config_trait::MatchConfigReader;
pub use static_config::StaticMatchConfig;
