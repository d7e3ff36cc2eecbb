// ==========================================
// 货运撮合系统 - 导入层
// ==========================================
// 职责: 从文件加载货运需求与回程公告池
// 支持: CSV, JSON
// ==========================================

pub mod announcement_csv;
pub mod error;
pub mod freight_json;

// 重导出核心类型
pub use announcement_csv::AnnouncementCsvLoader;
pub use error::{ImportError, ImportResult};
pub use freight_json::{load_announcement_pool, load_announcements_json, load_freight_json};
