// ==========================================
// 货运撮合系统 - API 层
// ==========================================
// 职责: 输入校验、引擎调用、结果持久化
// 红线: 引擎只接收已校验输入
// ==========================================

pub mod error;
pub mod match_api;
pub mod validator;

// 重导出核心类型
pub use error::{ApiError, ApiResult, ValidationViolation};
pub use match_api::{prefilter_candidates, MatchApi};
pub use validator::{validate_announcement, validate_freight};
