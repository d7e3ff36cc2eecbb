// ==========================================
// 货运撮合系统 - 匹配配置读取 Trait
// ==========================================
// 职责: 定义撮合流程所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// 红线: 兼容性门槛 (30/10/5) 不可配置
// ==========================================

use crate::config::error::ConfigResult;
use crate::domain::types::ImplementApplicationType;
use async_trait::async_trait;
use std::collections::HashMap;

// ==========================================
// MatchConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）、StaticMatchConfig（内存）
#[async_trait]
pub trait MatchConfigReader: Send + Sync {
    // ===== 排序输出配置 =====

    /// 获取默认最低分（调用方未指定 min_score 时使用）
    ///
    /// # 默认值
    /// - 30
    async fn get_default_min_score(&self) -> ConfigResult<i32>;

    // ===== 批量计算配置 =====

    /// 获取批量评分工作线程数
    ///
    /// # 默认值
    /// - 0（使用 rayon 全局线程池）
    async fn get_batch_worker_threads(&self) -> ConfigResult<usize>;

    /// 获取整批截止时长（毫秒）
    ///
    /// # 默认值
    /// - 0（不设截止）
    async fn get_batch_deadline_ms(&self) -> ConfigResult<u64>;

    // ===== 兼容表配置 =====

    /// 获取货物/挂车兼容表覆写行
    ///
    /// # 返回
    /// - HashMap<货物类型, 挂车类型列表>，同名行整行替换内置表
    ///
    /// # 默认值
    /// - 空（使用内置表）
    async fn get_cargo_compatibility_overrides(
        &self,
    ) -> ConfigResult<HashMap<String, Vec<ImplementApplicationType>>>;
}
