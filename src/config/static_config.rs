// ==========================================
// 货运撮合系统 - 内存配置
// ==========================================
// 用途: 无数据库场景（CLI 只读排序、测试）下的 MatchConfigReader 实现
// ==========================================

use crate::config::error::ConfigResult;
use crate::config::match_config_trait::MatchConfigReader;
use crate::domain::types::ImplementApplicationType;
use crate::engine::ranking::DEFAULT_MIN_SCORE;
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct StaticMatchConfig {
    pub default_min_score: i32,
    pub batch_worker_threads: usize,
    pub batch_deadline_ms: u64,
    pub cargo_overrides: HashMap<String, Vec<ImplementApplicationType>>,
}

impl Default for StaticMatchConfig {
    fn default() -> Self {
        Self {
            default_min_score: DEFAULT_MIN_SCORE,
            batch_worker_threads: 0,
            batch_deadline_ms: 0,
            cargo_overrides: HashMap::new(),
        }
    }
}

impl StaticMatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_score(mut self, min_score: i32) -> Self {
        self.default_min_score = min_score;
        self
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.batch_worker_threads = threads;
        self
    }

    pub fn with_deadline_ms(mut self, deadline_ms: u64) -> Self {
        self.batch_deadline_ms = deadline_ms;
        self
    }

    pub fn with_cargo_override(
        mut self,
        cargo_type: impl Into<String>,
        types: Vec<ImplementApplicationType>,
    ) -> Self {
        self.cargo_overrides.insert(cargo_type.into(), types);
        self
    }
}

#[async_trait]
impl MatchConfigReader for StaticMatchConfig {
    async fn get_default_min_score(&self) -> ConfigResult<i32> {
        Ok(self.default_min_score)
    }

    async fn get_batch_worker_threads(&self) -> ConfigResult<usize> {
        Ok(self.batch_worker_threads)
    }

    async fn get_batch_deadline_ms(&self) -> ConfigResult<u64> {
        Ok(self.batch_deadline_ms)
    }

    async fn get_cargo_compatibility_overrides(
        &self,
    ) -> ConfigResult<HashMap<String, Vec<ImplementApplicationType>>> {
        Ok(self.cargo_overrides.clone())
    }
}
