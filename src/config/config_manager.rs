// ==========================================
// 货运撮合系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::cargo_profile::CargoCompatibilityOverrides;
use crate::config::error::{ConfigError, ConfigResult};
use crate::config::match_config_trait::MatchConfigReader;
use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::domain::types::ImplementApplicationType;
use crate::engine::ranking::{max_worker_threads, DEFAULT_MIN_SCORE};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（确保 schema 存在）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;

        conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| ConfigError::ConfigReadError {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )
        .map_err(|e| ConfigError::ConfigWriteError {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取数值配置，格式错误时告警并回退默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: std::str::FromStr + Copy + std::fmt::Display,
    {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                warn!(
                    config_key = key,
                    raw_value = %raw,
                    default_value = %default,
                    "配置值格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }

    /// 获取所有配置的快照（JSON格式，按 key 排序）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

// ==========================================
// MatchConfigReader Trait 实现
// ==========================================
#[async_trait]
impl MatchConfigReader for ConfigManager {
    async fn get_default_min_score(&self) -> ConfigResult<i32> {
        let value = self.get_parsed_or_default(config_keys::DEFAULT_MIN_SCORE, DEFAULT_MIN_SCORE)?;
        if !(0..=100).contains(&value) {
            warn!(
                config_key = config_keys::DEFAULT_MIN_SCORE,
                value, "最低分超出 [0, 100]，使用默认值"
            );
            return Ok(DEFAULT_MIN_SCORE);
        }
        Ok(value)
    }

    async fn get_batch_worker_threads(&self) -> ConfigResult<usize> {
        let value = self.get_parsed_or_default(config_keys::BATCH_WORKER_THREADS, 0usize)?;
        let limit = max_worker_threads();
        if value > limit {
            warn!(
                config_key = config_keys::BATCH_WORKER_THREADS,
                value, limit, "工作线程数超出上限，按上限截断"
            );
            return Ok(limit);
        }
        Ok(value)
    }

    async fn get_batch_deadline_ms(&self) -> ConfigResult<u64> {
        self.get_parsed_or_default(config_keys::BATCH_DEADLINE_MS, 0u64)
    }

    async fn get_cargo_compatibility_overrides(
        &self,
    ) -> ConfigResult<HashMap<String, Vec<ImplementApplicationType>>> {
        let value = self.get_config_or_default(config_keys::CARGO_COMPATIBILITY, "{}")?;
        let overrides = CargoCompatibilityOverrides::parse(&value).unwrap_or_else(|e| {
            warn!(
                config_key = config_keys::CARGO_COMPATIBILITY,
                raw_value = %value,
                error = %e,
                "兼容表覆写格式错误，使用内置表"
            );
            CargoCompatibilityOverrides::default()
        });
        Ok(overrides.into_rows())
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 排序输出
    pub const DEFAULT_MIN_SCORE: &str = "match/default_min_score";

    // 批量计算
    pub const BATCH_WORKER_THREADS: &str = "match/batch_worker_threads";
    pub const BATCH_DEADLINE_MS: &str = "match/batch_deadline_ms";

    // 兼容表覆写 (JSON)
    pub const CARGO_COMPATIBILITY: &str = "match/cargo_compatibility";
}
