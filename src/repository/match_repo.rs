// ==========================================
// 货运撮合系统 - 匹配记录数据仓储
// ==========================================
// 红线: Repository 不含评分逻辑
// 红线: 重算只覆盖 score/details/updated_at, 不得重置 status
// ==========================================

use crate::db::open_and_init;
use crate::domain::matching::{MatchDetails, MatchRecord, RankedMatch, ScoredPair};
use crate::domain::types::MatchStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    SELECT match_id, freight_id, announcement_id, score, details, status, created_at, updated_at
    FROM freight_match
"#;

const REFRESH_SQL: &str = r#"
    UPDATE freight_match
    SET score = ?1, details = ?2, updated_at = ?3
    WHERE freight_id = ?4 AND announcement_id = ?5
"#;

const UPSERT_SQL: &str = r#"
    INSERT INTO freight_match (
        match_id, freight_id, announcement_id, score, details, status, created_at, updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, 'PENDING', ?6, ?6)
    ON CONFLICT(freight_id, announcement_id) DO UPDATE SET
        score = excluded.score,
        details = excluded.details,
        updated_at = excluded.updated_at
"#;

// ==========================================
// MatchRepository - 匹配记录仓储
// ==========================================

/// 匹配记录仓储
/// 职责: 管理 freight_match 表的 CRUD 操作
pub struct MatchRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MatchRepository {
    /// 创建新的仓储实例（确保 schema 存在）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_and_init(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入或更新单条匹配记录
    ///
    /// # 规则
    /// - 新记录: 生成 match_id, status = PENDING
    /// - 已存在: 只更新 score / details / updated_at
    pub fn upsert_match(
        &self,
        freight_id: &str,
        announcement_id: &str,
        score: i32,
        details: &MatchDetails,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let details_json = serde_json::to_string(details)?;

        conn.execute(
            UPSERT_SQL,
            params![
                Uuid::new_v4().to_string(),
                freight_id,
                announcement_id,
                score,
                details_json,
                Utc::now(),
            ],
        )?;

        Ok(())
    }

    /// 批量写入排序结果（单事务）
    ///
    /// # 返回
    /// - Ok(usize): 写入条数
    pub fn upsert_batch(
        &self,
        freight_id: &str,
        matches: &[RankedMatch],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let now = Utc::now();
        {
            let mut stmt = tx.prepare(UPSERT_SQL)?;
            for m in matches {
                let details_json = serde_json::to_string(&m.details)?;
                stmt.execute(params![
                    Uuid::new_v4().to_string(),
                    freight_id,
                    m.announcement.id,
                    m.score,
                    details_json,
                    now,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        debug!(freight_id, count = matches.len(), "匹配记录批量写入完成");
        Ok(matches.len())
    }

    /// 刷新已存在记录的评分（单事务）
    ///
    /// # 规则
    /// - 只更新已落库的对, 不插入新记录
    /// - 落选的对同样刷新, 避免保留过期的分数与明细
    ///
    /// # 返回
    /// - Ok(usize): 实际更新条数
    pub fn refresh_scores(
        &self,
        freight_id: &str,
        scored: &[ScoredPair],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let now = Utc::now();
        let mut refreshed = 0;
        {
            let mut stmt = tx.prepare(REFRESH_SQL)?;
            for pair in scored {
                let details_json = serde_json::to_string(&pair.result.details())?;
                refreshed += stmt.execute(params![
                    pair.result.total,
                    details_json,
                    now,
                    freight_id,
                    pair.announcement_id,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        debug!(freight_id, refreshed, "已有匹配记录评分刷新完成");
        Ok(refreshed)
    }

    /// 按 (freight_id, announcement_id) 查询
    pub fn find_by_pair(
        &self,
        freight_id: &str,
        announcement_id: &str,
    ) -> RepositoryResult<Option<MatchRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE freight_id = ?1 AND announcement_id = ?2", SELECT_COLUMNS);

        let record = conn
            .query_row(&sql, params![freight_id, announcement_id], map_record)
            .optional()?;

        Ok(record)
    }

    /// 查询某货运需求的全部匹配记录（score 降序）
    pub fn list_by_freight(&self, freight_id: &str) -> RepositoryResult<Vec<MatchRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE freight_id = ?1 ORDER BY score DESC, announcement_id ASC",
            SELECT_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![freight_id], map_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    /// 按状态查询
    pub fn list_by_status(&self, status: MatchStatus) -> RepositoryResult<Vec<MatchRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE status = ?1 ORDER BY freight_id ASC, score DESC",
            SELECT_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![status.to_string()], map_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    /// 更新状态（校验状态流转）
    ///
    /// # 返回
    /// - Ok(MatchRecord): 更新后的记录
    /// - Err(NotFound): 记录不存在
    /// - Err(InvalidStateTransition): 非法流转
    pub fn update_status(
        &self,
        freight_id: &str,
        announcement_id: &str,
        next: MatchStatus,
    ) -> RepositoryResult<MatchRecord> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let sql = format!("{} WHERE freight_id = ?1 AND announcement_id = ?2", SELECT_COLUMNS);
        let current = tx
            .query_row(&sql, params![freight_id, announcement_id], map_record)
            .optional()?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "FreightMatch".to_string(),
                id: format!("{}/{}", freight_id, announcement_id),
            })?;

        if !current.status.can_transition_to(next) {
            return Err(RepositoryError::InvalidStateTransition {
                from: current.status.to_string(),
                to: next.to_string(),
            });
        }

        let now = Utc::now();
        tx.execute(
            "UPDATE freight_match SET status = ?1, updated_at = ?2
             WHERE freight_id = ?3 AND announcement_id = ?4",
            params![next.to_string(), now, freight_id, announcement_id],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(MatchRecord {
            status: next,
            updated_at: now,
            ..current
        })
    }

    /// 删除某货运需求的全部匹配记录
    pub fn delete_by_freight(&self, freight_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM freight_match WHERE freight_id = ?1",
            params![freight_id],
        )?;
        Ok(affected)
    }
}

/// 行映射
fn map_record(row: &Row<'_>) -> rusqlite::Result<MatchRecord> {
    let status_raw: String = row.get(5)?;
    let status = status_raw
        .parse::<MatchStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, e.into()))?;

    Ok(MatchRecord {
        match_id: row.get(0)?,
        freight_id: row.get(1)?,
        announcement_id: row.get(2)?,
        score: row.get(3)?,
        details: row.get(4)?,
        status,
        created_at: row.get::<_, DateTime<Utc>>(6)?,
        updated_at: row.get::<_, DateTime<Utc>>(7)?,
    })
}
