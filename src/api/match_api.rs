// ==========================================
// 货运撮合系统 - 撮合 API
// ==========================================
// 职责: 输入校验 → 候选预过滤 → 批量评分排序 → 结果落库
// 红线: 引擎只接收已校验输入; 评分在阻塞线程池执行, 不占用异步运行时
// ==========================================

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{validate_announcement, validate_freight};
use crate::config::match_config_trait::MatchConfigReader;
use crate::domain::announcement::ReturnAnnouncement;
use crate::domain::freight::FreightRequest;
use crate::domain::matching::{MatchRecord, RankedMatch};
use crate::domain::types::MatchStatus;
use crate::engine::cargo_table::CargoCompatibilityTable;
use crate::engine::orchestrator::{MatchOrchestrator, MAX_TOTAL_SCORE};
use crate::engine::ranking::{BatchControl, BatchOptions, BatchRanker};
use crate::repository::match_repo::MatchRepository;

// ==========================================
// MatchApi - 撮合 API
// ==========================================

/// 撮合API
///
/// 职责：
/// 1. 货运需求与公告校验
/// 2. 按配置构建引擎并排序
/// 3. 匹配记录落库与状态流转
pub struct MatchApi<C> {
    config: Arc<C>,
    match_repo: Arc<MatchRepository>,
}

impl<C> MatchApi<C>
where
    C: MatchConfigReader + 'static,
{
    /// 创建新的MatchApi实例
    pub fn new(config: Arc<C>, match_repo: Arc<MatchRepository>) -> Self {
        Self { config, match_repo }
    }

    /// 为货运需求查找并排序回程运力
    ///
    /// # 参数
    /// - freight: 货运需求
    /// - candidates: 候选公告池
    /// - min_score: 最低分（None 时读取配置）
    ///
    /// # 返回
    /// - Ok(Vec<RankedMatch>): 兼容且达标的条目, 按分数降序
    /// - Err(ApiError::ValidationFailed): 货运需求校验失败
    pub async fn find_matches(
        &self,
        freight: FreightRequest,
        candidates: Vec<ReturnAnnouncement>,
        min_score: Option<i32>,
    ) -> ApiResult<Vec<RankedMatch>> {
        self.find_matches_with_control(freight, candidates, min_score, BatchControl::new())
            .await
    }

    /// 同 find_matches, 调用方持有取消信号
    pub async fn find_matches_with_control(
        &self,
        freight: FreightRequest,
        candidates: Vec<ReturnAnnouncement>,
        min_score: Option<i32>,
        control: BatchControl,
    ) -> ApiResult<Vec<RankedMatch>> {
        validate_freight(&freight)?;

        let min_score = match min_score {
            Some(score) if !(0..=MAX_TOTAL_SCORE).contains(&score) => {
                return Err(ApiError::InvalidInput(format!(
                    "min_score 超出 [0, {}]: {}",
                    MAX_TOTAL_SCORE, score
                )));
            }
            Some(score) => score,
            None => self.config.get_default_min_score().await?,
        };

        let pool = prefilter_candidates(&freight, candidates);

        let overrides = self.config.get_cargo_compatibility_overrides().await?;
        let table = CargoCompatibilityTable::default().with_overrides(&overrides);
        let ranker = BatchRanker::new(MatchOrchestrator::with_cargo_table(Arc::new(table)));

        let deadline_ms = self.config.get_batch_deadline_ms().await?;
        let options = BatchOptions {
            min_score,
            worker_threads: self.config.get_batch_worker_threads().await?,
            deadline: (deadline_ms > 0).then(|| Duration::from_millis(deadline_ms)),
            control,
        };

        let repo = Arc::clone(&self.match_repo);
        let matches = tokio::task::spawn_blocking(move || -> ApiResult<Vec<RankedMatch>> {
            let outcome = ranker.rank_parallel(&freight, &pool, &options);
            // 先刷新已有记录 (含本轮落选), 再写入入选结果
            repo.refresh_scores(&freight.id, &outcome.scored)?;
            repo.upsert_batch(&freight.id, &outcome.matches)?;
            Ok(outcome.matches)
        })
        .await
        .map_err(|e| ApiError::InternalError(format!("评分任务异常退出: {}", e)))??;

        Ok(matches)
    }

    /// 接受匹配
    pub fn accept_match(&self, freight_id: &str, announcement_id: &str) -> ApiResult<MatchRecord> {
        self.transition(freight_id, announcement_id, MatchStatus::Accepted)
    }

    /// 拒绝匹配
    pub fn reject_match(&self, freight_id: &str, announcement_id: &str) -> ApiResult<MatchRecord> {
        self.transition(freight_id, announcement_id, MatchStatus::Rejected)
    }

    /// 置为过期
    pub fn expire_match(&self, freight_id: &str, announcement_id: &str) -> ApiResult<MatchRecord> {
        self.transition(freight_id, announcement_id, MatchStatus::Expired)
    }

    /// 查询某货运需求的匹配记录（score 降序）
    pub fn list_matches(&self, freight_id: &str) -> ApiResult<Vec<MatchRecord>> {
        if freight_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("freight_id 不能为空".to_string()));
        }
        Ok(self.match_repo.list_by_freight(freight_id)?)
    }

    fn transition(
        &self,
        freight_id: &str,
        announcement_id: &str,
        next: MatchStatus,
    ) -> ApiResult<MatchRecord> {
        let record = self
            .match_repo
            .update_status(freight_id, announcement_id, next)?;
        info!(
            freight_id,
            announcement_id,
            status = %record.status,
            "匹配状态已更新"
        );
        Ok(record)
    }
}

/// 候选预过滤
///
/// - 校验失败的公告丢弃并告警
/// - 只保留 available_date ≤ pickup_deadline 的公告
pub fn prefilter_candidates(
    freight: &FreightRequest,
    candidates: Vec<ReturnAnnouncement>,
) -> Vec<ReturnAnnouncement> {
    let total = candidates.len();

    let pool: Vec<ReturnAnnouncement> = candidates
        .into_iter()
        .filter(|announcement| match validate_announcement(announcement) {
            Ok(()) => true,
            Err(e) => {
                warn!(announcement_id = %announcement.id, error = %e, "公告校验失败, 已丢弃");
                false
            }
        })
        .filter(|announcement| announcement.available_date <= freight.pickup_deadline)
        .collect();

    info!(
        freight_id = %freight.id,
        total,
        kept = pool.len(),
        "候选公告预过滤完成"
    );
    pool
}
