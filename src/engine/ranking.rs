// ==========================================
// 货运撮合系统 - 批量排序
// ==========================================
// 职责: 一条货运需求 × N 条回程公告 → 过滤 + 降序排序
// 输入: 货运需求 + 候选公告池 (调用方已预过滤)
// 输出: 兼容且 total ≥ min_score 的条目, 按 total 降序, 同分保持输入顺序
// ==========================================
// 并发: 每对计算互相独立、无共享可变状态, rayon 扇出即可
// 取消/截止: 停止派发剩余候选, 已算出的结果照常返回
// ==========================================

use crate::domain::announcement::ReturnAnnouncement;
use crate::domain::freight::FreightRequest;
use crate::domain::matching::{MatchResult, RankedMatch, ScoredPair};
use crate::engine::distance::{DistanceEstimator, RegionTierDistance};
use crate::engine::orchestrator::MatchOrchestrator;
use crate::engine::reputation::{FixedReputation, ReputationProvider};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// 默认最低分
pub const DEFAULT_MIN_SCORE: i32 = 30;

/// 每个可用核心最多允许的工作线程数
pub const THREADS_PER_CORE_LIMIT: usize = 4;

/// 专用线程池的线程数上限 (可用并行度 × 4)
pub fn max_worker_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        * THREADS_PER_CORE_LIMIT
}

// ==========================================
// BatchControl - 取消信号
// ==========================================
// 克隆后共享同一个标志位, 可跨线程取消
#[derive(Debug, Clone, Default)]
pub struct BatchControl {
    cancelled: Arc<AtomicBool>,
}

impl BatchControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

// ==========================================
// BatchOptions - 批量参数
// ==========================================
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// 最低总分 (默认 30)
    pub min_score: i32,
    /// 工作线程数, 0 表示使用 rayon 全局线程池
    pub worker_threads: usize,
    /// 整批截止时长 (不是单对超时)
    pub deadline: Option<Duration>,
    pub control: BatchControl,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            worker_threads: 0,
            deadline: None,
            control: BatchControl::new(),
        }
    }
}

// ==========================================
// BatchOutcome - 批量结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub matches: Vec<RankedMatch>,
    /// 全部已评分的对 (含落选), 按候选输入顺序
    pub scored: Vec<ScoredPair>,
    /// 已完成评分的候选数
    pub evaluated: usize,
    /// 因取消/截止未评分的候选数
    pub skipped: usize,
    pub interrupted: bool,
}

// ==========================================
// BatchRanker - 批量排序器
// ==========================================
#[derive(Debug, Clone)]
pub struct BatchRanker<D = RegionTierDistance, R = FixedReputation> {
    orchestrator: MatchOrchestrator<D, R>,
}

impl Default for BatchRanker {
    fn default() -> Self {
        Self::new(MatchOrchestrator::new())
    }
}

impl<D, R> BatchRanker<D, R>
where
    D: DistanceEstimator,
    R: ReputationProvider,
{
    pub fn new(orchestrator: MatchOrchestrator<D, R>) -> Self {
        Self { orchestrator }
    }

    pub fn orchestrator(&self) -> &MatchOrchestrator<D, R> {
        &self.orchestrator
    }

    /// 顺序排序
    pub fn rank(
        &self,
        freight: &FreightRequest,
        candidates: &[ReturnAnnouncement],
        min_score: i32,
    ) -> Vec<RankedMatch> {
        let scored = candidates
            .iter()
            .map(|announcement| Some(self.orchestrator.compute_match(freight, announcement)))
            .collect::<Vec<_>>();

        Self::filter_and_sort(candidates, scored, min_score)
    }

    /// 并行排序 (可取消、可设整批截止)
    #[instrument(
        skip(self, freight, candidates, options),
        fields(freight_id = %freight.id, candidates = candidates.len())
    )]
    pub fn rank_parallel(
        &self,
        freight: &FreightRequest,
        candidates: &[ReturnAnnouncement],
        options: &BatchOptions,
    ) -> BatchOutcome {
        let deadline = options.deadline.map(|d| Instant::now() + d);

        let evaluate = || -> Vec<Option<MatchResult>> {
            candidates
                .par_iter()
                .map(|announcement| {
                    if options.control.is_cancelled()
                        || deadline.map_or(false, |d| Instant::now() >= d)
                    {
                        return None;
                    }
                    Some(self.orchestrator.compute_match(freight, announcement))
                })
                .collect()
        };

        let scored = match options.worker_threads {
            0 => evaluate(),
            n => match ThreadPoolBuilder::new()
                .num_threads(n.min(max_worker_threads()))
                .build()
            {
                Ok(pool) => pool.install(|| evaluate()),
                Err(e) => {
                    warn!(error = %e, worker_threads = n, "线程池创建失败, 回退到全局线程池");
                    evaluate()
                }
            },
        };

        let evaluated = scored.iter().filter(|r| r.is_some()).count();
        let skipped = scored.len() - evaluated;
        let interrupted = skipped > 0;

        if interrupted {
            warn!(
                evaluated,
                skipped,
                cancelled = options.control.is_cancelled(),
                "批量评分被中断, 返回部分结果"
            );
        }

        let scored_pairs: Vec<ScoredPair> = candidates
            .iter()
            .zip(&scored)
            .filter_map(|(announcement, result)| {
                result.as_ref().map(|result| ScoredPair {
                    announcement_id: announcement.id.clone(),
                    result: result.clone(),
                })
            })
            .collect();

        let matches = Self::filter_and_sort(candidates, scored, options.min_score);

        info!(
            evaluated,
            kept = matches.len(),
            skipped,
            min_score = options.min_score,
            "批量排序完成"
        );

        BatchOutcome {
            matches,
            scored: scored_pairs,
            evaluated,
            skipped,
            interrupted,
        }
    }

    /// 过滤 (兼容且 total ≥ min_score) + 稳定降序排序
    fn filter_and_sort(
        candidates: &[ReturnAnnouncement],
        scored: Vec<Option<MatchResult>>,
        min_score: i32,
    ) -> Vec<RankedMatch> {
        let mut matches: Vec<RankedMatch> = candidates
            .iter()
            .zip(scored)
            .filter_map(|(announcement, result)| {
                let result = result?;
                if !result.compatible || result.total < min_score {
                    return None;
                }
                Some(RankedMatch {
                    announcement: announcement.clone(),
                    score: result.total,
                    details: result.details(),
                })
            })
            .collect();

        // sort_by 为稳定排序, 同分保持输入顺序
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::freight::Location;
    use crate::engine::cargo_table::CargoCompatibilityTable;
    use crate::engine::test_support::{create_test_announcement, create_test_freight};
    use chrono::Duration as ChronoDuration;
    use std::sync::atomic::AtomicUsize;

    fn ranker() -> BatchRanker {
        BatchRanker::new(MatchOrchestrator::new())
    }

    /// 构造候选池: 完美 / 时间稍差 / 路线不符 / 时间更差
    fn candidate_pool() -> Vec<ReturnAnnouncement> {
        let freight = create_test_freight();

        let perfect = create_test_announcement("A-95");

        let mut lead_time = create_test_announcement("A-90");
        lead_time.available_date = freight.pickup_deadline - ChronoDuration::days(4);

        let mut far = create_test_announcement("A-far");
        far.origin = Location::new("Manaus", "AM");
        far.destination = Location::new("Recife", "PE");
        far.operating_radius_km = 50.0;

        let mut late = create_test_announcement("A-85");
        late.available_date = freight.pickup_deadline - ChronoDuration::days(8);

        vec![late, far, lead_time, perfect]
    }

    #[test]
    fn test_rank_sorted_desc_and_filtered() {
        let ranked = ranker().rank(&create_test_freight(), &candidate_pool(), DEFAULT_MIN_SCORE);

        let ids: Vec<&str> = ranked.iter().map(|m| m.announcement.id.as_str()).collect();
        assert_eq!(ids, vec!["A-95", "A-90", "A-85"]);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(ranked.iter().all(|m| m.details.compatible));
    }

    #[test]
    fn test_rank_min_score_threshold() {
        let ranked = ranker().rank(&create_test_freight(), &candidate_pool(), 90);
        let ids: Vec<&str> = ranked.iter().map(|m| m.announcement.id.as_str()).collect();
        assert_eq!(ids, vec!["A-95", "A-90"]);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let pool = vec![
            create_test_announcement("first"),
            create_test_announcement("second"),
            create_test_announcement("third"),
        ];
        let ranked = ranker().rank(&create_test_freight(), &pool, DEFAULT_MIN_SCORE);
        let ids: Vec<&str> = ranked.iter().map(|m| m.announcement.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_rank_empty_pool_is_empty() {
        let ranked = ranker().rank(&create_test_freight(), &[], DEFAULT_MIN_SCORE);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let freight = create_test_freight();
        let pool: Vec<ReturnAnnouncement> = (0..200)
            .map(|i| {
                let mut a = create_test_announcement(&format!("A{:03}", i));
                a.available_date = freight.pickup_deadline - ChronoDuration::days(i % 13);
                a
            })
            .collect();

        let r = ranker();
        let sequential = r.rank(&freight, &pool, DEFAULT_MIN_SCORE);
        let options = BatchOptions {
            worker_threads: 4,
            ..BatchOptions::default()
        };
        let outcome = r.rank_parallel(&freight, &pool, &options);

        assert_eq!(outcome.matches, sequential);
        assert_eq!(outcome.evaluated, 200);
        assert_eq!(outcome.skipped, 0);
        assert!(!outcome.interrupted);
    }

    #[test]
    fn test_cancelled_before_start_returns_empty_partial() {
        let options = BatchOptions::default();
        options.control.cancel();

        let outcome = ranker().rank_parallel(&create_test_freight(), &candidate_pool(), &options);
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.evaluated, 0);
        assert_eq!(outcome.skipped, 4);
        assert!(outcome.interrupted);
    }

    #[test]
    fn test_expired_deadline_skips_everything() {
        let options = BatchOptions {
            deadline: Some(Duration::ZERO),
            ..BatchOptions::default()
        };
        let outcome = ranker().rank_parallel(&create_test_freight(), &candidate_pool(), &options);
        assert_eq!(outcome.evaluated, 0);
        assert!(outcome.interrupted);
    }

    /// 第 limit 次评分时触发取消的信誉来源
    struct CancelAfter {
        control: BatchControl,
        calls: AtomicUsize,
        limit: usize,
    }

    impl ReputationProvider for CancelAfter {
        fn reputation_points(&self, _announcement: &ReturnAnnouncement) -> i32 {
            if self.calls.fetch_add(1, Ordering::SeqCst) + 1 >= self.limit {
                self.control.cancel();
            }
            5
        }
    }

    #[test]
    fn test_cancel_mid_batch_keeps_partial_results() {
        let freight = create_test_freight();
        let pool: Vec<ReturnAnnouncement> = (0..100)
            .map(|i| {
                let mut a = create_test_announcement(&format!("A{:03}", i));
                a.available_date = freight.pickup_deadline - ChronoDuration::days(i % 9);
                a
            })
            .collect();

        let control = BatchControl::new();
        let provider = CancelAfter {
            control: control.clone(),
            calls: AtomicUsize::new(0),
            limit: 5,
        };
        let ranker = BatchRanker::new(MatchOrchestrator::with_components(
            RegionTierDistance::new(),
            Arc::new(CargoCompatibilityTable::default()),
            provider,
        ));
        let options = BatchOptions {
            worker_threads: 1,
            control,
            ..BatchOptions::default()
        };

        let outcome = ranker.rank_parallel(&freight, &pool, &options);

        // 单线程下取消后的候选全部跳过
        assert!(outcome.interrupted);
        assert_eq!(outcome.evaluated, 5);
        assert_eq!(outcome.skipped, 95);
        assert_eq!(outcome.evaluated + outcome.skipped, pool.len());
        assert_eq!(outcome.scored.len(), outcome.evaluated);

        assert!(!outcome.matches.is_empty());
        assert!(outcome.matches.len() <= outcome.evaluated);
        assert!(outcome.matches.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(outcome.matches.iter().all(|m| m.details.compatible));
        assert!(outcome.matches.iter().all(|m| outcome
            .scored
            .iter()
            .any(|p| p.announcement_id == m.announcement.id && p.result.total == m.score)));
    }
}
