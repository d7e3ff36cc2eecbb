// ==========================================
// 货运撮合系统 - 时间窗评分
// ==========================================
// 职责: 评估回程可用日期与最晚提货日期的吻合度
// 输出: {0, 5, 10, 12, 15}
// ==========================================

use crate::domain::announcement::ReturnAnnouncement;
use crate::domain::freight::FreightRequest;
use chrono::NaiveDate;

// ==========================================
// TimeWindowScorer - 纯函数工具类
// ==========================================
pub struct TimeWindowScorer;

impl TimeWindowScorer {
    /// 时间窗得分
    pub fn score(freight: &FreightRequest, announcement: &ReturnAnnouncement) -> i32 {
        let diff_days = Self::diff_days(freight.pickup_deadline, announcement.available_date);
        Self::points_for_diff(diff_days)
    }

    /// 提前天数 = 最晚提货日期 - 可用日期
    pub fn diff_days(pickup_deadline: NaiveDate, available_date: NaiveDate) -> i64 {
        pickup_deadline
            .signed_duration_since(available_date)
            .num_days()
    }

    /// 分档
    ///
    /// | 提前天数 d | 得分 |
    /// |---|---|
    /// | 0 ≤ d ≤ 2 | 15 |
    /// | -2 ≤ d < 0 | 12 |
    /// | 2 < d ≤ 5 | 10 |
    /// | 5 < d ≤ 10 | 5 |
    /// | 其他 | 0 |
    pub fn points_for_diff(diff_days: i64) -> i32 {
        match diff_days {
            0..=2 => 15,
            -2..=-1 => 12,
            3..=5 => 10,
            6..=10 => 5,
            _ => 0,
        }
    }
}
