//! # 保存期間の判定
//!
//! バックグラウンドの掃除は行わない。取得要求が来たときにだけ
//! ファイルの更新時刻と現在時刻から期限切れを判定する。

use std::time::{Duration, SystemTime};

/// 1日の秒数
pub const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// 日数指定の保存期間を `Duration` に変換する。
pub fn retention_from_days(days: u64) -> Duration {
    Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY))
}

/// 更新時刻からの経過時間。更新時刻が未来の場合は0とみなす。
pub fn file_age(modified: SystemTime, now: SystemTime) -> Duration {
    now.duration_since(modified).unwrap_or(Duration::ZERO)
}

/// 保存期間を超えているか。境界ちょうどはまだ有効。
pub fn is_expired(modified: SystemTime, now: SystemTime, retention: Duration) -> bool {
    file_age(modified, now) > retention
}
