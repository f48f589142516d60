/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Start of the current UTC day in milliseconds.
///
/// Used for "completed today" projections on the dashboard.
pub fn day_start_millis(now: i64) -> i64 {
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    now - now.rem_euclid(DAY_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_start_is_midnight() {
        // 2024-06-15 13:45:30 UTC
        let now = 1_718_459_130_000;
        let start = day_start_millis(now);
        assert_eq!(start % (24 * 60 * 60 * 1000), 0);
        assert!(start <= now);
        assert!(now - start < 24 * 60 * 60 * 1000);
    }
}
