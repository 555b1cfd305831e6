const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Coarse age label for `timestamp` as seen from `now` (both epoch millis).
///
/// Timestamps in the future are reported as `"now"`.
pub fn relative_age(timestamp: i64, now: i64) -> String {
    let diff = now.saturating_sub(timestamp).max(0);
    let minutes = diff / MINUTE_MS;
    let hours = diff / HOUR_MS;
    let days = diff / DAY_MS;

    if minutes < 1 {
        "now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else {
        format!("{days}d ago")
    }
}
