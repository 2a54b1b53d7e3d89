// src/session/countdown.rs
use std::time::Duration;

/// Below this the countdown is shown as urgent
pub const URGENT_THRESHOLD: Duration = Duration::from_secs(30);

/// `"1분 05초"` or `"45초"`, seconds rounded up
pub fn format_countdown(remaining: Duration) -> String {
    let total_secs = remaining.as_millis().div_ceil(1000);
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    if minutes > 0 {
        format!("{}분 {:02}초", minutes, seconds)
    } else {
        format!("{}초", seconds)
    }
}

pub fn is_urgent(remaining: Duration) -> bool {
    remaining < URGENT_THRESHOLD
}
