use std::time::{Duration, Instant};

/// Format a `Duration` for log fields, scaling the unit automatically
/// (`1.94ms`, `2.34s`).
pub fn fmt_duration(d: Duration) -> String {
    format!("{d:.2?}")
}

/// Warn when the time since `start` exceeds `threshold`. Returns the elapsed
/// time so callers can reuse it in their own log line.
pub fn warn_if_slow(start: Instant, threshold: Duration, label: &str) -> Duration {
    let elapsed = start.elapsed();
    if elapsed > threshold {
        tracing::warn!(
            duration = fmt_duration(elapsed),
            threshold = fmt_duration(threshold),
            "Slow operation: {label}"
        );
    }
    elapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_two_decimals() {
        assert_eq!(fmt_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(fmt_duration(Duration::from_micros(2500)), "2.50ms");
    }

    #[test]
    fn slow_check_reports_elapsed() {
        let start = Instant::now() - Duration::from_millis(5);
        assert!(warn_if_slow(start, Duration::from_secs(60), "test") >= Duration::from_millis(5));
    }
}
