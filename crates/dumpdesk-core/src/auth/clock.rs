use chrono::Utc;

/// Wall clock in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_milliseconds() {
        let now = SystemClock.now_ms();
        // After 2020-01-01 and expressed in ms, not seconds
        assert!(now > 1_577_836_800_000);
    }
}
