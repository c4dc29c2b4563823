//! All things time-related.

pub use chrono::{DateTime, Local, Utc};

/// Tells time and returns the time.
///
/// Generally you will want to retrieve time using [`SystemClock`],
/// but in tests you may want to implement a `Clock` with a fixed time,
/// so that publication receipts and other timestamps are deterministic.
pub trait Clock {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Interacts with the system clock to get the current time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ops::Sub;

    #[test]
    fn it_returns_the_system_time() {
        let clock = SystemClock::default();
        let delta = Utc::now().sub(clock.now());
        let secs = delta.num_seconds();
        assert_eq!(secs, 0);
    }
}
