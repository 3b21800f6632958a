//! Capture time validation
//!
//! A capture time read from a sidecar is only ever applied to a file after
//! passing [`TimestampValidator::validate`], which accepts
//! `min_epoch <= t <= now + future_tolerance`. "Now" comes from an
//! injectable [`Clock`] and is sampled on every call.

pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};

use crate::config::Config;
use crate::error::TimestampError;
use chrono::{DateTime, Local};
use filetime::FileTime;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 1990-01-01T00:00:00Z
pub const MIN_EPOCH: i64 = 631_152_000;

/// 365 days
pub const FUTURE_TOLERANCE_SECS: i64 = 365 * 24 * 60 * 60;

/// A capture time that passed range validation.
///
/// Only [`TimestampValidator`] constructs this, so holding one means the
/// value is safe to hand to the filesystem as an atime/mtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ValidatedTimestamp(i64);

impl ValidatedTimestamp {
    /// Unix seconds
    pub fn seconds(self) -> i64 {
        self.0
    }

    pub fn to_file_time(self) -> FileTime {
        FileTime::from_unix_time(self.0, 0)
    }

    /// Human-readable local time for log output
    pub fn to_local_string(self) -> String {
        DateTime::from_timestamp(self.0, 0)
            .map(|utc| {
                utc.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| self.0.to_string())
    }
}

impl fmt::Display for ValidatedTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Range check for capture times
#[derive(Clone)]
pub struct TimestampValidator {
    clock: Arc<dyn Clock>,
    min_epoch: i64,
    future_tolerance: i64,
}

impl Default for TimestampValidator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl fmt::Debug for TimestampValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimestampValidator")
            .field("min_epoch", &self.min_epoch)
            .field("future_tolerance", &self.future_tolerance)
            .finish_non_exhaustive()
    }
}

impl TimestampValidator {
    /// Validator with the default bounds
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            min_epoch: MIN_EPOCH,
            future_tolerance: FUTURE_TOLERANCE_SECS,
        }
    }

    /// Validator with the bounds from the configuration
    pub fn from_config(config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            min_epoch: config.min_timestamp,
            future_tolerance: config.max_future_secs,
        }
    }

    /// Accept `timestamp` unchanged if it lies within the allowed range
    pub fn validate(&self, timestamp: i64) -> Result<ValidatedTimestamp, TimestampError> {
        if timestamp < self.min_epoch {
            return Err(TimestampError::BelowMinimum {
                timestamp,
                min: self.min_epoch,
            });
        }

        let max = self.clock.now_epoch().saturating_add(self.future_tolerance);
        if timestamp > max {
            return Err(TimestampError::AboveMaximum { timestamp, max });
        }

        debug!(timestamp, "Timestamp validated");
        Ok(ValidatedTimestamp(timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-06-15T12:00:00Z
    const NOW: i64 = 1_718_452_800;

    fn validator() -> TimestampValidator {
        TimestampValidator::new(Arc::new(FixedClock::new(NOW)))
    }

    #[test]
    fn test_accepts_in_range_unchanged() {
        let v = validator();
        assert_eq!(v.validate(1571673729).unwrap().seconds(), 1571673729);
        assert_eq!(v.validate(MIN_EPOCH).unwrap().seconds(), MIN_EPOCH);
        assert_eq!(v.validate(NOW).unwrap().seconds(), NOW);

        let max = NOW + FUTURE_TOLERANCE_SECS;
        assert_eq!(v.validate(max).unwrap().seconds(), max);
    }

    #[test]
    fn test_rejects_zero_and_negative() {
        let v = validator();
        assert!(matches!(
            v.validate(0),
            Err(TimestampError::BelowMinimum { timestamp: 0, .. })
        ));
        assert!(matches!(
            v.validate(-1),
            Err(TimestampError::BelowMinimum { .. })
        ));
        assert!(v.validate(i64::MIN).is_err());
    }

    #[test]
    fn test_rejects_before_1990() {
        let v = validator();
        assert_eq!(
            v.validate(MIN_EPOCH - 1),
            Err(TimestampError::BelowMinimum {
                timestamp: MIN_EPOCH - 1,
                min: MIN_EPOCH,
            })
        );
    }

    #[test]
    fn test_rejects_far_future() {
        let v = validator();
        let max = NOW + FUTURE_TOLERANCE_SECS;
        assert_eq!(
            v.validate(max + 1),
            Err(TimestampError::AboveMaximum {
                timestamp: max + 1,
                max,
            })
        );
        assert!(v.validate(i64::MAX).is_err());
    }

    #[test]
    fn test_now_sampled_per_call() {
        let clock = Arc::new(FixedClock::new(NOW));
        let v = TimestampValidator::new(clock.clone());
        let candidate = NOW + FUTURE_TOLERANCE_SECS + 100;

        assert!(v.validate(candidate).is_err());
        clock.advance(100);
        assert_eq!(v.validate(candidate).unwrap().seconds(), candidate);
    }

    #[test]
    fn test_bounds_from_config() {
        let mut config = Config::default();
        config.min_timestamp = 1;
        config.max_future_secs = 0;
        let v = TimestampValidator::from_config(&config, Arc::new(FixedClock::new(NOW)));

        assert!(v.validate(1).is_ok());
        assert!(v.validate(0).is_err());
        assert!(v.validate(NOW + 1).is_err());
    }

    #[test]
    fn test_to_file_time() {
        let ts = validator().validate(1571673729).unwrap();
        assert_eq!(ts.to_file_time().unix_seconds(), 1571673729);
        assert_eq!(ts.to_file_time().nanoseconds(), 0);
    }
}
