//! Epoch-relative network timestamps.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// Unit a network counts time in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeResolution {
    Milliseconds,
    Seconds,
}

impl TimeResolution {
    fn per_second(&self) -> u64 {
        match self {
            Self::Milliseconds => 1_000,
            Self::Seconds => 1,
        }
    }
}

/// A point in network time: ticks since the network epoch.
///
/// Deadlines are usually built as `now.add_hours(2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkTimestamp {
    ticks: u64,
    resolution: TimeResolution,
}

impl NetworkTimestamp {
    pub fn new(ticks: u64, resolution: TimeResolution) -> Self {
        Self { ticks, resolution }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn resolution(&self) -> TimeResolution {
        self.resolution
    }

    /// True for the epoch itself.
    pub fn is_epochal(&self) -> bool {
        self.ticks == 0
    }

    pub fn add_seconds(self, count: u64) -> Self {
        Self {
            ticks: self
                .ticks
                .saturating_add(count.saturating_mul(self.resolution.per_second())),
            ..self
        }
    }

    pub fn add_minutes(self, count: u64) -> Self {
        self.add_seconds(count.saturating_mul(60))
    }

    pub fn add_hours(self, count: u64) -> Self {
        self.add_minutes(count.saturating_mul(60))
    }

    /// Converts back to wall-clock time given the network epoch. `None` when
    /// the result falls outside chrono's range.
    pub fn to_datetime(&self, epoch: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let ticks = i64::try_from(self.ticks).ok()?;
        let offset = match self.resolution {
            TimeResolution::Milliseconds => Duration::try_milliseconds(ticks)?,
            TimeResolution::Seconds => Duration::try_seconds(ticks)?,
        };
        epoch.checked_add_signed(offset)
    }

    /// Builds a timestamp from wall-clock time. Instants before the epoch
    /// yield `None`.
    pub fn from_datetime(
        instant: DateTime<Utc>,
        epoch: DateTime<Utc>,
        resolution: TimeResolution,
    ) -> Option<Self> {
        let elapsed = instant.signed_duration_since(epoch);
        let ticks = match resolution {
            TimeResolution::Milliseconds => elapsed.num_milliseconds(),
            TimeResolution::Seconds => elapsed.num_seconds(),
        };
        u64::try_from(ticks)
            .ok()
            .map(|ticks| Self::new(ticks, resolution))
    }
}

impl fmt::Display for NetworkTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 16, 0, 6, 25).unwrap()
    }

    #[test]
    fn adding_time_respects_resolution() {
        let millis = NetworkTimestamp::new(0, TimeResolution::Milliseconds);
        assert_eq!(millis.add_seconds(1).ticks(), 1_000);
        assert_eq!(millis.add_hours(2).ticks(), 7_200_000);

        let seconds = NetworkTimestamp::new(10, TimeResolution::Seconds);
        assert_eq!(seconds.add_minutes(1).ticks(), 70);
    }

    #[test]
    fn datetime_round_trip() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let timestamp =
            NetworkTimestamp::from_datetime(instant, epoch(), TimeResolution::Milliseconds)
                .unwrap();
        assert_eq!(timestamp.to_datetime(epoch()), Some(instant));
    }

    #[test]
    fn instants_before_epoch_are_rejected() {
        let before = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert!(
            NetworkTimestamp::from_datetime(before, epoch(), TimeResolution::Seconds).is_none()
        );
    }

    #[test]
    fn overflowing_ticks_have_no_datetime() {
        let far = NetworkTimestamp::new(u64::MAX, TimeResolution::Seconds);
        assert!(far.to_datetime(epoch()).is_none());
    }

    #[test]
    fn epoch_is_epochal() {
        let timestamp =
            NetworkTimestamp::from_datetime(epoch(), epoch(), TimeResolution::Seconds).unwrap();
        assert!(timestamp.is_epochal());
        assert!(!timestamp.add_seconds(1).is_epochal());
    }
}
