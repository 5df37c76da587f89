// DistWatch - Health Data Interface
//
// What the tracker needs from whatever counts the wearer's steps. On the watch
// that is the on-board pedometer; tests plug in scripted sources.

use std::sync::Arc;

pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthMetric {
    StepCount,
    WalkedDistanceMeters,
}

/// One minute of step history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinuteSample {
    pub steps: u16,
    /// No data recorded for this minute (device off, not worn, ...).
    pub is_invalid: bool,
}

impl MinuteSample {
    pub const INVALID: Self = Self { steps: 0, is_invalid: true };

    pub fn valid(steps: u16) -> Self {
        Self { steps, is_invalid: false }
    }
}

pub trait HealthSource {
    /// Total of `metric` since local midnight.
    fn sum_today(&self, metric: HealthMetric) -> i32;

    /// Fill `buf` with per-minute samples for `[start, end)`, oldest first.
    /// Returns how many slots were written.
    fn minute_history(&self, buf: &mut [MinuteSample], start: i64, end: i64) -> usize;

    /// Whether `metric` can be read for `[start, end)`.
    fn metric_accessible(&self, metric: HealthMetric, start: i64, end: i64) -> bool;
}

impl<H: HealthSource + ?Sized> HealthSource for &H {
    fn sum_today(&self, metric: HealthMetric) -> i32 {
        (**self).sum_today(metric)
    }

    fn minute_history(&self, buf: &mut [MinuteSample], start: i64, end: i64) -> usize {
        (**self).minute_history(buf, start, end)
    }

    fn metric_accessible(&self, metric: HealthMetric, start: i64, end: i64) -> bool {
        (**self).metric_accessible(metric, start, end)
    }
}

impl<H: HealthSource + ?Sized> HealthSource for Arc<H> {
    fn sum_today(&self, metric: HealthMetric) -> i32 {
        (**self).sum_today(metric)
    }

    fn minute_history(&self, buf: &mut [MinuteSample], start: i64, end: i64) -> usize {
        (**self).minute_history(buf, start, end)
    }

    fn metric_accessible(&self, metric: HealthMetric, start: i64, end: i64) -> bool {
        (**self).metric_accessible(metric, start, end)
    }
}

/// Unix second of the wearer's local midnight on the day containing `now`.
/// `tz_offset_minutes` is local time minus UTC (UTC-5 is `-300`).
pub fn start_of_day(now: i64, tz_offset_minutes: i32) -> i64 {
    let offset = i64::from(tz_offset_minutes) * 60;
    let local = now + offset;
    local - local.rem_euclid(SECONDS_PER_DAY) - offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_of_day_floors_to_midnight() {
        assert_eq!(start_of_day(0, 0), 0);
        assert_eq!(start_of_day(SECONDS_PER_DAY + 5, 0), SECONDS_PER_DAY);
        assert_eq!(start_of_day(-1, 0), -SECONDS_PER_DAY);
    }

    #[test]
    fn start_of_day_follows_the_local_clock() {
        // 2023-11-15 00:30 UTC is still the 14th at UTC-5 (19:30).
        let now = 1_700_008_200;
        assert_eq!(start_of_day(now, 0), 1_700_006_400);
        assert_eq!(start_of_day(now, -300), 1_699_938_000);
        // 2023-11-15 02:30 at UTC+2, midnight was 22:00 UTC on the 14th.
        assert_eq!(start_of_day(now, 120), 1_699_999_200);
    }
}
