// DistWatch - Pedometer
//
// Counts steps from raw accelerometer readings and keeps today's totals plus a
// short per-minute log. This is the health data source on the watch: the
// sensor task feeds it, the UI task reads it through `HealthSource`.

use std::sync::{Mutex, PoisonError};

use crate::config::*;
use crate::health::{start_of_day, HealthMetric, HealthSource, MinuteSample, SECONDS_PER_DAY};

/// Rising-edge threshold detector on acceleration magnitude.
#[derive(Debug, Clone)]
pub struct StepDetector {
    threshold_g: f32,
    min_interval_ms: i64,
    prev_magnitude: f32,
    last_step_ms: Option<i64>,
}

impl Default for StepDetector {
    fn default() -> Self {
        Self::new(STEP_THRESHOLD_G, MIN_STEP_INTERVAL_MS as i64)
    }
}

impl StepDetector {
    pub fn new(threshold_g: f32, min_interval_ms: i64) -> Self {
        Self {
            threshold_g,
            min_interval_ms,
            prev_magnitude: 0.0,
            last_step_ms: None,
        }
    }

    pub fn magnitude(accel: [f32; 3]) -> f32 {
        let [x, y, z] = accel;
        (x * x + y * y + z * z).sqrt()
    }

    /// Feed one reading (in g). Returns `true` when it completes a step.
    pub fn process(&mut self, accel: [f32; 3], timestamp_ms: i64) -> bool {
        let magnitude = Self::magnitude(accel);
        let rising = self.prev_magnitude < self.threshold_g && magnitude >= self.threshold_g;
        self.prev_magnitude = magnitude;

        if !rising {
            return false;
        }
        if let Some(last) = self.last_step_ms {
            if timestamp_ms - last < self.min_interval_ms {
                return false;
            }
        }
        self.last_step_ms = Some(timestamp_ms);
        true
    }
}

#[derive(Debug, Clone, Copy)]
struct MinuteBucket {
    minute: i64,
    steps: u16,
}

// One spare slot for the minute in progress plus one for the window edge.
const LOG_SLOTS: usize = HISTORY_MINUTES + 2;

pub struct Pedometer {
    detector: StepDetector,
    stride_cm: u32,
    tz_offset_minutes: i32,
    day_start: i64,
    steps_today: u32,
    distance_cm_today: u64,
    /// First minute with data; earlier minutes report invalid.
    first_minute: i64,
    /// Latest minute we have seen time for; later minutes report invalid.
    current_minute: i64,
    log: [Option<MinuteBucket>; LOG_SLOTS],
}

impl Pedometer {
    pub fn new(now: i64) -> Self {
        Self::with_detector(StepDetector::default(), STRIDE_CM, now)
    }

    pub fn with_detector(detector: StepDetector, stride_cm: u32, now: i64) -> Self {
        Self {
            detector,
            stride_cm,
            tz_offset_minutes: TZ_OFFSET_MINUTES,
            day_start: start_of_day(now, TZ_OFFSET_MINUTES),
            steps_today: 0,
            distance_cm_today: 0,
            first_minute: now.div_euclid(60),
            current_minute: now.div_euclid(60),
            log: [None; LOG_SLOTS],
        }
    }

    /// Count days in the wearer's time zone instead of `TZ_OFFSET_MINUTES`.
    pub fn in_timezone(mut self, tz_offset_minutes: i32) -> Self {
        self.tz_offset_minutes = tz_offset_minutes;
        self.day_start = start_of_day(self.current_minute * 60, tz_offset_minutes);
        self
    }

    /// Feed one accelerometer reading (in g) taken at unix `timestamp_ms`.
    /// Returns `true` if it completed a step.
    pub fn process_sample(&mut self, accel: [f32; 3], timestamp_ms: i64) -> bool {
        let now = timestamp_ms.div_euclid(1000);
        self.advance_to(now);
        if self.detector.process(accel, timestamp_ms) {
            self.record_step(now);
            return true;
        }
        false
    }

    /// Count one step at unix second `now`.
    pub fn record_step(&mut self, now: i64) {
        self.advance_to(now);
        self.steps_today += 1;
        self.distance_cm_today += u64::from(self.stride_cm);

        let minute = now.div_euclid(60);
        let slot = &mut self.log[minute.rem_euclid(LOG_SLOTS as i64) as usize];
        match slot {
            Some(bucket) if bucket.minute == minute => {
                bucket.steps = bucket.steps.saturating_add(1);
            }
            _ => *slot = Some(MinuteBucket { minute, steps: 1 }),
        }
    }

    /// Move the clock forward, resetting the daily totals at local midnight.
    pub fn advance_to(&mut self, now: i64) {
        if now >= self.day_start + SECONDS_PER_DAY {
            log::info!("New day, pedometer totals reset ({} steps yesterday)", self.steps_today);
            self.day_start = start_of_day(now, self.tz_offset_minutes);
            self.steps_today = 0;
            self.distance_cm_today = 0;
        }
        self.current_minute = self.current_minute.max(now.div_euclid(60));
    }

    /// Unix second of the local midnight the totals count from.
    pub fn day_start(&self) -> i64 {
        self.day_start
    }

    pub fn steps_today(&self) -> u32 {
        self.steps_today
    }

    pub fn distance_m_today(&self) -> i32 {
        (self.distance_cm_today / 100).min(i32::MAX as u64) as i32
    }

    fn minute_sample(&self, minute: i64) -> MinuteSample {
        if minute < self.first_minute || minute > self.current_minute {
            return MinuteSample::INVALID;
        }
        match self.log[minute.rem_euclid(LOG_SLOTS as i64) as usize] {
            Some(bucket) if bucket.minute == minute => MinuteSample::valid(bucket.steps),
            _ => MinuteSample::valid(0),
        }
    }
}

impl HealthSource for Pedometer {
    fn sum_today(&self, metric: HealthMetric) -> i32 {
        match metric {
            HealthMetric::StepCount => self.steps_today.min(i32::MAX as u32) as i32,
            HealthMetric::WalkedDistanceMeters => self.distance_m_today(),
        }
    }

    fn minute_history(&self, buf: &mut [MinuteSample], start: i64, end: i64) -> usize {
        // Minutes whose first second lies in [start, end).
        let first = start.div_euclid(60) + i64::from(start.rem_euclid(60) != 0);
        let last = end.div_euclid(60) + i64::from(end.rem_euclid(60) != 0);

        let mut filled = 0;
        for (slot, minute) in buf.iter_mut().zip(first..last) {
            *slot = self.minute_sample(minute);
            filled += 1;
        }
        filled
    }

    fn metric_accessible(&self, _metric: HealthMetric, start: i64, end: i64) -> bool {
        start <= end
    }
}

impl HealthSource for Mutex<Pedometer> {
    fn sum_today(&self, metric: HealthMetric) -> i32 {
        self.lock().unwrap_or_else(PoisonError::into_inner).sum_today(metric)
    }

    fn minute_history(&self, buf: &mut [MinuteSample], start: i64, end: i64) -> usize {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .minute_history(buf, start, end)
    }

    fn metric_accessible(&self, metric: HealthMetric, start: i64, end: i64) -> bool {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .metric_accessible(metric, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UP: [f32; 3] = [0.0, 0.0, 1.5];
    const DOWN: [f32; 3] = [0.0, 0.0, 0.9];

    #[test]
    fn detector_counts_rising_edges() {
        let mut d = StepDetector::default();
        assert!(!d.process(DOWN, 0));
        assert!(d.process(UP, 20));
        // Staying above the threshold is still the same step.
        assert!(!d.process(UP, 40));
        assert!(!d.process(DOWN, 300));
        assert!(d.process(UP, 600));
    }

    #[test]
    fn detector_ignores_bounce() {
        let mut d = StepDetector::default();
        assert!(d.process(UP, 1_000));
        assert!(!d.process(DOWN, 1_050));
        assert!(!d.process(UP, 1_100));
        assert!(!d.process(DOWN, 1_200));
        assert!(d.process(UP, 1_300));
    }

    #[test]
    fn steps_accumulate_distance() {
        let mut p = Pedometer::new(600);
        for i in 0..10 {
            p.record_step(600 + i);
        }
        assert_eq!(p.sum_today(HealthMetric::StepCount), 10);
        // 10 * 70 cm
        assert_eq!(p.sum_today(HealthMetric::WalkedDistanceMeters), 7);
    }

    #[test]
    fn accelerometer_samples_drive_steps() {
        let mut p = Pedometer::new(0);
        let mut t = 0;
        for _ in 0..5 {
            p.process_sample(DOWN, t);
            p.process_sample(UP, t + 20);
            t += 600;
        }
        assert_eq!(p.steps_today(), 5);
    }

    #[test]
    fn minute_history_marks_minutes_before_start_invalid() {
        let start = 100 * 60;
        let mut p = Pedometer::new(start);
        p.record_step(start + 5);
        p.record_step(start + 6);
        p.record_step(start + 65);
        p.advance_to(start + 3 * 60);

        let mut buf = [MinuteSample::default(); 5];
        let n = p.minute_history(&mut buf, start - 2 * 60, start + 3 * 60);
        assert_eq!(n, 5);
        assert_eq!(
            buf,
            [
                MinuteSample::INVALID,
                MinuteSample::INVALID,
                MinuteSample::valid(2),
                MinuteSample::valid(1),
                MinuteSample::valid(0),
            ]
        );
    }

    #[test]
    fn minute_history_is_bounded_by_buffer() {
        let p = Pedometer::new(0);
        let mut buf = [MinuteSample::default(); 60];
        assert_eq!(p.minute_history(&mut buf, 0, 7_200), 60);
        assert_eq!(p.minute_history(&mut buf, 0, 0), 0);
    }

    #[test]
    fn day_rolls_over_at_local_midnight() {
        // 2023-11-14 00:00 at UTC-5.
        let midnight = 1_699_938_000;
        let evening = midnight + 18 * 3600 + 30 * 60;
        let mut p = Pedometer::new(evening).in_timezone(-300);
        assert_eq!(p.day_start(), midnight);

        p.record_step(evening);
        // 19:30 local is already the next day in UTC.
        p.record_step(midnight + 19 * 3600 + 30 * 60);
        p.record_step(midnight + 23 * 3600 + 59 * 60);
        assert_eq!(p.steps_today(), 3);

        p.record_step(midnight + SECONDS_PER_DAY + 60);
        assert_eq!(p.steps_today(), 1);
        assert_eq!(p.day_start(), midnight + SECONDS_PER_DAY);
    }

    #[test]
    fn totals_reset_at_midnight() {
        let mut p = Pedometer::new(SECONDS_PER_DAY - 30);
        p.record_step(SECONDS_PER_DAY - 10);
        assert_eq!(p.steps_today(), 1);
        p.record_step(SECONDS_PER_DAY + 10);
        assert_eq!(p.steps_today(), 1);
        assert_eq!(p.sum_today(HealthMetric::WalkedDistanceMeters), 0);
    }
}
