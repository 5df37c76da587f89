// DistWatch - Step Histogram
//
// The last hour of per-minute step counts, refreshed wholesale once a minute,
// and the scale the chart is drawn against.

use crate::config::*;
use crate::health::{HealthSource, MinuteSample};

// Largest multiple of the rounding step representable in a u16.
const MAX_SCALE: u16 = u16::MAX / HISTOGRAM_SCALE_ROUNDING * HISTOGRAM_SCALE_ROUNDING;

/// Round `max(MIN_HISTOGRAM_SCALE, largest)` up to the next multiple of ten.
pub fn scale_for<'a>(samples: impl IntoIterator<Item = &'a MinuteSample>) -> u16 {
    let largest = samples
        .into_iter()
        .filter(|m| !m.is_invalid)
        .map(|m| m.steps)
        .fold(MIN_HISTOGRAM_SCALE, u16::max)
        .min(MAX_SCALE);
    let step = HISTOGRAM_SCALE_ROUNDING;
    largest.div_ceil(step) * step
}

#[derive(Debug, Clone)]
pub struct StepHistogram {
    samples: [MinuteSample; HISTORY_MINUTES],
    max_step: u16,
}

impl Default for StepHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl StepHistogram {
    pub fn new() -> Self {
        Self {
            samples: [MinuteSample::INVALID; HISTORY_MINUTES],
            max_step: MIN_HISTOGRAM_SCALE,
        }
    }

    /// Reload the trailing hour `[now - 3600, now - 60)` from `source`.
    /// Slots the source does not fill are invalid.
    pub fn refresh<H: HealthSource + ?Sized>(&mut self, now: i64, source: &H) {
        let start = now - HISTORY_WINDOW_S;
        let end = now - 60;
        let filled = source
            .minute_history(&mut self.samples, start, end)
            .min(HISTORY_MINUTES);
        for slot in &mut self.samples[filled..] {
            *slot = MinuteSample::INVALID;
        }
        self.max_step = scale_for(&self.samples);
        log::debug!("Histogram refreshed: {} minutes, scale {}", filled, self.max_step);
    }

    pub fn samples(&self) -> &[MinuteSample] {
        &self.samples
    }

    /// Chart scale: always at least 50 and a multiple of 10.
    pub fn max_step(&self) -> u16 {
        self.max_step
    }

    /// Bar height in pixels for `steps` on a chart `chart_height` tall.
    pub fn bar_height(&self, steps: u16, chart_height: u32) -> u32 {
        let height = chart_height * u32::from(steps) / u32::from(self.max_step.max(1));
        height.min(chart_height)
    }

    /// `(slot, height)` for every valid minute, oldest first.
    pub fn bars(&self, chart_height: u32) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.samples
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.is_invalid)
            .map(move |(i, m)| (i, self.bar_height(m.steps, chart_height)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::HealthMetric;

    /// Returns a fixed list of samples regardless of the window.
    struct Scripted(Vec<MinuteSample>);

    impl HealthSource for Scripted {
        fn sum_today(&self, _metric: HealthMetric) -> i32 {
            0
        }

        fn minute_history(&self, buf: &mut [MinuteSample], _start: i64, _end: i64) -> usize {
            let n = self.0.len().min(buf.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            n
        }

        fn metric_accessible(&self, _metric: HealthMetric, _start: i64, _end: i64) -> bool {
            true
        }
    }

    #[test]
    fn scale_has_a_floor_of_fifty() {
        assert_eq!(scale_for(&[] as &[MinuteSample]), 50);
        assert_eq!(scale_for(&[MinuteSample::valid(0); 60]), 50);
        assert_eq!(scale_for(&[MinuteSample::INVALID; 60]), 50);
        assert_eq!(scale_for(&[MinuteSample::valid(12)]), 50);
    }

    #[test]
    fn scale_rounds_up_to_ten() {
        assert_eq!(scale_for(&[MinuteSample::valid(51)]), 60);
        assert_eq!(scale_for(&[MinuteSample::valid(60)]), 60);
        assert_eq!(scale_for(&[MinuteSample::valid(117), MinuteSample::valid(3)]), 120);
    }

    #[test]
    fn scale_ignores_invalid_slots() {
        let samples = [MinuteSample { steps: 250, is_invalid: true }, MinuteSample::valid(70)];
        assert_eq!(scale_for(&samples), 70);
    }

    #[test]
    fn scale_is_always_a_multiple_of_ten() {
        for steps in 0..=u16::MAX / 2 {
            let scale = scale_for(&[MinuteSample::valid(steps)]);
            assert!(scale >= 50);
            assert_eq!(scale % 10, 0);
            assert!(scale >= steps);
        }
    }

    #[test]
    fn scale_saturates_on_a_multiple_of_ten() {
        assert_eq!(scale_for(&[MinuteSample::valid(u16::MAX)]), 65_530);
    }

    #[test]
    fn refresh_invalidates_unreturned_slots() {
        let mut h = StepHistogram::new();
        h.refresh(10_000, &Scripted(vec![MinuteSample::valid(80); 60]));
        assert_eq!(h.bars(38).count(), 60);

        h.refresh(10_060, &Scripted(vec![MinuteSample::valid(30); 10]));
        assert_eq!(h.bars(38).count(), 10);
        assert!(h.samples()[10..].iter().all(|m| m.is_invalid));
        assert_eq!(h.max_step(), 50);
    }

    #[test]
    fn bar_heights_scale_to_chart() {
        let mut h = StepHistogram::new();
        h.refresh(0, &Scripted(vec![MinuteSample::valid(100), MinuteSample::valid(50)]));
        assert_eq!(h.max_step(), 100);
        assert_eq!(h.bar_height(100, 38), 38);
        assert_eq!(h.bar_height(50, 38), 19);
        assert_eq!(h.bar_height(0, 38), 0);
        let bars: Vec<_> = h.bars(38).collect();
        assert_eq!(bars, vec![(0, 38), (1, 19)]);
    }
}
