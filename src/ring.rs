// DistWatch - Progress Ring
//
// Maps session progress onto the ring's colour and sweep.

/// Ramp colours from "just started" to "almost there".
pub const RAMP_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingState {
    /// Goal still ahead. `ramp_index` picks the colour, the arc runs from the
    /// sweep start to `end_deg`.
    Approaching { ramp_index: usize, end_deg: i32 },
    /// Goal reached, or no positive goal set: full sweep in the complete colour.
    Complete { end_deg: i32 },
}

impl RingState {
    /// Classify `delta` meters against `goal` on a `(start, end)` degree sweep.
    ///
    /// A goal at or below zero counts as met, so no ratio is ever taken over
    /// it. Negative progress draws an empty arc in the first ramp colour.
    pub fn classify(delta: i32, goal: i32, sweep_deg: (i32, i32)) -> Self {
        let (start, end) = sweep_deg;
        if goal <= 0 || delta >= goal {
            return Self::Complete { end_deg: end };
        }

        let delta = i64::from(delta.max(0));
        let goal = i64::from(goal);
        let ramp_index = ((RAMP_LEN as i64 * delta / goal) as usize).min(RAMP_LEN - 1);
        let span = i64::from(end - start);
        let end_deg = start + (span * delta / goal) as i32;

        Self::Approaching { ramp_index, end_deg }
    }

    pub fn end_deg(&self) -> i32 {
        match *self {
            Self::Approaching { end_deg, .. } | Self::Complete { end_deg } => end_deg,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }
}
