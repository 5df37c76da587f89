// DistWatch - Session State
//
// Everything the watch remembers about the current walk. Owned by the `App`
// and passed by reference into the tracker and speed estimator, so tests can
// build any state they need.

/// Counters for one walking session. Distances are cumulative meters as
/// reported by the health source, times are unix seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    /// Cumulative distance at the last start event.
    pub distance_start: i32,
    /// Latest cumulative distance sample.
    pub distance_now: i32,
    /// Target delta distance. May be zero or negative.
    pub distance_goal: i32,
    /// Cumulative distance seen by the previous sample.
    pub last_distance: i32,
    pub first_update_time: i64,
    pub last_update_time: i64,
    /// Average speed since the session started, cm/s.
    pub speed: i32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance walked since the last start event. Negative when the source
    /// counter went backwards.
    pub fn delta(&self) -> i32 {
        self.distance_now - self.distance_start
    }

    pub fn elapsed(&self, now: i64) -> i64 {
        now - self.first_update_time
    }
}
