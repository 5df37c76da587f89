// DistWatch - Distance Tracker
//
// Baselines the cumulative distance counter, follows it sample by sample and
// decides when the wearer deserves a buzz.

use crate::config::METERS_PER_KILOMETER;
use crate::haptic::HapticAlert;
use crate::session::Session;

/// Which alert, if any, a move from `prev_delta` to `new_delta` earns.
/// The goal crossing wins over a kilometer crossing.
pub fn classify_crossing(prev_delta: i32, new_delta: i32, goal: i32) -> Option<HapticAlert> {
    if prev_delta < goal && goal <= new_delta {
        Some(HapticAlert::GoalReached)
    } else if prev_delta / METERS_PER_KILOMETER < new_delta / METERS_PER_KILOMETER {
        Some(HapticAlert::Kilometer)
    } else {
        None
    }
}

impl Session {
    /// Re-baseline on the current cumulative distance. The previous-sample
    /// marker moves with it, so the first sample afterwards starts from zero
    /// progress and cannot fire an alert for distance walked before the reset.
    pub fn start_session(&mut self, cumulative_now: i32) {
        self.distance_start = cumulative_now;
        self.distance_now = cumulative_now;
        self.last_distance = cumulative_now;
    }

    /// Record a new cumulative distance and report any threshold crossed
    /// since the previous sample.
    pub fn sample(&mut self, cumulative_now: i32, now: i64) -> Option<HapticAlert> {
        let prev_delta = self.last_distance - self.distance_start;
        let new_delta = cumulative_now - self.distance_start;
        let alert = classify_crossing(prev_delta, new_delta, self.distance_goal);

        if let Some(alert) = alert {
            log::info!("{:?} at {} m (goal {} m)", alert, new_delta, self.distance_goal);
        }

        self.distance_now = cumulative_now;
        self.last_distance = cumulative_now;
        self.last_update_time = now;
        alert
    }

    /// Move the goal by `delta` meters. No clamping; a goal at or below zero
    /// simply reads as already achieved.
    pub fn adjust_goal(&mut self, delta: i32) {
        self.distance_goal = self.distance_goal.saturating_add(delta);
    }

    pub fn goal_achieved(&self) -> bool {
        self.delta() >= self.distance_goal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_goal(goal: i32) -> Session {
        let mut s = Session::new();
        s.start_session(0);
        s.distance_goal = goal;
        s
    }

    #[test]
    fn goal_fires_once_per_upward_crossing() {
        let mut s = session_with_goal(500);
        assert_eq!(s.sample(400, 1), None);
        assert_eq!(s.sample(500, 2), Some(HapticAlert::GoalReached));
        assert_eq!(s.sample(600, 3), None);
    }

    #[test]
    fn goal_wins_over_kilometer() {
        let mut s = session_with_goal(1000);
        s.sample(990, 1);
        assert_eq!(s.sample(1010, 2), Some(HapticAlert::GoalReached));
    }

    #[test]
    fn kilometer_crossing() {
        assert_eq!(classify_crossing(999, 1000, 5000), Some(HapticAlert::Kilometer));
        assert_eq!(classify_crossing(1000, 1999, 5000), None);
        assert_eq!(classify_crossing(1999, 3001, 5000), Some(HapticAlert::Kilometer));
    }

    #[test]
    fn delta_is_relative_to_baseline() {
        let mut s = Session::new();
        s.start_session(7_250);
        s.distance_goal = 100;
        assert_eq!(s.sample(7_300, 10), None);
        assert_eq!(s.delta(), 50);
        assert_eq!(s.sample(7_350, 11), Some(HapticAlert::GoalReached));
        assert_eq!(s.last_update_time, 11);
    }

    #[test]
    fn restart_does_not_fire_for_old_distance() {
        let mut s = session_with_goal(0);
        s.sample(2_500, 1);
        s.start_session(2_500);
        assert_eq!(s.sample(2_500, 2), None);
        assert_eq!(s.delta(), 0);
    }

    #[test]
    fn backward_jump_is_negative_progress() {
        let mut s = session_with_goal(500);
        s.sample(600, 1);
        assert_eq!(s.sample(100, 2), None);
        assert_eq!(s.sample(-50, 3), None);
        assert_eq!(s.delta(), -50);
        // Climbing back across the goal is a new crossing.
        assert_eq!(s.sample(500, 4), Some(HapticAlert::GoalReached));
    }

    #[test]
    fn goal_adjust_is_additive_and_unbounded() {
        let mut s = session_with_goal(0);
        for _ in 0..5 {
            s.adjust_goal(-100);
        }
        assert_eq!(s.distance_goal, -500);
        assert!(s.goal_achieved());
        s.adjust_goal(700);
        assert_eq!(s.distance_goal, 200);
        assert!(!s.goal_achieved());
    }

    #[test]
    fn goal_adjust_pins_at_i32_limits() {
        let mut s = session_with_goal(i32::MAX - 50);
        s.adjust_goal(100);
        assert_eq!(s.distance_goal, i32::MAX);
        s.distance_goal = i32::MIN + 50;
        s.adjust_goal(-100);
        assert_eq!(s.distance_goal, i32::MIN);
    }
}
