// DistWatch - Speed Estimator
//
// Average speed since the session started, in cm/s, plus the rules for which
// unit the face shows at any given wall-clock second.

use crate::config::{SPEED_IDLE_TIMEOUT_S, UNIT_ROTATION_PERIOD_S};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedUnit {
    KilometersPerHour,
    MinutesPerKilometer,
    MetersPerSecond,
}

/// `delta_distance * 100 / elapsed_seconds`, truncating. Meters in, cm/s out.
///
/// No time elapsed, or negative progress, reads as standing still.
pub fn estimate(delta_distance: i32, elapsed_seconds: i64) -> i32 {
    if elapsed_seconds <= 0 {
        return 0;
    }
    let cm_per_s = i64::from(delta_distance) * 100 / elapsed_seconds;
    cm_per_s.clamp(0, i64::from(i32::MAX)) as i32
}

/// Unit on screen at `second` (0..=59) of the current minute. Each unit holds
/// for `UNIT_ROTATION_PERIOD_S` seconds, so every observer agrees on the unit
/// at a given moment.
pub fn unit_for_second(second: u8, units: &[SpeedUnit]) -> SpeedUnit {
    match units.len() {
        0 => SpeedUnit::KilometersPerHour,
        n => units[(second / UNIT_ROTATION_PERIOD_S) as usize % n],
    }
}

/// Ticks landing on a multiple of the rotation period leave the speed alone.
pub fn is_speed_tick(second: u8) -> bool {
    second % UNIT_ROTATION_PERIOD_S != 0
}

impl Session {
    /// Recompute the average speed after a distance sample.
    pub fn update_speed(&mut self, now: i64) -> i32 {
        self.speed = estimate(self.delta(), self.elapsed(now));
        self.speed
    }

    /// Zero the speed when no sample arrived for longer than the idle
    /// timeout. Returns `true` if the speed was reset.
    pub fn decay_if_idle(&mut self, now: i64) -> bool {
        if now - self.last_update_time > SPEED_IDLE_TIMEOUT_S {
            if self.speed != 0 {
                log::debug!("No movement for {} s, speed reset", now - self.last_update_time);
            }
            self.speed = 0;
            self.last_update_time = now;
            return true;
        }
        false
    }

    /// Restart the speed clock, as on a session start.
    pub fn reset_speed(&mut self, now: i64) {
        self.speed = 0;
        self.first_update_time = now;
        self.last_update_time = now;
    }
}
