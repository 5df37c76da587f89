// DistWatch - Unit Formatter
//
// Turns meters and cm/s into the short strings shown on the face. All maths is
// truncating integer arithmetic so the digits match the reference watch face
// exactly (36 cm/s is "1,29km/h", never "1,30km/h").

use core::fmt::{self, Write};

use crate::config::*;
use crate::speed::SpeedUnit;

/// Fixed-capacity display string.
///
/// Writes that would overflow the capacity are cut off at the last character
/// that fits, mirroring `snprintf` into a fixed buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayText<const N: usize>(heapless::String<N>);

pub type DistanceText = DisplayText<DISTANCE_TEXT_LEN>;
pub type SpeedText = DisplayText<SPEED_TEXT_LEN>;
pub type StepsText = DisplayText<STEPS_TEXT_LEN>;

impl<const N: usize> DisplayText<N> {
    pub fn new() -> Self {
        Self(heapless::String::new())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Replace the contents with formatted text, truncating at capacity.
    pub fn set(&mut self, args: fmt::Arguments<'_>) {
        self.0.clear();
        let _ = self.write_fmt(args);
    }

    fn formatted(args: fmt::Arguments<'_>) -> Self {
        let mut text = Self::new();
        text.set(args);
        text
    }
}

impl<const N: usize> Write for DisplayText<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

impl<const N: usize> fmt::Display for DisplayText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shown instead of a pace when standing still.
pub const NO_PACE: &str = "--:--/km";

/// `"1,234m"` above a kilometer, `"123m"` below. Negative values (a goal
/// lowered past zero) keep their sign in front of the grouped magnitude.
pub fn format_distance(meters: i32) -> DistanceText {
    let sign = if meters < 0 { "-" } else { "" };
    let magnitude = meters.unsigned_abs();
    let thousands = magnitude / 1000;
    let rest = magnitude % 1000;

    if thousands > 0 {
        DistanceText::formatted(format_args!("{sign}{thousands},{rest:03}m"))
    } else {
        DistanceText::formatted(format_args!("{sign}{rest}m"))
    }
}

/// Seconds needed to cover one kilometer, `None` when not moving.
pub fn pace_seconds_per_km(cm_per_s: i32) -> Option<u32> {
    if cm_per_s <= 0 {
        return None;
    }
    Some(100_000 / cm_per_s as u32)
}

pub fn format_speed(cm_per_s: i32, unit: SpeedUnit) -> SpeedText {
    let cm = cm_per_s.max(0) as u64;
    match unit {
        SpeedUnit::MetersPerSecond => {
            let m = cm / 100;
            let frac = cm % 100;
            SpeedText::formatted(format_args!("{m},{frac:02}m/s"))
        }
        SpeedUnit::KilometersPerHour => {
            // cm/s * 36 = m/h
            let m_per_h = cm * 36;
            let km = m_per_h / 1000;
            let frac = m_per_h % 1000 / 10;
            SpeedText::formatted(format_args!("{km},{frac:02}km/h"))
        }
        SpeedUnit::MinutesPerKilometer => match pace_seconds_per_km(cm_per_s) {
            Some(pace) => {
                let min = pace / 60;
                let sec = pace % 60;
                SpeedText::formatted(format_args!("{min}:{sec:02}/km"))
            }
            None => SpeedText::formatted(format_args!("{NO_PACE}")),
        },
    }
}

/// Histogram scale label.
pub fn format_steps(max_step: u16) -> StepsText {
    StepsText::formatted(format_args!("{max_step}"))
}
