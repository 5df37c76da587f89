// DistWatch - Haptic Motor Driver
//
// GPIO-driven vibration motor playing on/off patterns.

use std::thread;
use std::time::Duration;

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};

use crate::config::HAPTIC_CANCEL_POLL_MS;

pub struct HapticDriver<'d> {
    pin: PinDriver<'d, AnyOutputPin, Output>,
}

impl<'d> HapticDriver<'d> {
    pub fn new(pin: PinDriver<'d, AnyOutputPin, Output>) -> Self {
        Self { pin }
    }

    /// Play alternating on/off `segments` (ms), blocking the calling thread.
    /// Stops early, motor off, as soon as `cancelled` returns true.
    pub fn play(&mut self, segments: &[u32], cancelled: impl Fn() -> bool) {
        for (i, &ms) in segments.iter().enumerate() {
            let on = i % 2 == 0;
            let _ = if on { self.pin.set_high() } else { self.pin.set_low() };

            let mut left = u64::from(ms);
            while left > 0 {
                if cancelled() {
                    let _ = self.pin.set_low();
                    return;
                }
                let slice = left.min(HAPTIC_CANCEL_POLL_MS);
                thread::sleep(Duration::from_millis(slice));
                left -= slice;
            }
        }
        let _ = self.pin.set_low();
    }
}
