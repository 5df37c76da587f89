// DistWatch - Headless Simulator
//
// Runs the watch against a synthetic walk in simulated time: accelerometer
// readings go through the real pedometer, ticks and health notifications go
// through the real event pump, and every dirty frame is drawn into an
// in-memory frame buffer.

use std::cell::Cell;
use std::f32::consts::TAU;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use embedded_graphics::pixelcolor::Rgb888;

use crate::app::App;
use crate::config::*;
use crate::events::{Button, HealthEvent, UiEvent};
use crate::haptic::LogFeedback;
use crate::pedometer::Pedometer;
use crate::render::{Framebuffer, Palette, WatchFace};
use crate::scheduler::EventPump;

/// Accelerometer model of a walk: a sinusoid around 1 g, one peak per step.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedWalk {
    pub cadence_steps_per_min: u32,
    pub amplitude_g: f32,
}

impl Default for SimulatedWalk {
    fn default() -> Self {
        Self {
            cadence_steps_per_min: SIM_CADENCE_STEPS_PER_MIN,
            amplitude_g: 0.4,
        }
    }
}

impl SimulatedWalk {
    pub fn accel_at(&self, t_ms: i64) -> [f32; 3] {
        // f64 keeps sub-millisecond resolution at unix-epoch timestamps.
        let cycles = t_ms as f64 / 1000.0 * f64::from(self.cadence_steps_per_min) / 60.0;
        let phase = cycles.fract() as f32 * TAU;
        [0.0, 0.0, 1.0 + self.amplitude_g * phase.sin()]
    }

    /// Walking for six minutes, resting for one, repeating.
    pub fn is_walking(elapsed_s: i64) -> bool {
        elapsed_s.rem_euclid(7 * 60) < 6 * 60
    }
}

/// What a simulation run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimReport {
    pub steps: u32,
    pub distance_text: String,
    pub speed_text: String,
    pub goal: i32,
    pub goal_reached: bool,
    pub vibrations: usize,
    pub frames: usize,
}

/// Simulate `duration_s` seconds starting at unix time `start`, with the goal
/// raised by `goal_clicks` Up presses right after boot.
pub fn run(face: FaceConfig, start: i64, duration_s: i64, goal_clicks: u32) -> SimReport {
    let clock = Rc::new(Cell::new(start));
    let pedometer = Arc::new(Mutex::new(Pedometer::new(start)));
    let walk = SimulatedWalk::default();

    let now = {
        let clock = Rc::clone(&clock);
        move || clock.get()
    };
    let mut app = App::new(face, Arc::clone(&pedometer), LogFeedback::default(), now);
    let mut pump = EventPump::starting_at(start);

    let palette = Palette::COLOR;
    let renderer = WatchFace::new(&WRIST_LAYOUT, &palette);
    let mut frame = Framebuffer::new(WRIST_LAYOUT.size, Rgb888::new(0, 0, 0));
    let mut frames = 0;

    for _ in 0..goal_clicks {
        pump.dispatch(&mut app, UiEvent::Button(Button::Up));
    }

    let samples_per_second = 1000 / SENSOR_SAMPLE_INTERVAL_MS as i64;
    for elapsed in 1..=duration_s {
        let second = start + elapsed;
        clock.set(second);

        // Sensor side: one second of accelerometer readings.
        let mut stepped = false;
        if SimulatedWalk::is_walking(elapsed) {
            let mut p = pedometer.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            for i in 0..samples_per_second {
                let t_ms = (second - 1) * 1000 + i * SENSOR_SAMPLE_INTERVAL_MS as i64;
                stepped |= p.process_sample(walk.accel_at(t_ms), t_ms);
            }
        }

        // UI side.
        if stepped {
            pump.dispatch(&mut app, UiEvent::Health(HealthEvent::MovementUpdate));
        }
        pump.dispatch(&mut app, UiEvent::Tick(second));

        if app.take_dirty().any() {
            match renderer.draw(&app.view(), &mut frame) {
                Ok(()) => frames += 1,
                Err(never) => match never {},
            }
        }

        if elapsed % 60 == 0 {
            log::info!(
                "[{:>3} min] {} {} goal {} m",
                elapsed / 60,
                app.distance_text(),
                app.speed_text(),
                app.session().distance_goal
            );
        }
    }

    let steps = pedometer
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .steps_today();
    SimReport {
        steps,
        distance_text: app.distance_text().to_string(),
        speed_text: app.speed_text().to_string(),
        goal: app.session().distance_goal,
        goal_reached: app.session().goal_achieved(),
        vibrations: app.feedback().vibrations,
        frames,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_model_crosses_threshold_once_per_step() {
        let walk = SimulatedWalk::default();
        let mut p = Pedometer::new(0);
        for i in 0..(60 * 50) {
            let t_ms = i * 20;
            p.process_sample(walk.accel_at(t_ms), t_ms);
        }
        let steps = p.steps_today();
        assert!((108..=111).contains(&steps), "{steps} steps in a minute");
    }

    #[test]
    fn rest_periods() {
        assert!(SimulatedWalk::is_walking(0));
        assert!(SimulatedWalk::is_walking(359));
        assert!(!SimulatedWalk::is_walking(360));
        assert!(SimulatedWalk::is_walking(420));
    }
}
