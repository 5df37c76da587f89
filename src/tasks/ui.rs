// DistWatch - UI Task
//
// Owns the app, the OLED and the buttons. Polls the buttons at ~100 Hz,
// drains tick and health events from the other tasks and redraws whenever
// the app reports dirty regions.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use distwatch::app::App;
use distwatch::config::*;
use distwatch::events::UiEvent;
use distwatch::input::InputManager;
use distwatch::pedometer::Pedometer;
use distwatch::render::{Palette, WatchFace};
use distwatch::scheduler::{Clock, EventPump, Subscription, SystemClock};

use crate::drivers::buttons::Buttons;
use crate::drivers::display::Ssd1306;
use crate::tasks::haptic::HapticQueue;

pub struct UiParts {
    pub display: Ssd1306,
    pub buttons: Buttons,
    pub feedback: HapticQueue,
    pub pedometer: Arc<Mutex<Pedometer>>,
    /// Dropped with the task, which stops the tick source.
    pub tick_subscription: Subscription,
}

pub fn ui_task(parts: UiParts, face: FaceConfig, ui_rx: Receiver<UiEvent>) {
    log::info!("UI task started");

    let UiParts {
        mut display,
        buttons,
        feedback,
        pedometer,
        tick_subscription: _tick_subscription,
    } = parts;

    let mut app = App::new(face, pedometer, feedback, SystemClock);
    let mut pump = EventPump::starting_at(SystemClock.now());
    let mut input = InputManager::new(crate::now_ms());
    let palette = Palette::MONO;
    let renderer = WatchFace::new(&OLED_LAYOUT, &palette);
    let mut light_until_ms = None;

    let poll_interval = Duration::from_millis(UI_POLL_INTERVAL_MS);

    loop {
        let now_ms = crate::now_ms();

        // 1. Buttons.
        for button in input.update(buttons.read(), now_ms) {
            pump.dispatch(&mut app, UiEvent::Button(button));
        }

        // 2. Drain ticks and health notifications (non-blocking).
        loop {
            match ui_rx.try_recv() {
                Ok(event) => pump.dispatch(&mut app, event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("UI channel closed, exiting UI task");
                    return;
                }
            }
        }

        // 3. Backlight.
        if app.feedback_mut().take_light_request() {
            if let Err(e) = display.set_contrast(CONTRAST_BRIGHT) {
                log::warn!("Contrast change failed: {}", e);
            }
            light_until_ms = Some(now_ms + LIGHT_DURATION_MS);
        }
        if light_until_ms.is_some_and(|until| now_ms >= until) {
            light_until_ms = None;
            if let Err(e) = display.set_contrast(CONTRAST_DIM) {
                log::warn!("Contrast change failed: {}", e);
            }
        }

        // 4. Redraw.
        if app.take_dirty().any() {
            match renderer.draw(&app.view(), &mut display) {
                Ok(()) => {}
                Err(never) => match never {},
            }
            if let Err(e) = display.flush() {
                log::error!("Display error: {}", e);
            }
        }

        thread::sleep(poll_interval);
    }
}
