// DistWatch - Haptic Task
//
// Plays queued vibration commands one after another. Cancelling bumps a
// generation counter: the command playing stops and everything queued under
// an older generation is skipped.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use distwatch::haptic::{Feedback, HapticCommand};

use crate::drivers::haptic::HapticDriver;

pub struct HapticRequest {
    generation: u32,
    command: HapticCommand,
}

/// `Feedback` for the UI task: vibrations go to the haptic task, backlight
/// requests are picked up by the UI loop.
pub struct HapticQueue {
    tx: Sender<HapticRequest>,
    generation: Arc<AtomicU32>,
    light_requested: bool,
}

impl HapticQueue {
    pub fn new(tx: Sender<HapticRequest>, generation: Arc<AtomicU32>) -> Self {
        Self {
            tx,
            generation,
            light_requested: false,
        }
    }

    pub fn take_light_request(&mut self) -> bool {
        core::mem::take(&mut self.light_requested)
    }
}

impl Feedback for HapticQueue {
    fn vibrate(&mut self, command: HapticCommand) {
        let request = HapticRequest {
            generation: self.generation.load(Ordering::SeqCst),
            command,
        };
        if self.tx.send(request).is_err() {
            log::warn!("Haptic task gone, dropping {:?}", command);
        }
    }

    fn cancel_vibration(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn light_interaction(&mut self) {
        self.light_requested = true;
    }
}

pub fn haptic_task(rx: Receiver<HapticRequest>, mut driver: HapticDriver<'static>, generation: Arc<AtomicU32>) {
    log::info!("Haptic task started");

    for request in rx {
        let stale = || generation.load(Ordering::SeqCst) != request.generation;
        if stale() {
            continue;
        }
        driver.play(request.command.segments(), stale);
    }
    log::warn!("Haptic channel closed, exiting haptic task");
}
