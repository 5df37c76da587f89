// DistWatch - Tick Task
//
// Sends the wall-clock second to the UI task once per second, aligned to the
// second boundary, until its subscription is dropped.

use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use distwatch::config::TICK_INTERVAL_MS;
use distwatch::events::UiEvent;
use distwatch::scheduler::{Clock, SubscriptionToken, SystemClock};

pub fn tick_task(ui_tx: Sender<UiEvent>, subscription: SubscriptionToken) {
    log::info!("Tick task started");

    let period = TICK_INTERVAL_MS as i64;
    let mut last = SystemClock.now();
    while subscription.is_active() {
        let to_boundary = period - SystemClock::unix_ms().rem_euclid(period);
        thread::sleep(Duration::from_millis(to_boundary as u64));

        let now = SystemClock.now();
        if now == last {
            continue;
        }
        last = now;
        if ui_tx.send(UiEvent::Tick(now)).is_err() {
            break;
        }
    }
    log::info!("Tick task stopped");
}
