// DistWatch - Tick Scheduler
//
// Turns the raw event stream (wall-clock seconds, health notifications, button
// clicks) into calls on a `Scheduler`. The firmware and the simulator both
// feed `UiEvent`s through an `EventPump`; the app never sees the event source.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::events::{Button, HealthEvent, UiEvent};

/// One 1 Hz tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Unix seconds.
    pub now: i64,
    /// Second of the minute, 0..=59.
    pub second: u8,
    /// A minute boundary passed since the previous tick.
    pub minute_changed: bool,
}

/// Derives ticks from wall-clock seconds.
#[derive(Debug, Clone)]
pub struct Ticker {
    last_minute: i64,
}

impl Ticker {
    /// Start counting minutes from `now`; the minute containing `now` is not
    /// reported as changed.
    pub fn starting_at(now: i64) -> Self {
        Self {
            last_minute: now.div_euclid(60),
        }
    }

    pub fn tick(&mut self, now: i64) -> Tick {
        let minute = now.div_euclid(60);
        let minute_changed = minute != self.last_minute;
        self.last_minute = minute;
        Tick {
            now,
            second: now.rem_euclid(60) as u8,
            minute_changed,
        }
    }
}

/// Wall-clock source, unix seconds.
pub trait Clock {
    fn now(&self) -> i64;
}

/// The system real-time clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Unix milliseconds, for sensor timestamps.
    pub fn unix_ms() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Self::unix_ms().div_euclid(1000)
    }
}

impl<F: Fn() -> i64> Clock for F {
    fn now(&self) -> i64 {
        self()
    }
}

/// The three inputs that drive the watch.
pub trait Scheduler {
    fn on_tick(&mut self, tick: Tick);
    fn on_health_event(&mut self, event: HealthEvent);
    fn on_input(&mut self, button: Button);
}

/// Routes `UiEvent`s to a `Scheduler`, turning raw seconds into ticks.
#[derive(Debug, Clone)]
pub struct EventPump {
    ticker: Ticker,
}

impl EventPump {
    pub fn starting_at(now: i64) -> Self {
        Self {
            ticker: Ticker::starting_at(now),
        }
    }

    pub fn dispatch<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S, event: UiEvent) {
        match event {
            UiEvent::Tick(now) => scheduler.on_tick(self.ticker.tick(now)),
            UiEvent::Health(kind) => scheduler.on_health_event(kind),
            UiEvent::Button(button) => scheduler.on_input(button),
        }
    }
}

/// Keeps an event source running for as long as it is held. Sources poll
/// [`Subscription::is_active`] through their [`SubscriptionToken`] and stop
/// once the subscription is dropped.
#[derive(Debug)]
pub struct Subscription {
    name: &'static str,
    active: Arc<AtomicBool>,
}

#[derive(Debug, Clone)]
pub struct SubscriptionToken(Arc<AtomicBool>);

impl Subscription {
    pub fn new(name: &'static str) -> (Self, SubscriptionToken) {
        let active = Arc::new(AtomicBool::new(true));
        let token = SubscriptionToken(Arc::clone(&active));
        (Self { name, active }, token)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl SubscriptionToken {
    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        log::debug!("{} unsubscribed", self.name);
    }
}
