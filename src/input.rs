// DistWatch - Button Input Manager
//
// Debounced handler for the four watch buttons. Up and Down fire on press and
// keep firing every `REPEAT_INTERVAL_MS` while held; Select and Back fire once,
// on release. Designed to be polled at ~100 Hz from the UI task with the raw
// pressed state of each button.

use heapless::Vec;

use crate::config::*;
use crate::events::Button;

/// Clicks produced by a single poll; at most one per button.
pub type Clicks = Vec<Button, 4>;

#[derive(Debug, Clone, Copy)]
struct ButtonState {
    // Debounce state
    last_raw: bool,
    last_change_ms: u64,

    // Press tracking
    down: bool,
    next_repeat_ms: u64,
}

impl ButtonState {
    fn new(now_ms: u64) -> Self {
        Self {
            last_raw: false,
            last_change_ms: now_ms,
            down: false,
            next_repeat_ms: 0,
        }
    }
}

pub struct InputManager {
    buttons: [ButtonState; 4],
}

impl InputManager {
    pub fn new(now_ms: u64) -> Self {
        Self {
            buttons: [ButtonState::new(now_ms); 4],
        }
    }

    /// Feed the raw pressed state of every button, indexed by
    /// [`Button::index`], and collect the clicks it produces.
    pub fn update(&mut self, pressed: [bool; 4], now_ms: u64) -> Clicks {
        let mut clicks = Clicks::new();
        for button in Button::ALL {
            if let Some(click) = self.update_button(button, pressed[button.index()], now_ms) {
                // One slot per button, cannot overflow.
                let _ = clicks.push(click);
            }
        }
        clicks
    }

    fn update_button(&mut self, button: Button, raw: bool, now_ms: u64) -> Option<Button> {
        let state = &mut self.buttons[button.index()];

        // ---- debounce filter ----
        if raw != state.last_raw {
            state.last_change_ms = now_ms;
            state.last_raw = raw;
        }
        if now_ms.saturating_sub(state.last_change_ms) < DEBOUNCE_MS {
            return None;
        }

        // ---- pressed edge ----
        if raw && !state.down {
            state.down = true;
            if button.repeats() {
                state.next_repeat_ms = now_ms + REPEAT_INTERVAL_MS;
                return Some(button);
            }
            return None;
        }

        // ---- held: repeat ----
        if raw && state.down {
            if button.repeats() && now_ms >= state.next_repeat_ms {
                state.next_repeat_ms += REPEAT_INTERVAL_MS;
                return Some(button);
            }
            return None;
        }

        // ---- released edge ----
        if !raw && state.down {
            state.down = false;
            if !button.repeats() {
                return Some(button);
            }
        }
        None
    }
}
