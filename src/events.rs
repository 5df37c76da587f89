// DistWatch - System Events & Data Types

// ---------------------------------------------------------------------------
// Buttons
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Backlight.
    Back,
    /// Raise the goal (repeats while held).
    Up,
    /// Start / reset the session.
    Select,
    /// Lower the goal (repeats while held).
    Down,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::Back, Button::Up, Button::Select, Button::Down];

    pub fn index(self) -> usize {
        match self {
            Self::Back => 0,
            Self::Up => 1,
            Self::Select => 2,
            Self::Down => 3,
        }
    }

    /// Whether holding the button keeps firing clicks.
    pub fn repeats(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

// ---------------------------------------------------------------------------
// Health service notifications
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthEvent {
    /// Step / distance counters moved.
    MovementUpdate,
    /// Day rollover or bulk history change.
    SignificantUpdate,
    /// Sleep data changed; the distance tracker ignores it.
    SleepUpdate,
}

// ---------------------------------------------------------------------------
// UI Events, sent to the UI task via channel
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// Wall-clock tick, unix seconds.
    Tick(i64),
    /// Health data changed.
    Health(HealthEvent),
    /// Debounced button click (including hold repeats).
    Button(Button),
}
