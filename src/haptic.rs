// DistWatch - Haptic Feedback
//
// Alerts are decided by the tracker and handed to a `Feedback` sink as
// vibration commands. Playback is fire-and-forget.

/// Alternating on/off durations (ms) buzzed when the goal is reached.
pub const GOAL_PATTERN: [u32; 15] = [
    200, 100, 400, 800,
    200, 100, 400, 800,
    200, 100, 400, 800,
    200, 100, 400,
];

/// The stock short double pulse.
pub const DOUBLE_PULSE: [u32; 3] = [100, 100, 100];

/// How many times the goal pattern is queued back to back.
pub const GOAL_PATTERN_REPEATS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticAlert {
    /// Session delta crossed the goal upwards.
    GoalReached,
    /// Session delta crossed a whole kilometer.
    Kilometer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticCommand {
    DoublePulse,
    /// Custom pattern: on, off, on, ... durations in milliseconds.
    Pattern(&'static [u32]),
}

impl HapticCommand {
    pub fn segments(&self) -> &'static [u32] {
        match self {
            Self::DoublePulse => &DOUBLE_PULSE,
            Self::Pattern(segments) => segments,
        }
    }

    /// Total playback time in milliseconds.
    pub fn duration_ms(&self) -> u32 {
        self.segments().iter().sum()
    }
}

impl HapticAlert {
    /// The commands to enqueue, in order.
    pub fn commands(self) -> impl Iterator<Item = HapticCommand> {
        let (command, count) = match self {
            Self::GoalReached => (HapticCommand::Pattern(&GOAL_PATTERN), GOAL_PATTERN_REPEATS),
            Self::Kilometer => (HapticCommand::DoublePulse, 1),
        };
        core::iter::repeat(command).take(count)
    }
}

/// Output side of the watch: vibration motor and backlight.
pub trait Feedback {
    /// Queue a vibration behind anything already playing.
    fn vibrate(&mut self, command: HapticCommand);

    /// Drop the current and queued vibrations.
    fn cancel_vibration(&mut self);

    /// Wake the backlight for a moment. Devices without one ignore it.
    fn light_interaction(&mut self) {}

    fn alert(&mut self, alert: HapticAlert) {
        for command in alert.commands() {
            self.vibrate(command);
        }
    }
}

impl<F: Feedback + ?Sized> Feedback for &mut F {
    fn vibrate(&mut self, command: HapticCommand) {
        (**self).vibrate(command)
    }

    fn cancel_vibration(&mut self) {
        (**self).cancel_vibration()
    }

    fn light_interaction(&mut self) {
        (**self).light_interaction()
    }
}

/// Feedback sink that only writes to the log; used by the simulator.
#[derive(Debug, Default)]
pub struct LogFeedback {
    pub vibrations: usize,
}

impl Feedback for LogFeedback {
    fn vibrate(&mut self, command: HapticCommand) {
        self.vibrations += 1;
        log::info!("bzzz {:?} ({} ms)", command, command.duration_ms());
    }

    fn cancel_vibration(&mut self) {
        log::debug!("vibration cancelled");
    }

    fn light_interaction(&mut self) {
        log::info!("backlight on");
    }
}
