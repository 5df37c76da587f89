// DistWatch - Application
//
// Owns the session and the display state, and reacts to ticks, health
// notifications and button clicks. Output goes two ways: vibrations straight
// to the `Feedback` sink, and dirty flags the host loop polls before redrawing.

use crate::config::{FaceConfig, TZ_OFFSET_MINUTES};
use crate::events::{Button, HealthEvent};
use crate::format::{format_distance, format_speed, format_steps, DistanceText, SpeedText, StepsText};
use crate::haptic::Feedback;
use crate::health::{start_of_day, HealthMetric, HealthSource};
use crate::histogram::StepHistogram;
use crate::render::FaceView;
use crate::ring::RingState;
use crate::scheduler::{Clock, Scheduler, Tick};
use crate::session::Session;
use crate::speed::{is_speed_tick, unit_for_second, SpeedUnit};

/// Face regions that need redrawing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dirty {
    pub ring: bool,
    pub distance: bool,
    pub speed: bool,
    pub timechart: bool,
}

impl Dirty {
    pub const ALL: Self = Self {
        ring: true,
        distance: true,
        speed: true,
        timechart: true,
    };

    pub fn any(&self) -> bool {
        self.ring || self.distance || self.speed || self.timechart
    }
}

pub struct App<H, F, C> {
    face: FaceConfig,
    health: H,
    feedback: F,
    clock: C,
    session: Session,
    histogram: Option<StepHistogram>,
    /// Walked distance was readable at startup; otherwise health events are
    /// ignored and the distance stays at zero.
    tracking: bool,
    distance_text: DistanceText,
    speed_text: SpeedText,
    steps_text: StepsText,
    dirty: Dirty,
}

impl<H: HealthSource, F: Feedback, C: Clock> App<H, F, C> {
    pub fn new(face: FaceConfig, health: H, feedback: F, clock: C) -> Self {
        let now = clock.now();
        let tracking = health.metric_accessible(
            HealthMetric::WalkedDistanceMeters,
            start_of_day(now, TZ_OFFSET_MINUTES),
            now,
        );
        if tracking {
            log::info!("Walked distance available, tracking on the {} face", face.name);
        } else {
            log::warn!("Walked distance not accessible, distance will stay at zero");
        }

        let mut app = Self {
            face,
            health,
            feedback,
            clock,
            session: Session::new(),
            histogram: face.histogram.then(StepHistogram::new),
            tracking,
            distance_text: format_distance(0),
            speed_text: SpeedText::new(),
            steps_text: StepsText::new(),
            dirty: Dirty::ALL,
        };

        let baseline = app.cumulative_distance();
        app.session.start_session(baseline);
        app.session.reset_speed(now);
        app.show_speed(SpeedUnit::KilometersPerHour);
        app.refresh_histogram(now);
        app
    }

    fn cumulative_distance(&self) -> i32 {
        if self.tracking {
            self.health.sum_today(HealthMetric::WalkedDistanceMeters)
        } else {
            0
        }
    }

    /// Pull the current distance, buzz for any crossing, re-estimate speed.
    fn sample_distance(&mut self, now: i64) {
        let cumulative = self.cumulative_distance();
        if let Some(alert) = self.session.sample(cumulative, now) {
            self.feedback.alert(alert);
        }
        self.session.update_speed(now);
    }

    fn show_distance(&mut self, meters: i32) {
        self.distance_text = format_distance(meters);
        self.dirty.distance = true;
    }

    fn show_speed(&mut self, unit: SpeedUnit) {
        self.speed_text = format_speed(self.session.speed, unit);
        self.dirty.speed = true;
    }

    fn refresh_histogram(&mut self, now: i64) {
        if let Some(histogram) = self.histogram.as_mut() {
            histogram.refresh(now, &self.health);
            self.steps_text = format_steps(histogram.max_step());
            self.dirty.timechart = true;
        }
    }

    fn change_goal(&mut self, delta: i32) {
        self.session.adjust_goal(delta);
        log::debug!("Goal now {} m", self.session.distance_goal);
        self.show_distance(self.session.distance_goal);
        self.dirty.ring = true;
        self.feedback.cancel_vibration();
    }

    /// Start a fresh session from the current distance.
    fn restart(&mut self) {
        let now = self.clock.now();
        let baseline = self.cumulative_distance();
        self.session.start_session(baseline);
        self.sample_distance(now);
        self.show_distance(self.session.delta());
        self.session.reset_speed(now);
        self.show_speed(SpeedUnit::KilometersPerHour);
        self.dirty.ring = true;
        self.feedback.cancel_vibration();
        log::info!("Session restarted at {} m", baseline);
    }

    pub fn face(&self) -> &FaceConfig {
        &self.face
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn ring_state(&self) -> RingState {
        RingState::classify(self.session.delta(), self.session.distance_goal, self.face.sweep_deg)
    }

    pub fn distance_text(&self) -> &str {
        self.distance_text.as_str()
    }

    pub fn speed_text(&self) -> &str {
        self.speed_text.as_str()
    }

    pub fn steps_text(&self) -> &str {
        self.steps_text.as_str()
    }

    pub fn histogram(&self) -> Option<&StepHistogram> {
        self.histogram.as_ref()
    }

    pub fn health(&self) -> &H {
        &self.health
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }

    /// Snapshot for the renderer.
    pub fn view(&self) -> FaceView<'_> {
        FaceView {
            ring: self.ring_state(),
            sweep_deg: self.face.sweep_deg,
            distance: self.distance_text(),
            speed: self.speed_text(),
            chart_label: self.steps_text(),
            histogram: self.histogram(),
        }
    }

    /// Regions changed since the last call.
    pub fn take_dirty(&mut self) -> Dirty {
        core::mem::take(&mut self.dirty)
    }
}

impl<H: HealthSource, F: Feedback, C: Clock> Scheduler for App<H, F, C> {
    fn on_tick(&mut self, tick: Tick) {
        if tick.minute_changed {
            self.refresh_histogram(tick.now);
        }

        if is_speed_tick(tick.second) {
            self.session.decay_if_idle(tick.now);
            let unit = unit_for_second(tick.second, self.face.units);
            self.show_speed(unit);
        }
    }

    fn on_health_event(&mut self, event: HealthEvent) {
        if !self.tracking || event == HealthEvent::SleepUpdate {
            return;
        }
        let now = self.clock.now();
        self.sample_distance(now);
        self.show_distance(self.session.delta());
        self.dirty.ring = true;
    }

    fn on_input(&mut self, button: Button) {
        match button {
            Button::Up => self.change_goal(self.face.goal_step),
            Button::Down => self.change_goal(-self.face.goal_step),
            Button::Select => self.restart(),
            Button::Back => self.feedback.light_interaction(),
        }
    }
}
