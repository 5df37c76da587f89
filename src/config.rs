// DistWatch - Hardware & System Configuration
// Firmware target: Seeed Studio Xiao ESP32-C3 (RISC-V), host target: simulator

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_9X15};
use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::speed::SpeedUnit;

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout, all buttons INPUT_PULLUP)
// ---------------------------------------------------------------------------
pub const PIN_BUTTON_BACK: i32 = 2;   // D0: back / backlight
pub const PIN_BUTTON_UP: i32 = 3;     // D1: goal up
pub const PIN_BUTTON_SELECT: i32 = 5; // D3: start / reset session
pub const PIN_BUTTON_DOWN: i32 = 20;  // D7: goal down
pub const PIN_HAPTIC: i32 = 4;        // D2: haptic motor control
pub const PIN_I2C_SDA: i32 = 6;       // D4: I2C data line
pub const PIN_I2C_SCL: i32 = 7;       // D5: I2C clock line

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_MPU6050: u8 = 0x68;
pub const I2C_ADDR_OLED: u8 = 0x3C;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Display (SSD1306 OLED)
// ---------------------------------------------------------------------------
pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;
pub const DISPLAY_BUFFER_SIZE: usize = (SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize) / 8; // 1024

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_SENSOR: usize = 4096;
pub const STACK_TICK: usize = 3072;
pub const STACK_HAPTIC: usize = 3072;
pub const STACK_UI: usize = 8192;

// ---------------------------------------------------------------------------
// Timing (milliseconds unless noted)
// ---------------------------------------------------------------------------
pub const SENSOR_SAMPLE_INTERVAL_MS: u64 = 20;  // 50 Hz
pub const UI_POLL_INTERVAL_MS: u64 = 10;        // 100 Hz input poll
pub const TICK_INTERVAL_MS: u64 = 1000;         // 1 Hz tick source
pub const DEBOUNCE_MS: u64 = 50;
pub const REPEAT_INTERVAL_MS: u64 = 100;        // Up/Down repeat-on-hold
pub const HEALTH_NOTIFY_INTERVAL_MS: u64 = 1000; // Coalesce step notifications
pub const LIGHT_DURATION_MS: u64 = 3000;        // Back button "backlight"
pub const HAPTIC_CANCEL_POLL_MS: u64 = 10;

// ---------------------------------------------------------------------------
// OLED contrast, standing in for a backlight
// ---------------------------------------------------------------------------
pub const CONTRAST_DIM: u8 = 0x20;
pub const CONTRAST_BRIGHT: u8 = 0xFF;

// ---------------------------------------------------------------------------
// Distance / speed tracking
// ---------------------------------------------------------------------------
pub const METERS_PER_KILOMETER: i32 = 1000;
pub const SPEED_IDLE_TIMEOUT_S: i64 = 10;       // Speed decays to 0 after this
pub const UNIT_ROTATION_PERIOD_S: u8 = 3;       // Seconds each speed unit stays up
pub const TZ_OFFSET_MINUTES: i32 = 0;           // Wearer's local time minus UTC

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------
pub const HISTORY_MINUTES: usize = 60;
pub const HISTORY_WINDOW_S: i64 = 60 * 60;
pub const MIN_HISTOGRAM_SCALE: u16 = 50;
pub const HISTOGRAM_SCALE_ROUNDING: u16 = 10;

// ---------------------------------------------------------------------------
// Display text capacities (characters)
// ---------------------------------------------------------------------------
pub const DISTANCE_TEXT_LEN: usize = 7;
pub const SPEED_TEXT_LEN: usize = 15;
pub const STEPS_TEXT_LEN: usize = 3;

// ---------------------------------------------------------------------------
// Pedometer
// ---------------------------------------------------------------------------
pub const STEP_THRESHOLD_G: f32 = 1.2;          // |a| rising through this = step
pub const MIN_STEP_INTERVAL_MS: u64 = 250;      // Max ~4 steps/sec
pub const STRIDE_CM: u32 = 70;                  // Average adult walking stride

// ---------------------------------------------------------------------------
// MPU6050 Sensor Scale Factors
// ---------------------------------------------------------------------------
pub const ACCEL_SCALE_8G: f32 = 4096.0;   // LSB/g  at ±8 g

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------
pub const SIM_DURATION_S: i64 = 20 * 60;
pub const SIM_CADENCE_STEPS_PER_MIN: u32 = 110;

// ---------------------------------------------------------------------------
// Face variants
// ---------------------------------------------------------------------------

/// Behavioural differences between the two watch faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceConfig {
    pub name: &'static str,
    /// Meters added/removed from the goal per Up/Down click.
    pub goal_step: i32,
    /// Ring start and end angle in degrees, 0° at twelve o'clock, clockwise.
    pub sweep_deg: (i32, i32),
    pub histogram: bool,
    /// Speed units cycled through on the face, in display order.
    pub units: &'static [SpeedUnit],
}

impl FaceConfig {
    pub fn sweep_span(&self) -> i32 {
        self.sweep_deg.1 - self.sweep_deg.0
    }
}

pub const TIMECHART_FACE: FaceConfig = FaceConfig {
    name: "timechart",
    goal_step: 100,
    sweep_deg: (-120, 120),
    histogram: true,
    units: &[SpeedUnit::KilometersPerHour, SpeedUnit::MinutesPerKilometer],
};

pub const CLASSIC_FACE: FaceConfig = FaceConfig {
    name: "classic",
    goal_step: 500,
    sweep_deg: (0, 360),
    histogram: false,
    units: &[
        SpeedUnit::KilometersPerHour,
        SpeedUnit::MinutesPerKilometer,
        SpeedUnit::MetersPerSecond,
    ],
};

// ---------------------------------------------------------------------------
// Layouts
// ---------------------------------------------------------------------------

/// Pixel geometry of the face for one screen size.
#[derive(Debug, Clone, Copy)]
pub struct FaceLayout {
    pub size: Size,
    pub ring_inset: u32,
    pub ring_width: u32,
    pub dots_inset: u32,
    pub dot_count: u32,
    pub dot_diameter: u32,
    /// Top-centre anchor of the distance text.
    pub distance_text: Point,
    pub distance_font: &'static MonoFont<'static>,
    /// Top-centre anchor of the speed text.
    pub speed_text: Point,
    pub speed_font: &'static MonoFont<'static>,
    /// Step chart area; `None` when the screen has no room for it.
    pub chart: Option<Rectangle>,
    /// Top-right anchor of the chart scale label.
    pub chart_label: Point,
    pub chart_label_font: &'static MonoFont<'static>,
    pub bar_pitch: u32,
}

/// 144x168 colour face.
pub const WRIST_LAYOUT: FaceLayout = FaceLayout {
    size: Size::new(144, 168),
    ring_inset: 2,
    ring_width: 12,
    dots_inset: 6,
    dot_count: 12,
    dot_diameter: 5,
    distance_text: Point::new(72, 78),
    distance_font: &FONT_10X20,
    speed_text: Point::new(72, 54),
    speed_font: &FONT_9X15,
    chart: Some(Rectangle::new(Point::new(18, 168 - 38), Size::new(120, 38))),
    chart_label: Point::new(17, 125),
    chart_label_font: &FONT_6X10,
    bar_pitch: 2,
};

/// 128x64 monochrome OLED face.
pub const OLED_LAYOUT: FaceLayout = FaceLayout {
    size: Size::new(SCREEN_WIDTH, SCREEN_HEIGHT),
    ring_inset: 0,
    ring_width: 4,
    dots_inset: 2,
    dot_count: 12,
    dot_diameter: 3,
    distance_text: Point::new(64, 34),
    distance_font: &FONT_6X10,
    speed_text: Point::new(64, 20),
    speed_font: &FONT_6X10,
    chart: None,
    chart_label: Point::new(0, 0),
    chart_label_font: &FONT_6X10,
    bar_pitch: 2,
};

/// Height of the chart in pixels for the given layout, 0 without a chart.
pub fn chart_height(layout: &FaceLayout) -> u32 {
    layout.chart.map(|c| c.size.height).unwrap_or(0)
}
