// DistWatch - Walking distance watch face
//
// Hardware independent core: session tracking, speed estimation, haptic
// alerts, the step histogram and face rendering. The firmware binary wires it
// to the ESP32-C3 peripherals; the host binary runs it against a simulated walk.

pub mod app;
#[cfg(not(target_os = "espidf"))]
pub mod cli;
pub mod config;
pub mod events;
pub mod format;
pub mod haptic;
pub mod health;
pub mod histogram;
pub mod input;
pub mod pedometer;
pub mod render;
pub mod ring;
pub mod scheduler;
pub mod session;
pub mod sim;
pub mod speed;
pub mod tracker;

pub use app::{App, Dirty};
pub use config::{FaceConfig, CLASSIC_FACE, TIMECHART_FACE};
pub use events::{Button, HealthEvent, UiEvent};
pub use scheduler::{EventPump, Scheduler};
