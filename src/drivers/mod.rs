// DistWatch - Board drivers (ESP32-C3 only)

use std::sync::Mutex;

use esp_idf_hal::i2c::I2cDriver;

pub mod buttons;
pub mod display;
pub mod haptic;
pub mod imu;

/// Thread-safe handle to the I2C bus shared by the OLED and the IMU.
pub type SharedBus = &'static Mutex<I2cDriver<'static>>;
