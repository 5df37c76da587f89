// DistWatch - MPU6050 IMU Driver
//
// Register-level driver over the shared I2C bus. Only the accelerometer is
// used; the pedometer works on acceleration magnitude.

use std::sync::PoisonError;

use crate::config::*;
use crate::drivers::SharedBus;

// MPU6050 register addresses
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_CONFIG: u8 = 0x1A;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT_H: u8 = 0x3B; // Start of the 6-byte accel burst
const REG_WHO_AM_I: u8 = 0x75;
const WHO_AM_I_EXPECTED: u8 = 0x68;

pub struct Mpu6050 {
    bus: SharedBus,
}

impl Mpu6050 {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    /// Verify the device is reachable on the I2C bus.
    pub fn is_connected(&self) -> bool {
        let mut bus = self.bus.lock().unwrap_or_else(PoisonError::into_inner);
        let mut buf = [0u8; 1];
        match bus.write_read(I2C_ADDR_MPU6050, &[REG_WHO_AM_I], &mut buf, I2C_TIMEOUT_TICKS) {
            Ok(()) => buf[0] == WHO_AM_I_EXPECTED,
            Err(_) => false,
        }
    }

    /// Wake the sensor and configure the accelerometer for +/-8 g, DLPF 21 Hz.
    pub fn init(&self) -> anyhow::Result<()> {
        let mut bus = self.bus.lock().unwrap_or_else(PoisonError::into_inner);

        // Wake up (clear SLEEP bit)
        bus.write(I2C_ADDR_MPU6050, &[REG_PWR_MGMT_1, 0x00], I2C_TIMEOUT_TICKS)?;

        // DLPF bandwidth 21 Hz, well above walking cadence
        bus.write(I2C_ADDR_MPU6050, &[REG_CONFIG, 0x04], I2C_TIMEOUT_TICKS)?;

        bus.write(I2C_ADDR_MPU6050, &[REG_ACCEL_CONFIG, 0x10], I2C_TIMEOUT_TICKS)?;

        log::info!("MPU6050 initialised (+/-8g, DLPF 21Hz)");
        Ok(())
    }

    /// Burst-read the three accelerometer axes, in g.
    pub fn read_accel(&self) -> anyhow::Result<[f32; 3]> {
        let mut bus = self.bus.lock().unwrap_or_else(PoisonError::into_inner);
        let mut raw = [0u8; 6];
        bus.write_read(I2C_ADDR_MPU6050, &[REG_ACCEL_XOUT_H], &mut raw, I2C_TIMEOUT_TICKS)?;

        let axis = |hi: usize| i16::from_be_bytes([raw[hi], raw[hi + 1]]) as f32 / ACCEL_SCALE_8G;
        Ok([axis(0), axis(2), axis(4)])
    }
}
