// DistWatch - Sensor Task
//
// Reads the accelerometer at 50 Hz, feeds the shared pedometer and tells the
// UI task when the step count moved. Notifications are coalesced to at most
// one per `HEALTH_NOTIFY_INTERVAL_MS`.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use distwatch::config::*;
use distwatch::events::{HealthEvent, UiEvent};
use distwatch::pedometer::Pedometer;
use distwatch::scheduler::SystemClock;

use crate::drivers::imu::Mpu6050;
use crate::drivers::SharedBus;

pub fn sensor_task(bus: SharedBus, pedometer: Arc<Mutex<Pedometer>>, ui_tx: Sender<UiEvent>) {
    log::info!("Sensor task started");

    let imu = Mpu6050::new(bus);
    if let Err(e) = imu.init() {
        log::error!("MPU6050 init failed in sensor task: {}", e);
        return;
    }

    let interval = Duration::from_millis(SENSOR_SAMPLE_INTERVAL_MS);
    let notify_interval = Duration::from_millis(HEALTH_NOTIFY_INTERVAL_MS);
    let mut pending = None;
    let mut last_notify = Instant::now();

    loop {
        let tick_start = Instant::now();

        match imu.read_accel() {
            Ok(accel) => {
                let mut p = pedometer.lock().unwrap_or_else(PoisonError::into_inner);
                let day = p.day_start();
                let stepped = p.process_sample(accel, SystemClock::unix_ms());
                if p.day_start() != day {
                    pending = Some(HealthEvent::SignificantUpdate);
                } else if stepped {
                    pending.get_or_insert(HealthEvent::MovementUpdate);
                }
            }
            Err(e) => {
                log::warn!("IMU read error: {}", e);
            }
        }

        if let Some(event) = pending {
            if last_notify.elapsed() >= notify_interval {
                if ui_tx.send(UiEvent::Health(event)).is_err() {
                    log::warn!("UI channel closed, exiting sensor task");
                    return;
                }
                pending = None;
                last_notify = Instant::now();
            }
        }

        let elapsed = tick_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}
