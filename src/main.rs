// DistWatch - Entry Point
//
// On the ESP32-C3 this boots the board and spawns the sensor, tick, haptic
// and UI tasks. On any other target it runs the headless simulator:
//
//   distwatch [timechart|classic] [minutes]    (see --help)

#[cfg(target_os = "espidf")]
mod drivers;
#[cfg(target_os = "espidf")]
mod tasks;

/// Milliseconds since boot.
#[cfg(target_os = "espidf")]
pub fn now_ms() -> u64 {
    // SAFETY: reads a monotonic hardware timer, no preconditions.
    unsafe { (esp_idf_sys::esp_timer_get_time() / 1000) as u64 }
}

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;
    use distwatch::cli::Args;
    use distwatch::scheduler::{Clock, SystemClock};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let face = args.face.config();
    log::info!("Simulating {} s on the {} face", args.duration_s(), face.name);
    let report = distwatch::sim::run(face, SystemClock.now(), args.duration_s(), args.goal_clicks());
    log::info!("{:#?}", report);
    Ok(())
}

#[cfg(target_os = "espidf")]
mod firmware {
    use std::sync::atomic::AtomicU32;
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    use esp_idf_hal::gpio::{IOPin, OutputPin, PinDriver};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;

    use distwatch::config::*;
    use distwatch::pedometer::Pedometer;
    use distwatch::scheduler::{Clock, Subscription, SystemClock};

    use crate::drivers::buttons::Buttons;
    use crate::drivers::display::Ssd1306;
    use crate::drivers::haptic::HapticDriver;
    use crate::drivers::imu::Mpu6050;
    use crate::drivers::SharedBus;
    use crate::tasks;
    use crate::tasks::haptic::HapticQueue;
    use crate::tasks::ui::UiParts;

    pub fn run() -> anyhow::Result<()> {
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();
        log::info!("DistWatch firmware starting");

        let peripherals = Peripherals::take()?;
        let pins = peripherals.pins;

        // ---- I2C bus (shared between OLED and MPU6050) --------------------
        let i2c_config = I2cConfig::new().baudrate(400u32.kHz().into());
        let i2c = I2cDriver::new(peripherals.i2c0, pins.gpio6, pins.gpio7, &i2c_config)?;
        let bus: SharedBus = Box::leak(Box::new(Mutex::new(i2c)));

        // ---- Self-test ----------------------------------------------------
        let mut display = Ssd1306::new(bus);
        display.init()?;
        let oled_ok = display.is_connected();
        let imu_ok = Mpu6050::new(bus).is_connected();
        if !oled_ok || !imu_ok {
            // Keep going so the serial log stays reachable.
            log::error!("Boot check FAILED, OLED:{} IMU:{}", oled_ok, imu_ok);
        }

        // ---- GPIO ---------------------------------------------------------
        let buttons = Buttons::new(
            pins.gpio2.downgrade(),
            pins.gpio3.downgrade(),
            pins.gpio5.downgrade(),
            pins.gpio20.downgrade(),
        )?;
        let haptic = HapticDriver::new(PinDriver::output(pins.gpio4.downgrade_output())?);

        // ---- Shared state and channels ------------------------------------
        let pedometer = Arc::new(Mutex::new(Pedometer::new(SystemClock.now())));
        let (ui_tx, ui_rx) = mpsc::channel();
        let (haptic_tx, haptic_rx) = mpsc::channel();
        let generation = Arc::new(AtomicU32::new(0));
        let (tick_subscription, tick_token) = Subscription::new("tick");

        // ---- Tasks --------------------------------------------------------
        let sensor_pedometer = Arc::clone(&pedometer);
        let sensor_tx = ui_tx.clone();
        thread::Builder::new()
            .name("sensor".into())
            .stack_size(STACK_SENSOR)
            .spawn(move || tasks::sensor::sensor_task(bus, sensor_pedometer, sensor_tx))?;

        thread::Builder::new()
            .name("tick".into())
            .stack_size(STACK_TICK)
            .spawn(move || tasks::tick::tick_task(ui_tx, tick_token))?;

        let haptic_generation = Arc::clone(&generation);
        thread::Builder::new()
            .name("haptic".into())
            .stack_size(STACK_HAPTIC)
            .spawn(move || tasks::haptic::haptic_task(haptic_rx, haptic, haptic_generation))?;

        let parts = UiParts {
            display,
            buttons,
            feedback: HapticQueue::new(haptic_tx, generation),
            pedometer,
            tick_subscription,
        };
        thread::Builder::new()
            .name("ui".into())
            .stack_size(STACK_UI)
            .spawn(move || tasks::ui::ui_task(parts, CLASSIC_FACE, ui_rx))?;

        log::info!("Boot complete, entering normal operation");

        // All work happens in the spawned tasks.
        loop {
            thread::sleep(Duration::from_secs(60));
        }
    }
}
