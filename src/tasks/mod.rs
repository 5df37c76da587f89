// DistWatch - FreeRTOS tasks (one std::thread each)

pub mod haptic;
pub mod sensor;
pub mod tick;
pub mod ui;
