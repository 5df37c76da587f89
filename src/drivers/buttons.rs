// DistWatch - Button GPIO
//
// The four watch buttons, active LOW with internal pull-ups.

use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver, Pull};

pub struct Buttons {
    /// Indexed by `Button::index`.
    pins: [PinDriver<'static, AnyIOPin, Input>; 4],
}

impl Buttons {
    pub fn new(back: AnyIOPin, up: AnyIOPin, select: AnyIOPin, down: AnyIOPin) -> anyhow::Result<Self> {
        let input = |pin: AnyIOPin| -> anyhow::Result<PinDriver<'static, AnyIOPin, Input>> {
            let mut driver = PinDriver::input(pin)?;
            driver.set_pull(Pull::Up)?;
            Ok(driver)
        };
        Ok(Self {
            pins: [input(back)?, input(up)?, input(select)?, input(down)?],
        })
    }

    /// Raw pressed state of every button.
    pub fn read(&self) -> [bool; 4] {
        [0, 1, 2, 3].map(|i| self.pins[i].is_low())
    }
}
