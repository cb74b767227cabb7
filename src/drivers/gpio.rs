// Front Panel — GPIO Level Source
//
// Front-panel buttons on plain GPIOs with the internal pull-up enabled, read
// through esp-idf-hal.

use std::collections::HashMap;

use anyhow::Context;
use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver, Pull};

use frontpanel::input::LevelSource;

#[derive(Default)]
pub struct GpioLevels {
    pins: HashMap<u32, PinDriver<'static, AnyIOPin, Input>>,
}

impl GpioLevels {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LevelSource for GpioLevels {
    fn attach(&mut self, pin: u32) -> anyhow::Result<()> {
        let gpio = i32::try_from(pin).context("GPIO number out of range")?;

        // SAFETY: button pins are claimed only here, never through
        // `Peripherals::take()`, so no other driver aliases them.
        let io = unsafe { AnyIOPin::new(gpio) };
        let mut driver = PinDriver::input(io)?;
        driver.set_pull(Pull::Up)?;

        self.pins.insert(pin, driver);
        Ok(())
    }

    fn is_high(&mut self, pin: u32) -> bool {
        // A pin we never attached reads as released.
        self.pins.get(&pin).map(|driver| driver.is_high()).unwrap_or(true)
    }
}
