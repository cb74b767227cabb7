// Front Panel — Panel Task
//
// Polls the front panel from the firmware main loop and forwards whatever it
// resolves to the control logic.

use esp_idf_hal::delay::FreeRtos;

use frontpanel::config::{PollCadence, CLOCK_TICKS_PER_MS};
use frontpanel::events::Rotation;
use frontpanel::panel::{ControlSurface, FrontPanel};

use crate::drivers::gpio::GpioLevels;

/// Loop period on the microsecond timer.  The bank's cadence uses the same
/// value, so one poll is one millisecond and the configured timeouts keep
/// their meaning (debounce becomes 20 ms).
pub const PANEL_POLL_INTERVAL_US: u32 = 1000;

/// Blocking delay between polls.  `FreeRtos::delay_ms` always yields at least
/// one scheduler tick; `sdkconfig.defaults` sets `CONFIG_FREERTOS_HZ=1000` so
/// that tick is 1 ms.  At a slower tick rate the cadence gate still holds but
/// every poll lands one tick apart.
const PANEL_POLL_DELAY_MS: u32 = PANEL_POLL_INTERVAL_US / 1000;

pub fn cadence() -> PollCadence {
    PollCadence::new(CLOCK_TICKS_PER_MS, PANEL_POLL_INTERVAL_US)
}

/// Stand-in for the sound engine: logs what it would be told.
pub struct LogControl;

impl ControlSurface for LogControl {
    fn set_buttons(&mut self, mask: u32) {
        log::info!("Control buttons: {:#06x}", mask);
    }

    fn encoder_step(&mut self, rotation: Rotation) {
        log::info!("Control encoder: {:?}", rotation);
    }

    fn reboot(&mut self) {
        log::info!("Restarting");
        unsafe { esp_idf_sys::esp_restart() }
    }
}

pub fn panel_task<C: ControlSurface>(mut panel: FrontPanel<GpioLevels>, mut control: C) -> ! {
    log::info!("Panel task started");

    loop {
        // The bank's cadence gate absorbs any jitter in the delay.
        panel.process(crate::now_us(), &mut control);
        FreeRtos::delay_ms(PANEL_POLL_DELAY_MS);
    }
}
