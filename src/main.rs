// Front Panel — Firmware Entry Point
//
// Boot sequence:
//   1. Initialise logging.
//   2. Attach every configured button pin (pull-up, active LOW).
//   3. Run the panel loop on the main task; it never returns.
//
// Rotary encoder decoding is not part of this firmware.  A decoder feeds its
// events to `FrontPanel::handle_encoder`.

#[cfg(target_os = "espidf")]
mod drivers;
#[cfg(target_os = "espidf")]
mod tasks;

// ---------------------------------------------------------------------------
// Utility: microseconds since boot (wraps at ~71 minutes; the bank's cadence
// gate uses wrapping arithmetic)
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
pub fn now_us() -> u32 {
    unsafe { esp_idf_sys::esp_timer_get_time() as u32 }
}

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use frontpanel::config::PanelConfig;
    use frontpanel::panel::FrontPanel;

    use crate::drivers::gpio::GpioLevels;
    use crate::tasks::panel::{cadence, panel_task, LogControl};

    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("Front panel firmware starting…");

    let config = PanelConfig::default();
    let panel = FrontPanel::new(GpioLevels::new(), cadence(), &config)?;

    let pins: Vec<u32> = panel.bank().configured_pins().collect();
    let thresholds = panel.bank().thresholds();
    log::info!(
        "Buttons on pins {:?} (double click {} polls, long press {} polls)",
        pins,
        thresholds.double_click(),
        thresholds.long_press()
    );

    panel_task(panel, LogControl)
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    anyhow::bail!(
        "the front panel firmware only runs on ESP-IDF targets; \
         use the library (and its tests) on the host"
    )
}
