// Front Panel — Input & Timing Configuration
//
// Fixed constants for the gesture classifier plus the typed configuration
// surface the button bank consumes.  Loading these values from persisted
// storage is the host application's job.

use crate::events::PanelButton;

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------
/// Polls to ignore after an accepted level transition (contact bounce).
pub const DEBOUNCE_TICKS: u32 = 20;

/// Classifier slots owned by a bank (one per front-panel button).
pub const MAX_BUTTONS: usize = 14;

/// Pin id reserved for "no physical pin".
pub const NO_PIN: u32 = 0;

// ---------------------------------------------------------------------------
// Poll cadence (reference: microsecond clock, one poll every 100 µs)
// ---------------------------------------------------------------------------
pub const CLOCK_TICKS_PER_MS: u32 = 1000;
pub const UPDATE_INTERVAL_TICKS: u32 = 100;

// ---------------------------------------------------------------------------
// Gesture timeouts (milliseconds)
// ---------------------------------------------------------------------------
pub const DOUBLE_CLICK_TIMEOUT_MS: u32 = 400;
pub const LONG_PRESS_TIMEOUT_MS: u32 = 600;

// ---------------------------------------------------------------------------
// Rotary encoder (KY-040 style, decoded elsewhere)
// ---------------------------------------------------------------------------
pub const PIN_BUTTON_ENTER: u32 = 11; // encoder push switch doubles as Enter
pub const PIN_ENCODER_CLOCK: u32 = 10;
pub const PIN_ENCODER_DATA: u32 = 9;
pub const ENCODER_REBOOT_HOLD_SECS: u32 = 120;

/// How a bank's poll count relates to wall-clock time.
///
/// The classifier only counts polls, so every millisecond threshold is turned
/// into a poll count using the clock the caller passes to `update` and the
/// minimum interval the bank's cadence gate enforces between polls.  The
/// conversion is only as accurate as the caller's loop is regular.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollCadence {
    /// Clock ticks per millisecond of the value passed to `update`.
    pub clock_ticks_per_ms: u32,
    /// Minimum clock ticks between two accepted updates.
    pub update_interval_ticks: u32,
}

impl PollCadence {
    /// Microsecond clock gated to one poll per 100 µs: ten polls per ms.
    pub const REFERENCE: Self = Self {
        clock_ticks_per_ms: CLOCK_TICKS_PER_MS,
        update_interval_ticks: UPDATE_INTERVAL_TICKS,
    };

    pub const fn new(clock_ticks_per_ms: u32, update_interval_ticks: u32) -> Self {
        Self {
            clock_ticks_per_ms,
            update_interval_ticks,
        }
    }

    /// Number of polls that make up `ms` milliseconds.
    pub fn polls_for_ms(&self, ms: u32) -> u32 {
        let interval = self.update_interval_ticks.max(1) as u64;
        let polls = ms as u64 * self.clock_ticks_per_ms as u64 / interval;
        polls.min(u32::MAX as u64) as u32
    }

    /// Gate interval, never zero.
    pub fn interval(&self) -> u32 {
        self.update_interval_ticks.max(1)
    }
}

impl Default for PollCadence {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// One logical front-panel button: which pin it sits on and which gestures
/// on that pin produce its event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonConfig {
    pub event: PanelButton,
    /// `NO_PIN` disables the button.
    pub pin: u32,
    /// Action strings: `""`, `"none"`, `"click"`, `"doubleclick"`, `"longpress"`.
    pub actions: Vec<String>,
}

impl ButtonConfig {
    pub fn new(event: PanelButton, pin: u32, action: &str) -> Self {
        Self {
            event,
            pin,
            actions: vec![action.to_owned()],
        }
    }

    pub fn disabled(event: PanelButton) -> Self {
        Self::new(event, NO_PIN, "")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    pub enabled: bool,
    pub pin_clock: u32,
    pub pin_data: u32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            pin_clock: PIN_ENCODER_CLOCK,
            pin_data: PIN_ENCODER_DATA,
        }
    }
}

/// Everything the front panel needs from the instrument's settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    pub buttons: Vec<ButtonConfig>,
    pub double_click_ms: u32,
    pub long_press_ms: u32,
    pub encoder: EncoderConfig,
}

impl PanelConfig {
    /// Pin the Enter button is configured on, `NO_PIN` if it has none.
    pub fn enter_pin(&self) -> u32 {
        self.buttons
            .iter()
            .find(|b| b.event == PanelButton::Enter)
            .map(|b| b.pin)
            .unwrap_or(NO_PIN)
    }
}

impl Default for PanelConfig {
    /// Stock layout: only Enter is wired, and it reacts to a plain click.
    fn default() -> Self {
        let buttons = PanelButton::ALL
            .iter()
            .map(|&event| match event {
                PanelButton::Enter => ButtonConfig::new(event, PIN_BUTTON_ENTER, "click"),
                _ => ButtonConfig::disabled(event),
            })
            .collect();

        Self {
            buttons,
            double_click_ms: DOUBLE_CLICK_TIMEOUT_MS,
            long_press_ms: LONG_PRESS_TIMEOUT_MS,
            encoder: EncoderConfig::default(),
        }
    }
}
