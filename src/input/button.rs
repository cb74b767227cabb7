// Front Panel — Button Gesture Classifier
//
// Debounced single-button classifier with click, double-click, and long-press
// detection.  It has no clock of its own: every `poll` is one tick, so the
// thresholds only mean milliseconds if the caller polls at a steady cadence.

use anyhow::Context;

use crate::config::{DEBOUNCE_TICKS, NO_PIN};
use crate::events::{PanelButton, TriggerKind};
use crate::input::level::LevelSource;

/// Where a button is inside a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    /// No gesture window open.
    Idle,
    /// First press accepted, button still down.
    AwaitingRelease,
    /// First press released early enough that a second press may follow.
    AwaitingSecondPress,
    /// Second press accepted, button still down.
    AwaitingSecondRelease,
}

impl GestureState {
    /// Presses seen since the gesture window opened.
    pub fn clicks(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::AwaitingRelease | Self::AwaitingSecondPress => 1,
            Self::AwaitingSecondRelease => 2,
        }
    }
}

/// Gesture timeouts in polls.  `long_press >= double_click` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Thresholds {
    double_click: u32,
    long_press: u32,
}

impl Thresholds {
    /// A long press shorter than the double-click window is raised to it.
    pub fn new(double_click: u32, long_press: u32) -> Self {
        Self {
            double_click,
            long_press: long_press.max(double_click),
        }
    }

    pub fn double_click(&self) -> u32 {
        self.double_click
    }

    pub fn long_press(&self) -> u32 {
        self.long_press
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Bindings {
    click: Option<PanelButton>,
    double_click: Option<PanelButton>,
    long_press: Option<PanelButton>,
}

impl Bindings {
    fn get(&self, kind: TriggerKind) -> Option<PanelButton> {
        match kind {
            TriggerKind::Click => self.click,
            TriggerKind::DoubleClick => self.double_click,
            TriggerKind::LongPress => self.long_press,
        }
    }

    fn set(&mut self, kind: TriggerKind, event: PanelButton) {
        match kind {
            TriggerKind::Click => self.click = Some(event),
            TriggerKind::DoubleClick => self.double_click = Some(event),
            TriggerKind::LongPress => self.long_press = Some(event),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ButtonClassifier {
    pin: u32,
    initialized: bool,
    thresholds: Thresholds,

    // Debounce state
    pressed: bool,
    debounce_timer: u32,

    // Gesture window
    state: GestureState,
    gesture_timer: u32,

    bindings: Bindings,
}

impl Default for ButtonClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonClassifier {
    /// Unassigned placeholder; sits on `NO_PIN` and never fires.
    pub fn new() -> Self {
        Self {
            pin: NO_PIN,
            initialized: false,
            thresholds: Thresholds::default(),
            pressed: false, // pull-up → idle HIGH
            debounce_timer: DEBOUNCE_TICKS,
            state: GestureState::Idle,
            gesture_timer: 0,
            bindings: Bindings::default(),
        }
    }

    /// One-time setup.  Attaches `pin` on `levels` unless it is `NO_PIN`.
    ///
    /// # Panics
    ///
    /// If the classifier was already initialized.
    pub fn initialize<L: LevelSource>(
        &mut self,
        pin: u32,
        thresholds: Thresholds,
        levels: &mut L,
    ) -> anyhow::Result<()> {
        assert!(
            !self.initialized,
            "button on pin {} initialized twice",
            self.pin
        );

        if pin != NO_PIN {
            levels
                .attach(pin)
                .with_context(|| format!("failed to attach button pin {}", pin))?;
            log::debug!("GPIO button on pin: {} ({:#x})", pin, pin);
        }

        self.pin = pin;
        self.thresholds = thresholds;
        self.pressed = false;
        self.debounce_timer = DEBOUNCE_TICKS;
        self.state = GestureState::Idle;
        self.gesture_timer = thresholds.long_press;
        self.initialized = true;
        Ok(())
    }

    /// Make `kind` on this button produce `event`.  Rebinding overwrites.
    ///
    /// # Panics
    ///
    /// If called before [`initialize`](Self::initialize).
    pub fn bind(&mut self, kind: TriggerKind, event: PanelButton) {
        assert!(self.initialized, "bind on an uninitialized button");
        self.bindings.set(kind, event);
    }

    pub fn binding(&self, kind: TriggerKind) -> Option<PanelButton> {
        self.bindings.get(kind)
    }

    pub fn pin(&self) -> u32 {
        self.pin
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle
    }

    pub fn click_count(&self) -> u8 {
        self.state.clicks()
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Abandon any gesture in progress without firing.
    pub fn reset(&mut self) {
        self.gesture_timer = self.thresholds.long_press;
        self.state = GestureState::Idle;
    }

    /// Advance one tick and report the gesture that completed on it, if any.
    pub fn poll<L: LevelSource>(&mut self, levels: &mut L) -> Option<TriggerKind> {
        if self.pin == NO_PIN {
            return None;
        }

        let pressed = !levels.is_high(self.pin); // active LOW

        // Timeouts run even while the debounce filter is holding edges back.
        if let Some(trigger) = self.advance_gesture_timer() {
            return Some(trigger);
        }

        // ---- debounce filter ----
        if self.debounce_timer < DEBOUNCE_TICKS {
            self.debounce_timer += 1;
            return None;
        }

        match (self.pressed, pressed) {
            (false, true) => {
                self.on_press();
                None
            }
            (true, false) => self.on_release(),
            _ => None,
        }
    }

    /// [`poll`](Self::poll), then translate the trigger through the bindings.
    pub fn read<L: LevelSource>(&mut self, levels: &mut L) -> Option<PanelButton> {
        let trigger = self.poll(levels)?;
        self.bindings.get(trigger)
    }

    fn advance_gesture_timer(&mut self) -> Option<TriggerKind> {
        if self.gesture_timer >= self.thresholds.long_press {
            return None;
        }
        self.gesture_timer += 1;

        if self.gesture_timer == self.thresholds.double_click
            && self.state == GestureState::AwaitingSecondPress
        {
            // Released once and no second press came in time.
            self.reset();
            return Some(TriggerKind::Click);
        }

        if self.gesture_timer == self.thresholds.long_press {
            let held = self.state == GestureState::AwaitingRelease;
            self.reset();
            return held.then_some(TriggerKind::LongPress);
        }

        None
    }

    fn on_press(&mut self) {
        self.pressed = true;
        self.debounce_timer = 0;

        match self.state {
            GestureState::Idle => {
                self.gesture_timer = 0;
                self.state = GestureState::AwaitingRelease;
            }
            GestureState::AwaitingSecondPress => {
                self.state = GestureState::AwaitingSecondRelease;
            }
            // Already down; a press edge cannot be seen here.
            GestureState::AwaitingRelease | GestureState::AwaitingSecondRelease => {}
        }
    }

    fn on_release(&mut self) -> Option<TriggerKind> {
        self.pressed = false;
        self.debounce_timer = 0;

        match self.state {
            GestureState::AwaitingRelease => {
                let t = self.gesture_timer;
                let past_double_click =
                    t >= self.thresholds.double_click && t < self.thresholds.long_press;

                if self.bindings.double_click.is_none() || past_double_click {
                    self.reset();
                    Some(TriggerKind::Click)
                } else {
                    self.state = GestureState::AwaitingSecondPress;
                    None
                }
            }
            GestureState::AwaitingSecondRelease => {
                self.reset();
                Some(TriggerKind::DoubleClick)
            }
            // Release of a press that belongs to an abandoned gesture.
            GestureState::Idle | GestureState::AwaitingSecondPress => None,
        }
    }
}
