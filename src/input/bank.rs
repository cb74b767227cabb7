// Front Panel — Button Bank
//
// Fixed set of classifiers keyed by pin.  Converts the configured timeouts to
// poll counts, rate-limits polling to the cadence, and hands every resolved
// event to the single registered sink.

use crate::config::{ButtonConfig, PollCadence, MAX_BUTTONS, NO_PIN};
use crate::events::{PanelButton, TriggerKind};
use crate::input::button::{ButtonClassifier, Thresholds};
use crate::input::level::LevelSource;

/// Consumer of resolved panel events.  Runs inline inside
/// [`ButtonBank::update`], so it must return quickly.
pub trait EventSink {
    fn on_event(&mut self, event: PanelButton);
}

impl<F: FnMut(PanelButton)> EventSink for F {
    fn on_event(&mut self, event: PanelButton) {
        self(event)
    }
}

pub struct ButtonBank<L: LevelSource> {
    levels: L,
    cadence: PollCadence,
    thresholds: Thresholds,
    buttons: [ButtonClassifier; MAX_BUTTONS],
    sink: Option<Box<dyn EventSink>>,
    last_tick: u32,
    initialized: bool,
}

impl<L: LevelSource> ButtonBank<L> {
    pub fn new(levels: L, cadence: PollCadence) -> Self {
        Self {
            levels,
            cadence,
            thresholds: Thresholds::default(),
            buttons: core::array::from_fn(|_| ButtonClassifier::new()),
            sink: None,
            last_tick: 0,
            initialized: false,
        }
    }

    /// Assign pins and bindings.
    ///
    /// Configuration mistakes (unknown action strings, a long press shorter
    /// than the double-click window, a pin listed twice) are logged and
    /// corrected.  Only failing to attach a pin is an error.
    ///
    /// # Panics
    ///
    /// If the bank was already initialized.
    pub fn initialize(
        &mut self,
        buttons: &[ButtonConfig],
        double_click_ms: u32,
        long_press_ms: u32,
    ) -> anyhow::Result<()> {
        assert!(!self.initialized, "button bank initialized twice");
        self.initialized = true;

        let double_click = self.cadence.polls_for_ms(double_click_ms);
        let long_press = self.cadence.polls_for_ms(long_press_ms);
        if long_press < double_click {
            log::error!(
                "LongPressTimeout ({}) should not be shorter than DoubleClickTimeout ({})",
                long_press_ms,
                double_click_ms
            );
        }
        self.thresholds = Thresholds::new(double_click, long_press);

        // Classifiers first, so every binding below finds its pin.
        for config in buttons.iter().filter(|c| c.pin != NO_PIN) {
            self.allocate(config.pin)?;
        }

        for config in buttons {
            self.bind_button(config);
        }

        Ok(())
    }

    fn allocate(&mut self, pin: u32) -> anyhow::Result<()> {
        if self.buttons.iter().any(|b| b.pin() == pin) {
            log::info!("Note: GPIO pin {} is already assigned", pin);
            return Ok(());
        }

        let thresholds = self.thresholds;
        match self.buttons.iter_mut().find(|b| !b.is_initialized()) {
            Some(slot) => slot.initialize(pin, thresholds, &mut self.levels),
            None => {
                log::error!("No free button slot for GPIO pin {}", pin);
                Ok(())
            }
        }
    }

    fn bind_button(&mut self, config: &ButtonConfig) {
        if config.pin == NO_PIN {
            return;
        }
        let Some(slot) = self.buttons.iter_mut().find(|b| b.pin() == config.pin) else {
            return;
        };

        for action in &config.actions {
            let Some(kind) = TriggerKind::from_action(action) else {
                continue;
            };
            match slot.binding(kind) {
                Some(existing) if existing != config.event => log::warn!(
                    "GPIO pin {} {:?} already bound to {}, ignoring {}",
                    config.pin,
                    kind,
                    existing.name(),
                    config.event.name()
                ),
                _ => slot.bind(kind, config.event),
            }
        }
    }

    /// Attach the one consumer of this bank's events.
    ///
    /// # Panics
    ///
    /// If a sink is already registered.
    pub fn register_event_sink<S: EventSink + 'static>(&mut self, sink: S) {
        assert!(self.sink.is_none(), "button bank already has an event sink");
        self.sink = Some(Box::new(sink));
    }

    /// Poll every button once, unless less than one cadence interval has
    /// passed since the last accepted update.  `current_tick` is the caller's
    /// free-running clock and may wrap.
    ///
    /// # Panics
    ///
    /// If no event sink has been registered.
    pub fn update(&mut self, current_tick: u32) {
        let sink = match self.sink.as_mut() {
            Some(sink) => sink,
            None => panic!("button bank updated before an event sink was registered"),
        };

        if current_tick.wrapping_sub(self.last_tick) < self.cadence.interval() {
            return;
        }
        self.last_tick = current_tick;

        for button in self.buttons.iter_mut() {
            if let Some(event) = button.read(&mut self.levels) {
                log::trace!("Event: {}", event.name());
                sink.on_event(event);
            }
        }
    }

    /// Abandon whatever gesture the button on `pin` is in.  No-op for unknown
    /// pins.
    pub fn reset_button(&mut self, pin: u32) {
        if pin == NO_PIN {
            return;
        }
        for button in self.buttons.iter_mut().filter(|b| b.pin() == pin) {
            button.reset();
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn cadence(&self) -> PollCadence {
        self.cadence
    }

    pub fn slot(&self, pin: u32) -> Option<&ButtonClassifier> {
        if pin == NO_PIN {
            return None;
        }
        self.buttons.iter().find(|b| b.pin() == pin)
    }

    /// Assigned pins in slot (and therefore dispatch) order.
    pub fn configured_pins(&self) -> impl Iterator<Item = u32> + '_ {
        self.buttons.iter().map(|b| b.pin()).filter(|&p| p != NO_PIN)
    }

    pub fn levels(&self) -> &L {
        &self.levels
    }

    pub fn levels_mut(&mut self) -> &mut L {
        &mut self.levels
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::config::{UPDATE_INTERVAL_TICKS, DEBOUNCE_TICKS};
    use crate::input::button::GestureState;
    use crate::input::level::LevelTable;

    type Recorded = Rc<RefCell<Vec<PanelButton>>>;

    fn bank_with_sink(buttons: &[ButtonConfig]) -> (ButtonBank<LevelTable>, Recorded) {
        let mut bank = ButtonBank::new(LevelTable::new(), PollCadence::REFERENCE);
        bank.initialize(buttons, 400, 600).unwrap();

        let recorded: Recorded = Rc::default();
        let sink = Rc::clone(&recorded);
        bank.register_event_sink(move |event: PanelButton| sink.borrow_mut().push(event));
        (bank, recorded)
    }

    /// Run `polls` accepted updates starting after `*now`.
    fn step(bank: &mut ButtonBank<LevelTable>, now: &mut u32, polls: u32) {
        for _ in 0..polls {
            *now = now.wrapping_add(UPDATE_INTERVAL_TICKS);
            bank.update(*now);
        }
    }

    #[test]
    fn timeouts_convert_to_polls() {
        let (bank, _) = bank_with_sink(&[]);
        assert_eq!(bank.thresholds().double_click(), 4000);
        assert_eq!(bank.thresholds().long_press(), 6000);
    }

    #[test]
    fn long_press_shorter_than_double_click_is_clamped() {
        let mut bank = ButtonBank::new(LevelTable::new(), PollCadence::REFERENCE);
        bank.initialize(&[], 600, 400).unwrap();
        assert_eq!(bank.thresholds().double_click(), 6000);
        assert_eq!(bank.thresholds().long_press(), 6000);
    }

    #[test]
    fn disabled_buttons_get_no_slot() {
        let (bank, _) = bank_with_sink(&[
            ButtonConfig::disabled(PanelButton::Left),
            ButtonConfig::new(PanelButton::Enter, 11, "click"),
        ]);
        assert_eq!(bank.configured_pins().collect::<Vec<_>>(), vec![11]);
        assert_eq!(bank.levels().attached(), &[11]);
        assert!(bank.slot(NO_PIN).is_none());
    }

    #[test]
    fn shared_pin_gets_one_slot_with_both_bindings() {
        let (bank, _) = bank_with_sink(&[
            ButtonConfig::new(PanelButton::Enter, 11, "click"),
            ButtonConfig::new(PanelButton::System, 11, "longpress"),
            ButtonConfig::new(PanelButton::Left, 4, "click"),
        ]);
        assert_eq!(bank.configured_pins().collect::<Vec<_>>(), vec![11, 4]);

        let slot = bank.slot(11).unwrap();
        assert_eq!(slot.binding(TriggerKind::Click), Some(PanelButton::Enter));
        assert_eq!(slot.binding(TriggerKind::LongPress), Some(PanelButton::System));
        assert_eq!(slot.binding(TriggerKind::DoubleClick), None);
    }

    #[test]
    fn conflicting_binding_keeps_the_first() {
        let (bank, _) = bank_with_sink(&[
            ButtonConfig::new(PanelButton::Enter, 11, "click"),
            ButtonConfig::new(PanelButton::Data, 11, "click"),
        ]);
        let slot = bank.slot(11).unwrap();
        assert_eq!(slot.binding(TriggerKind::Click), Some(PanelButton::Enter));
    }

    #[test]
    fn one_button_can_carry_several_actions() {
        let config = ButtonConfig {
            event: PanelButton::Data,
            pin: 7,
            actions: vec!["click".into(), "doubleclick".into(), "longpress".into()],
        };
        let (bank, _) = bank_with_sink(&[config]);
        let slot = bank.slot(7).unwrap();
        assert_eq!(slot.binding(TriggerKind::Click), Some(PanelButton::Data));
        assert_eq!(slot.binding(TriggerKind::DoubleClick), Some(PanelButton::Data));
        assert_eq!(slot.binding(TriggerKind::LongPress), Some(PanelButton::Data));
    }

    #[test]
    fn unknown_action_leaves_button_unbound() {
        let (bank, _) = bank_with_sink(&[ButtonConfig::new(PanelButton::Mute, 6, "squeeze")]);
        let slot = bank.slot(6).unwrap();
        assert!(slot.is_initialized());
        assert_eq!(slot.binding(TriggerKind::Click), None);
    }

    #[test]
    fn extra_pins_beyond_capacity_are_skipped() {
        let configs: Vec<_> = (1..=(MAX_BUTTONS as u32 + 2))
            .map(|pin| ButtonConfig::new(PanelButton::Data, pin, "click"))
            .collect();
        let (bank, _) = bank_with_sink(&configs);
        assert_eq!(bank.configured_pins().count(), MAX_BUTTONS);
        assert!(bank.slot(MAX_BUTTONS as u32 + 1).is_none());
    }

    #[test]
    fn cadence_gate_skips_early_updates() {
        let (mut bank, _) = bank_with_sink(&[ButtonConfig::new(PanelButton::Enter, 11, "click")]);
        bank.levels_mut().press(11);

        bank.update(UPDATE_INTERVAL_TICKS - 1);
        assert_eq!(bank.slot(11).unwrap().state(), GestureState::Idle);

        bank.update(UPDATE_INTERVAL_TICKS);
        assert_eq!(bank.slot(11).unwrap().state(), GestureState::AwaitingRelease);
    }

    #[test]
    fn cadence_gate_handles_clock_wrap() {
        let (mut bank, recorded) =
            bank_with_sink(&[ButtonConfig::new(PanelButton::Enter, 11, "click")]);

        let mut now = u32::MAX - 5 * UPDATE_INTERVAL_TICKS;
        bank.update(now);
        bank.levels_mut().press(11);
        step(&mut bank, &mut now, DEBOUNCE_TICKS + 1);
        bank.levels_mut().release(11);
        step(&mut bank, &mut now, 1);

        assert!(now < UPDATE_INTERVAL_TICKS * (DEBOUNCE_TICKS + 2));
        assert_eq!(*recorded.borrow(), vec![PanelButton::Enter]);
    }

    #[test]
    fn simultaneous_events_dispatch_in_slot_order() {
        let (mut bank, recorded) = bank_with_sink(&[
            ButtonConfig::new(PanelButton::Left, 4, "click"),
            ButtonConfig::new(PanelButton::Right, 5, "click"),
        ]);
        let mut now = 0;

        bank.levels_mut().press(5);
        bank.levels_mut().press(4);
        step(&mut bank, &mut now, DEBOUNCE_TICKS + 1);
        bank.levels_mut().release(5);
        bank.levels_mut().release(4);
        step(&mut bank, &mut now, 1);

        assert_eq!(*recorded.borrow(), vec![PanelButton::Left, PanelButton::Right]);
    }

    #[test]
    fn reset_button_squelches_pending_click() {
        let (mut bank, recorded) =
            bank_with_sink(&[ButtonConfig::new(PanelButton::Enter, 11, "click")]);
        let mut now = 0;

        bank.levels_mut().press(11);
        step(&mut bank, &mut now, 50);
        bank.reset_button(11);
        bank.reset_button(99);
        bank.levels_mut().release(11);
        step(&mut bank, &mut now, 8000);

        assert!(recorded.borrow().is_empty());
    }

    #[test]
    #[should_panic(expected = "already has an event sink")]
    fn second_sink_panics() {
        let (mut bank, _) = bank_with_sink(&[]);
        bank.register_event_sink(|_: PanelButton| {});
    }

    #[test]
    #[should_panic(expected = "before an event sink")]
    fn update_without_sink_panics() {
        let mut bank = ButtonBank::new(LevelTable::new(), PollCadence::REFERENCE);
        bank.initialize(&[], 400, 600).unwrap();
        bank.update(1000);
    }

    #[test]
    #[should_panic(expected = "initialized twice")]
    fn initializing_bank_twice_panics() {
        let mut bank = ButtonBank::new(LevelTable::new(), PollCadence::REFERENCE);
        bank.initialize(&[], 400, 600).unwrap();
        let _ = bank.initialize(&[], 400, 600);
    }
}
