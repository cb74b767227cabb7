// Front Panel — Controller
//
// Owns the button bank, folds in rotary encoder events, and forwards every
// resolved gesture to the instrument's control logic.

use std::sync::mpsc::{self, Receiver};

use crate::config::{PanelConfig, PollCadence, ENCODER_REBOOT_HOLD_SECS};
use crate::events::{EncoderEvent, PanelButton, Rotation};
use crate::input::{ButtonBank, LevelSource};

/// The instrument side of the panel.
pub trait ControlSurface {
    /// Replace the pressed-button register with `mask` (one bit per
    /// [`PanelButton`]).
    fn set_buttons(&mut self, mask: u32);

    /// One detent of the data encoder.
    fn encoder_step(&mut self, rotation: Rotation);

    /// Encoder switch held long enough to ask for a restart.
    fn reboot(&mut self);
}

pub struct FrontPanel<L: LevelSource> {
    bank: ButtonBank<L>,
    events: Receiver<PanelButton>,
    enter_pin: u32,
    encoder_enabled: bool,
    switch_pressed: bool,
}

impl<L: LevelSource> FrontPanel<L> {
    pub fn new(levels: L, cadence: PollCadence, config: &PanelConfig) -> anyhow::Result<Self> {
        let mut bank = ButtonBank::new(levels, cadence);
        bank.initialize(&config.buttons, config.double_click_ms, config.long_press_ms)?;

        let (tx, events) = mpsc::channel();
        bank.register_event_sink(move |event: PanelButton| {
            let _ = tx.send(event);
        });
        log::debug!("Button user interface initialized");

        if config.encoder.enabled {
            log::debug!(
                "Rotary encoder on pins {}/{}, switch on pin {}",
                config.encoder.pin_clock,
                config.encoder.pin_data,
                config.enter_pin()
            );
        }

        Ok(Self {
            bank,
            events,
            enter_pin: config.enter_pin(),
            encoder_enabled: config.encoder.enabled,
            switch_pressed: false,
        })
    }

    /// Call once per main-loop iteration with the free-running clock.
    pub fn process<C: ControlSurface>(&mut self, now: u32, control: &mut C) {
        self.bank.update(now);

        while let Ok(event) = self.events.try_recv() {
            let mask = event.mask();
            log::info!("Button: {:x} ({})", mask, event.name());
            control.set_buttons(mask);
        }
    }

    pub fn handle_encoder<C: ControlSurface>(&mut self, event: EncoderEvent, control: &mut C) {
        if !self.encoder_enabled {
            return;
        }

        match event {
            EncoderEvent::SwitchDown => self.switch_pressed = true,
            EncoderEvent::SwitchUp => self.switch_pressed = false,
            EncoderEvent::Clockwise | EncoderEvent::CounterClockwise => {
                if self.switch_pressed {
                    // Turning while the switch is held is a chord: the Enter
                    // press underneath must not resolve into a click later.
                    log::debug!("Encoder turned while held, resetting pin {}", self.enter_pin);
                    self.bank.reset_button(self.enter_pin);
                } else {
                    let rotation = match event {
                        EncoderEvent::Clockwise => Rotation::Clockwise,
                        _ => Rotation::CounterClockwise,
                    };
                    control.encoder_step(rotation);
                }
            }
            EncoderEvent::SwitchHold { seconds } => {
                if seconds >= ENCODER_REBOOT_HOLD_SECS {
                    log::warn!("Encoder switch held for {} s, rebooting", seconds);
                    control.reboot();
                }
            }
        }
    }

    /// Squelch the gesture in progress on `pin`.
    pub fn reset_button(&mut self, pin: u32) {
        self.bank.reset_button(pin);
    }

    pub fn bank(&self) -> &ButtonBank<L> {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut ButtonBank<L> {
        &mut self.bank
    }
}
