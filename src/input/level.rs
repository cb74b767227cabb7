// Front Panel — Level Sources
//
// Where the classifiers get their raw samples from.  Wiring is pull-up, so a
// high level means "released" and a low level means "pressed".

use std::collections::HashMap;

use crate::config::NO_PIN;

/// Raw digital level reader for front-panel pins.
///
/// Reads must not block and cannot fail; an implementation that cannot read a
/// pin must report it high (released).
pub trait LevelSource {
    /// Prepare `pin` as a pulled-up input.  Called once per configured pin,
    /// never for `NO_PIN`.
    fn attach(&mut self, pin: u32) -> anyhow::Result<()>;

    /// Current raw level of `pin`; `false` means pressed.
    fn is_high(&mut self, pin: u32) -> bool;
}

impl<L: LevelSource + ?Sized> LevelSource for &mut L {
    fn attach(&mut self, pin: u32) -> anyhow::Result<()> {
        (**self).attach(pin)
    }

    fn is_high(&mut self, pin: u32) -> bool {
        (**self).is_high(pin)
    }
}

/// In-memory level source for host builds and tests.
///
/// Every pin idles high; `press`/`release` drive it like a finger would.
#[derive(Debug, Default, Clone)]
pub struct LevelTable {
    levels: HashMap<u32, bool>,
    attached: Vec<u32>,
}

impl LevelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, pin: u32) {
        self.set_high(pin, false);
    }

    pub fn release(&mut self, pin: u32) {
        self.set_high(pin, true);
    }

    pub fn set_high(&mut self, pin: u32, high: bool) {
        self.levels.insert(pin, high);
    }

    /// Pins that have been attached, in attach order.
    pub fn attached(&self) -> &[u32] {
        &self.attached
    }
}

impl LevelSource for LevelTable {
    fn attach(&mut self, pin: u32) -> anyhow::Result<()> {
        anyhow::ensure!(pin != NO_PIN, "pin 0 cannot be attached");
        if !self.attached.contains(&pin) {
            self.attached.push(pin);
        }
        Ok(())
    }

    fn is_high(&mut self, pin: u32) -> bool {
        self.levels.get(&pin).copied().unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_pins_read_released() {
        let mut table = LevelTable::new();
        assert!(table.is_high(7));
    }

    #[test]
    fn press_and_release_toggle_level() {
        let mut table = LevelTable::new();
        table.press(7);
        assert!(!table.is_high(7));
        table.release(7);
        assert!(table.is_high(7));
    }

    #[test]
    fn attach_rejects_the_disabled_pin() {
        let mut table = LevelTable::new();
        assert!(table.attach(NO_PIN).is_err());
        table.attach(5).unwrap();
        table.attach(5).unwrap();
        assert_eq!(table.attached(), &[5]);
    }
}
