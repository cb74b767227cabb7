//! Front-panel input layer for a small hardware instrument.
//!
//! A bank of debounced momentary buttons is polled from the main loop and
//! classified into clicks, double clicks and long presses, which are mapped
//! to logical panel events and handed to the instrument's control logic.
//! Rotary encoder events (decoded elsewhere) are folded in by [`panel`].
//!
//! Everything here is target independent; the ESP-IDF firmware binary only
//! adds a GPIO [`input::LevelSource`] and the loop that drives
//! [`panel::FrontPanel`].

pub mod config;
pub mod events;
pub mod input;
pub mod panel;
