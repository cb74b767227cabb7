//! Button input: raw level sources, the per-button gesture classifier, and the
//! bank that polls them all.

pub mod bank;
pub mod button;
pub mod level;

pub use bank::{ButtonBank, EventSink};
pub use button::{ButtonClassifier, GestureState, Thresholds};
pub use level::{LevelSource, LevelTable};
