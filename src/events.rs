// Front Panel — Events & Gesture Types

// ---------------------------------------------------------------------------
// Logical buttons (the events the panel hands to the instrument)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelButton {
    Preview,
    Left,
    Right,
    Data,
    ToneSelect,
    PatchPerform,
    Edit,
    System,
    Rhythm,
    Utility,
    Mute,
    Monitor,
    Compare,
    Enter,
}

impl PanelButton {
    /// Every panel button in control-mask bit order.
    pub const ALL: [PanelButton; 14] = [
        Self::Preview,
        Self::Left,
        Self::Right,
        Self::Data,
        Self::ToneSelect,
        Self::PatchPerform,
        Self::Edit,
        Self::System,
        Self::Rhythm,
        Self::Utility,
        Self::Mute,
        Self::Monitor,
        Self::Compare,
        Self::Enter,
    ];

    /// One-hot mask for the instrument's button register.
    pub fn mask(self) -> u32 {
        1 << self as u32
    }

    /// Short label for logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Preview      => "preview",
            Self::Left         => "left",
            Self::Right        => "right",
            Self::Data         => "data",
            Self::ToneSelect   => "tone-select",
            Self::PatchPerform => "patch-perform",
            Self::Edit         => "edit",
            Self::System       => "system",
            Self::Rhythm       => "rhythm",
            Self::Utility      => "utility",
            Self::Mute         => "mute",
            Self::Monitor      => "monitor",
            Self::Compare      => "compare",
            Self::Enter        => "enter",
        }
    }
}

// ---------------------------------------------------------------------------
// Gesture classification
// ---------------------------------------------------------------------------
/// Gesture a classifier can report.  "Nothing happened" is `None` at the call
/// site, so an unbindable trigger kind cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    Click,
    DoubleClick,
    LongPress,
}

impl TriggerKind {
    /// Parse a configured action string.
    ///
    /// `""` and `"none"` mean "not bound".  Anything unrecognized is logged
    /// and also treated as not bound.
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            "" | "none"   => None,
            "click"       => Some(Self::Click),
            "doubleclick" => Some(Self::DoubleClick),
            "longpress"   => Some(Self::LongPress),
            other => {
                log::error!("Invalid action: {}", other);
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Rotary encoder (discrete events from an external quadrature decoder)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderEvent {
    SwitchDown,
    SwitchUp,
    Clockwise,
    CounterClockwise,
    /// Switch still held; `seconds` since it went down.
    SwitchHold { seconds: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}
