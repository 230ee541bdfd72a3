use iced::keyboard::{Key, Modifiers};
use std::time::Instant;

/// Messages emitted by the UI.
#[derive(Debug, Clone)]
pub enum Message {
    PreviousCard,
    NextCard,
    JumpInputChanged(String),
    SetRate(f32),
    EmphasizeHeadword,
    StopSpeech,
    KeyPressed { key: Key, modifiers: Modifiers },
    Tick(Instant),
}
