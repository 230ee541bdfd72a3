use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Rate buttons offered by the viewer.
pub const RATE_PRESETS: [f32; 4] = [0.1, 0.5, 1.0, 2.0];
pub const HEADWORD_RATE: f32 = 0.2;
pub const MIN_RATE: f32 = 0.1;
pub const MAX_RATE: f32 = 2.0;

/// A configured unit of text plus speech rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub rate: f32,
}

impl Default for Utterance {
    fn default() -> Self {
        Self {
            text: String::new(),
            rate: 1.0,
        }
    }
}

/// Fire-and-forget speech output. Implementations queue submissions in order
/// and report no completion events.
pub trait SpeechEngine {
    fn speak(&mut self, utterance: &Utterance) -> Result<()>;

    /// Stop playback now and discard anything queued.
    fn cancel(&mut self) -> Result<()>;

    /// Whether audio is still queued or playing.
    fn is_speaking(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeechState {
    #[default]
    Idle,
    Speaking,
}

/// Clamp a requested rate into the supported range; non-finite input is rejected.
pub fn sanitize_rate(rate: f32) -> Option<f32> {
    rate.is_finite().then(|| rate.clamp(MIN_RATE, MAX_RATE))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{SpeechEngine, Utterance};
    use anyhow::{Result, bail};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum EngineCall {
        Speak(String, f32),
        Cancel,
    }

    /// Engine double that records calls; the log is shared so tests can read
    /// it after handing the engine to a session.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct RecordingEngine {
        pub(crate) calls: Rc<RefCell<Vec<EngineCall>>>,
        pub(crate) fail_speak: bool,
        pub(crate) queued: Rc<Cell<usize>>,
    }

    impl RecordingEngine {
        pub(crate) fn spoken(&self) -> Vec<(String, f32)> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|call| match call {
                    EngineCall::Speak(text, rate) => Some((text.clone(), *rate)),
                    EngineCall::Cancel => None,
                })
                .collect()
        }

        pub(crate) fn clear(&self) {
            self.calls.borrow_mut().clear();
        }

        /// Drain the queue as if every submitted clip finished playing.
        pub(crate) fn finish_playback(&self) {
            self.queued.set(0);
        }
    }

    impl SpeechEngine for RecordingEngine {
        fn speak(&mut self, utterance: &Utterance) -> Result<()> {
            if self.fail_speak {
                bail!("audio device unavailable");
            }
            self.queued.set(self.queued.get() + 1);
            self.calls
                .borrow_mut()
                .push(EngineCall::Speak(utterance.text.clone(), utterance.rate));
            Ok(())
        }

        fn cancel(&mut self) -> Result<()> {
            self.queued.set(0);
            self.calls.borrow_mut().push(EngineCall::Cancel);
            Ok(())
        }

        fn is_speaking(&self) -> bool {
            self.queued.get() > 0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_rate_clamps_and_rejects_nan() {
        assert_eq!(sanitize_rate(5.0), Some(MAX_RATE));
        assert_eq!(sanitize_rate(0.0), Some(MIN_RATE));
        assert_eq!(sanitize_rate(0.5), Some(0.5));
        assert_eq!(sanitize_rate(f32::NAN), None);
        assert_eq!(sanitize_rate(f32::INFINITY), None);
    }

    #[test]
    fn presets_are_within_range() {
        for rate in RATE_PRESETS.iter().copied().chain([HEADWORD_RATE]) {
            assert_eq!(sanitize_rate(rate), Some(rate));
        }
    }
}
