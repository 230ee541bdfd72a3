use crate::config::AppConfig;
use crate::dataset::{WordEntry, WordList, capitalize};
use crate::speech::{HEADWORD_RATE, SpeechEngine, SpeechState, Utterance, sanitize_rate};
use crate::store::{KeyValueStore, WORD_INDEX_KEY};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Index used when nothing usable is persisted. The bundled list keeps a title
/// row at 0, so a fresh start lands on the first real word.
pub const DEFAULT_START_INDEX: i64 = 1;

/// Position and rate of the running session. Only `index` is persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
struct NavigationState {
    index: i64,
    rate: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub initial_rate: f32,
    pub headword_rate: f32,
    pub strict_bounds: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            initial_rate: 1.0,
            headword_rate: HEADWORD_RATE,
            strict_bounds: false,
        }
    }
}

impl From<&AppConfig> for SessionOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            initial_rate: config.initial_rate,
            headword_rate: config.headword_rate,
            strict_bounds: config.strict_bounds,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub index: i64,
    pub total: usize,
    pub headword: String,
    pub text: String,
    pub rate: f32,
    pub speech: SpeechState,
}

#[derive(Debug, Clone)]
pub enum SessionCommand {
    GetSnapshot,
    Navigate { delta: i64 },
    JumpTo { input: String },
    SetRate { rate: f32, headword_only: bool },
    CancelSpeech,
}

impl SessionCommand {
    pub fn action(&self) -> &'static str {
        match self {
            Self::GetSnapshot => "flashcard_get_snapshot",
            Self::Navigate { .. } => "flashcard_navigate",
            Self::JumpTo { .. } => "flashcard_jump_to",
            Self::SetRate { .. } => "flashcard_set_rate",
            Self::CancelSpeech => "flashcard_cancel_speech",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionEvent {
    pub action: &'static str,
    pub snapshot: SessionSnapshot,
}

/// Flashcard controller: owns the word list, the navigation state and the one
/// utterance handle reused for every speech request.
pub struct FlashcardSession<E, S> {
    words: WordList,
    store: S,
    engine: Option<E>,
    state: NavigationState,
    utterance: Utterance,
    speaking: bool,
    headword_rate: f32,
    strict_bounds: bool,
}

impl<E: SpeechEngine, S: KeyValueStore> FlashcardSession<E, S> {
    /// Restore the persisted position, silence any leftover audio, then speak
    /// the restored card.
    pub fn open(words: WordList, store: S, engine: Option<E>, options: SessionOptions) -> Self {
        let restored = restore_index(&store);
        let rate = sanitize_rate(options.initial_rate).unwrap_or(1.0);
        let headword_rate = sanitize_rate(options.headword_rate).unwrap_or(HEADWORD_RATE);
        if engine.is_none() {
            warn!("No speech engine available; cards will be silent");
        }

        let mut session = Self {
            words,
            store,
            engine,
            state: NavigationState { index: 0, rate },
            utterance: Utterance::default(),
            speaking: false,
            headword_rate,
            strict_bounds: options.strict_bounds,
        };
        info!(
            restored,
            entries = session.words.len(),
            strict_bounds = session.strict_bounds,
            "Opening flashcard session"
        );
        session.cancel_speech();
        session.set_index(restored);
        session
    }

    pub fn index(&self) -> i64 {
        self.state.index
    }

    pub fn rate(&self) -> f32 {
        self.state.rate
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    pub fn current_entry(&self) -> Option<&WordEntry> {
        self.words.get(self.state.index)
    }

    pub fn display_headword(&self) -> String {
        self.current_entry()
            .map(|entry| capitalize(&entry.headword))
            .unwrap_or_default()
    }

    pub fn display_text(&self) -> String {
        self.current_entry()
            .map(|entry| entry.text.clone())
            .unwrap_or_default()
    }

    /// 1-based position over the list length, e.g. `"3 / 120"`. Out-of-range
    /// indices are reported as-is.
    pub fn position_label(&self) -> String {
        format!("{} / {}", self.state.index.saturating_add(1), self.words.len())
    }

    pub fn speech_state(&self) -> SpeechState {
        let active = self
            .engine
            .as_ref()
            .map(|engine| engine.is_speaking())
            .unwrap_or(false);
        if self.speaking && active {
            SpeechState::Speaking
        } else {
            SpeechState::Idle
        }
    }

    /// Step by `delta` cards. Out-of-range targets are ignored; returns whether
    /// the move was committed.
    pub fn navigate(&mut self, delta: i64) -> bool {
        let Some(candidate) = self.state.index.checked_add(delta) else {
            return false;
        };
        let len = i64::try_from(self.words.len()).unwrap_or(i64::MAX);
        let upper = if self.strict_bounds { len - 1 } else { len };
        if candidate < 0 || candidate > upper {
            debug!(
                index = self.state.index,
                delta, candidate, upper, "Navigation target out of range; ignoring"
            );
            return false;
        }

        self.cancel_speech();
        self.persist_index(candidate);
        self.set_index(candidate);
        info!(index = self.state.index, delta, "Navigated to card");
        true
    }

    /// Jump to a 1-based position typed by the user. Unparseable input leaves
    /// the position untouched; parsed values are not range checked.
    pub fn jump_to(&mut self, input: &str) -> bool {
        let target = match input.trim().parse::<i64>() {
            Ok(position) => position.checked_sub(1),
            Err(err) => {
                debug!(input, "Ignoring jump input: {err}");
                return false;
            }
        };
        let Some(target) = target else {
            return false;
        };

        self.persist_index(target);
        self.set_index(target);
        if self.current_entry().is_none() {
            warn!(index = target, entries = self.words.len(), "Jumped outside the word list");
        } else {
            info!(index = target, "Jumped to card");
        }
        true
    }

    /// Submit `text` through the shared utterance. `None` uses the session rate.
    pub fn speak(&mut self, text: &str, rate: Option<f32>) {
        self.utterance.text.clear();
        self.utterance.text.push_str(text);
        self.utterance.rate = rate.unwrap_or(self.state.rate);

        let Some(engine) = self.engine.as_mut() else {
            debug!("Speech engine unavailable; skipping utterance");
            return;
        };
        match engine.speak(&self.utterance) {
            Ok(()) => {
                self.speaking = true;
                debug!(
                    rate = self.utterance.rate,
                    chars = self.utterance.text.len(),
                    "Submitted utterance"
                );
            }
            Err(err) => warn!("Failed to submit utterance: {err:#}"),
        }
    }

    /// Like [`speak`](Self::speak), then runs `on_submitted` right away. The
    /// callback does not wait for the audio to finish.
    pub fn speak_with<F>(&mut self, text: &str, rate: Option<f32>, on_submitted: F)
    where
        F: FnOnce(&mut Self),
    {
        self.speak(text, rate);
        on_submitted(self);
    }

    pub fn set_rate_and_speak(&mut self, rate: f32, speak_headword_only: bool) {
        match sanitize_rate(rate) {
            Some(rate) => self.state.rate = rate,
            None => warn!(rate, "Ignoring non-finite speech rate"),
        }

        let Some(entry) = self.current_entry() else {
            debug!(index = self.state.index, "No card to speak");
            return;
        };
        if speak_headword_only {
            let headword = entry.headword.clone();
            self.speak(&headword, Some(self.headword_rate));
        } else {
            let text = entry.text.clone();
            self.speak(&text, Some(self.state.rate));
        }
    }

    pub fn cancel_speech(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            if let Err(err) = engine.cancel() {
                warn!("Failed to cancel speech: {err:#}");
            }
        }
        self.speaking = false;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            index: self.state.index,
            total: self.words.len(),
            headword: self.display_headword(),
            text: self.display_text(),
            rate: self.state.rate,
            speech: self.speech_state(),
        }
    }

    pub fn apply_command(&mut self, command: SessionCommand) -> SessionEvent {
        let action = command.action();
        match command {
            SessionCommand::GetSnapshot => {}
            SessionCommand::Navigate { delta } => {
                self.navigate(delta);
            }
            SessionCommand::JumpTo { input } => {
                self.jump_to(&input);
            }
            SessionCommand::SetRate {
                rate,
                headword_only,
            } => self.set_rate_and_speak(rate, headword_only),
            SessionCommand::CancelSpeech => self.cancel_speech(),
        }
        SessionEvent {
            action,
            snapshot: self.snapshot(),
        }
    }

    fn persist_index(&mut self, index: i64) {
        if let Err(err) = self.store.set(WORD_INDEX_KEY, &index.to_string()) {
            warn!(index, "Failed to persist card index: {err:#}");
        }
    }

    fn set_index(&mut self, index: i64) {
        let previous = self.state.index;
        self.state.index = index;
        if index != previous && index != 0 {
            self.auto_speak();
        }
    }

    /// Headword at the session rate, then the full text at the default rate.
    fn auto_speak(&mut self) {
        let Some(entry) = self.current_entry() else {
            debug!(index = self.state.index, "No card at index; nothing to speak");
            return;
        };
        let headword = entry.headword.clone();
        let text = entry.text.clone();
        let rate = self.state.rate;
        self.speak_with(&headword, Some(rate), move |session| {
            session.speak(&text, None)
        });
    }
}

fn restore_index(store: &impl KeyValueStore) -> i64 {
    match store.get(WORD_INDEX_KEY) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|err| {
            warn!(value = %raw, "Unparseable persisted index: {err}");
            DEFAULT_START_INDEX
        }),
        None => DEFAULT_START_INDEX,
    }
}
