use super::messages::Message;
use crate::tts::TtsEngine;
use flashcard_core::config::AppConfig;
use flashcard_core::{FileStore, FlashcardSession, SessionOptions, WordList};
use iced::Task;
use std::path::PathBuf;
use tracing::{info, warn};

pub(super) type Session = FlashcardSession<TtsEngine, FileStore>;

fn tts_engine_from_config(config: &AppConfig) -> Option<TtsEngine> {
    TtsEngine::new(
        config.tts_model_path.clone().into(),
        config.tts_espeak_path.clone().into(),
        PathBuf::from(&config.cache_dir).join("tts"),
    )
    .map_err(|err| warn!("Speech disabled: {err:#}"))
    .ok()
}

/// Window state: the controller session plus the raw jump field text.
pub struct App {
    pub(super) session: Session,
    pub(super) config: AppConfig,
    pub(super) jump_input: String,
}

impl App {
    pub(super) fn bootstrap(
        words: WordList,
        dataset_id: String,
        config: AppConfig,
    ) -> (App, Task<Message>) {
        let store = FileStore::for_dataset(&PathBuf::from(&config.cache_dir), &dataset_id);
        info!(
            dataset = %dataset_id,
            store = %store.path().display(),
            "Using position store"
        );
        let engine = tts_engine_from_config(&config);
        let session = FlashcardSession::open(words, store, engine, SessionOptions::from(&config));
        let mut app = App {
            session,
            config,
            jump_input: String::new(),
        };
        app.sync_jump_input();
        (app, Task::none())
    }

    /// Mirror the session position (1-based) into the jump field.
    pub(super) fn sync_jump_input(&mut self) {
        self.jump_input = (self.session.index() + 1).to_string();
    }
}
