//! UI-independent core of the flashcard viewer: word list, persisted position,
//! speech sequencing and configuration.

pub mod config;
pub mod dataset;
pub mod session;
pub mod speech;
pub mod store;

pub use dataset::{EntryId, WordEntry, WordList, load_word_list, parse_word_list};
pub use session::{
    FlashcardSession, SessionCommand, SessionEvent, SessionOptions, SessionSnapshot,
};
pub use speech::{SpeechEngine, SpeechState, Utterance};
pub use store::{FileStore, KeyValueStore, MemoryStore};
