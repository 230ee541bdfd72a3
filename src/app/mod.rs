mod messages;
mod state;
mod update;
mod view;

pub use state::App;

use flashcard_core::WordList;
use flashcard_core::config::{AppConfig, ThemeMode};
use iced::{Size, Theme, window};

/// Launch the viewer for an already-loaded word list.
pub fn run_app(words: WordList, dataset_id: String, config: AppConfig) -> iced::Result {
    let window_settings = window::Settings {
        size: Size::new(config.window_width, config.window_height),
        ..window::Settings::default()
    };

    iced::application("Flashcards", App::update, App::view)
        .window(window_settings)
        .subscription(App::subscription)
        .theme(|app: &App| {
            if matches!(app.config.theme, ThemeMode::Night) {
                Theme::Dark
            } else {
                Theme::Light
            }
        })
        .run_with(move || App::bootstrap(words, dataset_id, config))
}
