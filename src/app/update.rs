use super::messages::Message;
use super::state::App;
use flashcard_core::SpeechState;
use iced::keyboard::{self, Key, Modifiers, key::Named};
use iced::{Event, Subscription, Task, event, time, window};
use std::time::Duration;
use tracing::debug;

impl App {
    pub fn subscription(app: &App) -> Subscription<Message> {
        let mut subscriptions: Vec<Subscription<Message>> =
            vec![event::listen_with(runtime_event_to_message)];

        // Poll so the status line settles back to idle when audio runs out.
        if app.session.speech_state() == SpeechState::Speaking {
            subscriptions.push(time::every(Duration::from_millis(250)).map(Message::Tick));
        }

        Subscription::batch(subscriptions)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        self.reduce(message);
        Task::none()
    }

    fn reduce(&mut self, message: Message) {
        match message {
            Message::PreviousCard => self.handle_navigate(-1),
            Message::NextCard => self.handle_navigate(1),
            Message::JumpInputChanged(value) => self.handle_jump_input_changed(value),
            Message::SetRate(rate) => self.session.set_rate_and_speak(rate, false),
            Message::EmphasizeHeadword => {
                let rate = self.session.rate();
                self.session.set_rate_and_speak(rate, true);
            }
            Message::StopSpeech => self.session.cancel_speech(),
            Message::KeyPressed { key, modifiers } => {
                if let Some(shortcut) = shortcut_message_for_key(&key, modifiers) {
                    self.reduce(shortcut);
                }
            }
            Message::Tick(_) => {}
        }
    }

    fn handle_navigate(&mut self, delta: i64) {
        if self.session.navigate(delta) {
            self.sync_jump_input();
        }
    }

    fn handle_jump_input_changed(&mut self, value: String) {
        let committed = self.session.jump_to(&value);
        debug!(input = %value, committed, index = self.session.index(), "Jump input changed");
        self.jump_input = value;
    }
}

fn runtime_event_to_message(
    event: Event,
    status: event::Status,
    _window_id: window::Id,
) -> Option<Message> {
    if status == event::Status::Captured {
        return None;
    }
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            Some(Message::KeyPressed { key, modifiers })
        }
        _ => None,
    }
}

fn shortcut_message_for_key(key: &Key, modifiers: Modifiers) -> Option<Message> {
    if modifiers.control() || modifiers.alt() || modifiers.logo() {
        return None;
    }
    match key.as_ref() {
        Key::Named(Named::ArrowLeft) => Some(Message::PreviousCard),
        Key::Named(Named::ArrowRight) => Some(Message::NextCard),
        Key::Named(Named::Escape) => Some(Message::StopSpeech),
        Key::Character("h") => Some(Message::EmphasizeHeadword),
        _ => None,
    }
}
