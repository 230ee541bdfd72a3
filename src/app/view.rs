use super::messages::Message;
use super::state::App;
use flashcard_core::SpeechState;
use flashcard_core::speech::RATE_PRESETS;
use iced::alignment::{Horizontal, Vertical};
use iced::widget::text::Wrapping;
use iced::widget::{Row, button, column, container, row, text, text_input};
use iced::{Element, Length};

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let font_size = self.config.font_size as f32;

        let headword = button(
            text(self.session.display_headword())
                .size(font_size * 2.2)
                .width(Length::Fill)
                .align_x(Horizontal::Center),
        )
        .style(button::text)
        .width(Length::Fill)
        .on_press(Message::EmphasizeHeadword);

        let body = text(self.session.display_text())
            .size(font_size)
            .width(Length::Fill)
            .wrapping(Wrapping::WordOrGlyph)
            .align_x(Horizontal::Center);

        let navigation = row![
            button("Prev")
                .on_press(Message::PreviousCard)
                .width(Length::FillPortion(1)),
            button("Next")
                .on_press(Message::NextCard)
                .width(Length::FillPortion(1)),
        ]
        .spacing(12);

        let jump = text_input("#", &self.jump_input)
            .on_input(Message::JumpInputChanged)
            .size(font_size * 0.8)
            .align_x(Horizontal::Center)
            .width(Length::Fill);

        let controls = column![
            navigation,
            jump,
            self.rate_buttons(),
            button("STOP")
                .on_press(Message::StopSpeech)
                .style(button::danger)
                .width(Length::Fill),
            text(self.status_label()).size(14),
        ]
        .spacing(12)
        .max_width(420.0);

        let content = column![headword, body, controls]
            .spacing(32)
            .padding(24)
            .align_x(Horizontal::Center)
            .width(Length::Fill);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Center)
            .into()
    }

    fn rate_buttons(&self) -> Row<'_, Message> {
        let current = self.session.rate();
        RATE_PRESETS
            .iter()
            .fold(Row::new().spacing(8), |row, &rate| {
                let label = format!("x{rate}");
                let style = if (rate - current).abs() < f32::EPSILON {
                    button::primary
                } else {
                    button::secondary
                };
                row.push(
                    button(text(label).align_x(Horizontal::Center).width(Length::Fill))
                        .on_press(Message::SetRate(rate))
                        .style(style)
                        .width(Length::FillPortion(1)),
                )
            })
    }

    fn status_label(&self) -> String {
        let speech = if !self.session.has_engine() {
            "speech off"
        } else if self.session.speech_state() == SpeechState::Speaking {
            "speaking"
        } else {
            "idle"
        };
        format!(
            "{} · x{} · {}",
            self.session.position_label(),
            self.session.rate(),
            speech
        )
    }
}
