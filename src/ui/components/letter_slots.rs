use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use spellbee::session::attempt::{WordAttempt, is_separator};

use crate::ui::theme::Theme;

/// One box per character of the word. Filled boxes show the entered letter,
/// coloured by whether it matched; the target itself is revealed only once
/// the attempt is sealed.
pub struct LetterSlots<'a> {
    attempt: &'a WordAttempt,
    reveal: bool,
    theme: &'a Theme,
}

impl<'a> LetterSlots<'a> {
    pub fn new(attempt: &'a WordAttempt, reveal: bool, theme: &'a Theme) -> Self {
        Self {
            attempt,
            reveal,
            theme,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum SlotState {
    Gap,
    Filled { letter: char, correct: bool },
    Cursor,
    Empty,
}

fn slot_states(attempt: &WordAttempt) -> Vec<SlotState> {
    let mut letter_idx = 0;
    attempt
        .slots
        .iter()
        .enumerate()
        .map(|(i, &ch)| {
            if is_separator(ch) {
                return SlotState::Gap;
            }
            let state = match attempt.entered.get(letter_idx) {
                Some(&letter) => SlotState::Filled {
                    letter,
                    correct: letter == attempt.expected[letter_idx],
                },
                None if i == attempt.cursor && attempt.is_accepting() => SlotState::Cursor,
                None => SlotState::Empty,
            };
            letter_idx += 1;
            state
        })
        .collect()
}

impl Widget for LetterSlots<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let mut spans = Vec::new();
        for state in slot_states(self.attempt) {
            let (text, style) = match state {
                SlotState::Gap => ("   ".to_string(), Style::default()),
                SlotState::Filled { letter, correct: true } => (
                    format!(" {letter} "),
                    Style::default().fg(colors.text_correct()).add_modifier(Modifier::BOLD),
                ),
                SlotState::Filled { letter, correct: false } => (
                    format!(" {letter} "),
                    Style::default()
                        .fg(colors.text_incorrect())
                        .bg(colors.text_incorrect_bg())
                        .add_modifier(Modifier::UNDERLINED),
                ),
                SlotState::Cursor => (
                    " _ ".to_string(),
                    Style::default().fg(colors.text_cursor_fg()).bg(colors.text_cursor_bg()),
                ),
                SlotState::Empty => (" _ ".to_string(), Style::default().fg(colors.text_pending())),
            };
            spans.push(Span::styled(text, style));
        }

        let mut lines = vec![Line::from(spans)];
        if self.reveal && !self.attempt.is_correct() {
            lines.push(Line::from(Span::styled(
                t!("practice.correct_spelling", word = self.attempt.word).to_string(),
                Style::default().fg(colors.accent()),
            )));
        }

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
