use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::layout;
use crate::ui::theme::Theme;

/// Numbered whole-word buttons. After a pick the correct word turns green
/// and a wrong pick turns red.
pub struct WordChoices<'a> {
    pub choices: &'a [String],
    pub chosen: Option<&'a str>,
    pub target: Option<&'a str>,
    pub theme: &'a Theme,
}

/// Index of the button drawn at (`column`, `row`).
pub fn choice_at(area: Rect, count: usize, column: u16, row: u16) -> Option<usize> {
    layout::choice_rects(area, count)
        .into_iter()
        .position(|r| layout::contains(r, column, row))
}

impl Widget for WordChoices<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let rects = layout::choice_rects(area, self.choices.len());

        for (i, (choice, rect)) in self.choices.iter().zip(rects).enumerate() {
            let picked = self.chosen == Some(choice.as_str());
            let is_target = self.target == Some(choice.as_str());

            let border = match self.chosen {
                Some(_) if is_target => colors.success(),
                Some(_) if picked => colors.error(),
                _ => colors.border(),
            };
            let mut text = Style::default().fg(colors.fg());
            if picked {
                text = text.add_modifier(Modifier::BOLD);
            }

            Paragraph::new(format!("{}  {choice}", i + 1))
                .style(text)
                .alignment(Alignment::Center)
                .block(Block::bordered().border_style(Style::default().fg(border)))
                .render(rect, buf);
        }
    }
}
