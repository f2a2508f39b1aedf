use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use spellbee::engine::scoring::MAX_STARS;
use spellbee::session::{DrillMode, Outcome, SessionReport};

use crate::ui::theme::Theme;

pub struct Results<'a> {
    pub report: &'a SessionReport,
    pub theme: &'a Theme,
}

impl<'a> Results<'a> {
    pub fn new(report: &'a SessionReport, theme: &'a Theme) -> Self {
        Self { report, theme }
    }
}

fn star_line(stars: u8) -> String {
    (0..MAX_STARS)
        .map(|i| if i < stars { "\u{2605}" } else { "\u{2606}" })
        .collect::<Vec<_>>()
        .join(" ")
}

fn answer_note(outcome: &Outcome) -> String {
    match outcome.mode {
        DrillMode::Spelling => t!("results.you_spelled", answer = outcome.user_answer).to_string(),
        DrillMode::MultipleChoice => t!("results.you_chose", answer = outcome.user_answer).to_string(),
    }
}

impl Widget for Results<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("results.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            star_line(self.report.stars),
            Style::default().fg(colors.star()).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let score = t!(
            "results.score",
            correct = self.report.correct,
            total = self.report.total
        );
        Paragraph::new(Line::from(Span::styled(
            score.to_string(),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[1], buf);

        let (cheer, cheer_color) = if self.report.celebrate {
            (t!("results.celebrate"), colors.success())
        } else {
            (t!("results.keep_going"), colors.text_pending())
        };
        Paragraph::new(Line::from(Span::styled(cheer.to_string(), Style::default().fg(cheer_color))))
            .alignment(Alignment::Center)
            .render(layout[2], buf);

        let lines: Vec<Line> = self
            .report
            .outcomes
            .iter()
            .map(|outcome| {
                if outcome.correct {
                    Line::from(vec![
                        Span::styled("  \u{2713} ", Style::default().fg(colors.success())),
                        Span::styled(outcome.word.clone(), Style::default().fg(colors.fg())),
                    ])
                } else {
                    Line::from(vec![
                        Span::styled("  \u{2717} ", Style::default().fg(colors.error())),
                        Span::styled(outcome.word.clone(), Style::default().fg(colors.fg())),
                        Span::styled(
                            format!("  {}", answer_note(outcome)),
                            Style::default().fg(colors.text_pending()),
                        ),
                    ])
                }
            })
            .collect();
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(layout[3], buf);

        Paragraph::new(Line::from(Span::styled(
            format!("  {}", t!("results.hints")),
            Style::default().fg(colors.accent()),
        )))
        .render(layout[4], buf);
    }
}
