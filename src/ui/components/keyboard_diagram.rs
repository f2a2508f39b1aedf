use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::ui::layout;
use crate::ui::theme::Theme;

/// On-screen keyboard offering only the currently visible letters.
pub struct KeyboardDiagram<'a> {
    pub visible: &'a [char],
    /// Whether clicks are live; keys are drawn dimmed otherwise.
    pub enabled: bool,
    pub theme: &'a Theme,
}

impl<'a> KeyboardDiagram<'a> {
    pub fn new(visible: &'a [char], enabled: bool, theme: &'a Theme) -> Self {
        Self {
            visible,
            enabled,
            theme,
        }
    }
}

const ROWS: &[&[char]] = &[
    &['q', 'w', 'e', 'r', 't', 'y', 'u', 'i', 'o', 'p'],
    &['a', 's', 'd', 'f', 'g', 'h', 'j', 'k', 'l'],
    &['z', 'x', 'c', 'v', 'b', 'n', 'm'],
];

const KEY_WIDTH: u16 = 5;
const ROW_OFFSETS: [u16; 3] = [0, 2, 5];

/// Screen cell of every key that fits inside the bordered `area`.
fn key_cells(area: Rect) -> Vec<(char, Rect)> {
    let inner = Block::bordered().inner(area);
    let board_width = KEY_WIDTH * ROWS[0].len() as u16;
    let left = inner.x + inner.width.saturating_sub(board_width) / 2;

    let mut cells = Vec::with_capacity(26);
    for (row_idx, row) in ROWS.iter().enumerate() {
        let y = inner.y + row_idx as u16;
        if y >= inner.y + inner.height {
            break;
        }
        for (col_idx, &key) in row.iter().enumerate() {
            let x = left + ROW_OFFSETS[row_idx] + col_idx as u16 * KEY_WIDTH;
            if x + KEY_WIDTH > inner.x + inner.width {
                break;
            }
            cells.push((key, Rect::new(x, y, KEY_WIDTH, 1)));
        }
    }
    cells
}

/// The visible key drawn at (`column`, `row`), if any.
pub fn key_at(area: Rect, visible: &[char], column: u16, row: u16) -> Option<char> {
    key_cells(area)
        .into_iter()
        .find(|(key, cell)| visible.contains(key) && layout::contains(*cell, column, row))
        .map(|(key, _)| key)
}

impl Widget for KeyboardDiagram<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("practice.keyboard_title")))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        block.render(area, buf);

        for (key, cell) in key_cells(area) {
            if !self.visible.contains(&key) {
                continue;
            }
            let style = if self.enabled {
                Style::default()
                    .fg(colors.fg())
                    .bg(colors.key_visible())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.text_pending()).bg(colors.bg())
            };
            buf.set_string(cell.x, cell.y, format!("[ {key} ]"), style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_test_finds_visible_keys_only() {
        let area = Rect::new(0, 0, 60, 5);
        let cells = key_cells(area);
        assert_eq!(cells.len(), 26);

        let (_, q) = cells[0];
        assert_eq!(key_at(area, &['q'], q.x + 2, q.y), Some('q'));
        assert_eq!(key_at(area, &['a'], q.x + 2, q.y), None);
    }

    #[test]
    fn narrow_area_drops_keys() {
        let cells = key_cells(Rect::new(0, 0, 20, 5));
        assert!(cells.len() < 26);
    }
}
