use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Frame shared by every screen: title bar, body, hint footer.
pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        Self {
            header: vertical[0],
            main: vertical[1],
            footer: vertical[2],
        }
    }
}

/// Body of the practice screen. Rendering and mouse hit-testing both go
/// through this so clicks land on what was drawn.
pub struct PracticeLayout {
    pub status: Rect,
    pub slots: Rect,
    pub board: Rect,
}

impl PracticeLayout {
    pub fn new(main: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Min(5),
            ])
            .split(main);

        Self {
            status: vertical[0],
            slots: vertical[1],
            board: vertical[2],
        }
    }

    pub fn for_viewport(viewport: Rect) -> Self {
        Self::new(AppLayout::new(viewport).main)
    }
}

/// Stacked buttons for multiple choice, three rows each, inside `area`.
pub fn choice_rects(area: Rect, count: usize) -> Vec<Rect> {
    const BUTTON_HEIGHT: u16 = 3;
    const BUTTON_WIDTH: u16 = 40;

    let width = area.width.min(BUTTON_WIDTH);
    let left = area.x + (area.width - width) / 2;
    (0..count)
        .map(|i| Rect::new(left, area.y + i as u16 * BUTTON_HEIGHT, width, BUTTON_HEIGHT))
        .take_while(|r| r.y + r.height <= area.y + area.height)
        .collect()
}

pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = "  ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 48;
    const MIN_POPUP_HEIGHT: u16 = 14;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_buttons_stack_and_stay_inside() {
        let area = Rect::new(0, 10, 80, 10);
        let rects = choice_rects(area, 5);
        assert_eq!(rects.len(), 3);
        assert_eq!(rects[1].y, 13);
        assert!(rects.iter().all(|r| r.x == 20 && r.width == 40));
    }

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::new(2, 2, 3, 3);
        assert!(contains(rect, 2, 2));
        assert!(contains(rect, 4, 4));
        assert!(!contains(rect, 5, 4));
    }

    #[test]
    fn hints_wrap_by_width() {
        let lines = pack_hint_lines(&["[Tab] Voice", "[Space] Again", "[Esc] Menu"], 28);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  [Tab] Voice"));
    }
}
