//! Scrollable text pane shared by the event log and the report pages.

use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Vertical scroll position of a text pane.
///
/// Lines are expected to fit the pane already (see [`wrap_text`]), so one
/// line is one row and the scroll limit is exact.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrollView {
    /// Number of lines scrolled from the top.
    pub scroll_offset: usize,
    /// Largest useful offset, as of the last render.
    pub max_offset: usize,
}

impl ScrollView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns available to text inside the border and scrollbar.
    pub fn text_width(area: Rect) -> usize {
        usize::from(area.width.saturating_sub(3)).max(1)
    }

    /// Render `lines` inside a bordered block titled `title`.
    ///
    /// The offset is clamped to the last full page, so scrolling past the
    /// end never leaves the position out of view.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'_>>) {
        let total_lines = lines.len();
        let visible_lines = usize::from(area.height.saturating_sub(2));
        self.max_offset = total_lines.saturating_sub(visible_lines);
        self.scroll_offset = self.scroll_offset.min(self.max_offset);

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title.to_string()))
            .scroll((u16::try_from(self.scroll_offset).unwrap_or(u16::MAX), 0));
        frame.render_widget(paragraph, area);

        if total_lines > visible_lines {
            let mut scrollbar_state = ScrollbarState::default()
                .content_length(total_lines)
                .viewport_content_length(visible_lines)
                .position(self.scroll_offset);

            let scrollbar = Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));

            frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Scroll down by one line, stopping at the last full page.
    pub fn scroll_down(&mut self) {
        self.scroll_offset = (self.scroll_offset + 1).min(self.max_offset);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }
}

/// Greedy word wrap of one line to `width` columns.
///
/// Leading indentation is repeated on continuation rows. Words longer than
/// a row are split. An empty line stays one empty row.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    if text.chars().count() <= width {
        return vec![text.to_string()];
    }

    let indent_len = text.len() - text.trim_start().len();
    let indent = &text[..indent_len];
    let indent = if indent.chars().count() < width / 2 {
        indent
    } else {
        ""
    };
    let indent_width = indent.chars().count();

    let mut rows = Vec::new();
    let mut row = indent.to_string();
    let mut row_width = indent_width;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let gap = usize::from(row_width > indent_width);
            if row_width + gap + word.len() <= width {
                if gap == 1 {
                    row.push(' ');
                }
                row.extend(word.iter());
                row_width += gap + word.len();
                break;
            }
            if row_width > indent_width {
                rows.push(std::mem::replace(&mut row, indent.to_string()));
                row_width = indent_width;
                continue;
            }
            // The word alone is wider than a row.
            let take = width - indent_width;
            row.extend(word.drain(..take));
            rows.push(std::mem::replace(&mut row, indent.to_string()));
        }
    }
    if row_width > indent_width {
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw(view: &mut ScrollView, lines: Vec<Line<'static>>) -> String {
        let backend = TestBackend::new(40, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                view.render(frame, frame.area(), "Event Log", lines);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn numbered(count: usize) -> Vec<Line<'static>> {
        (0..count).map(|i| Line::from(format!("Line {i}"))).collect()
    }

    #[test]
    fn test_renders_title_and_lines() {
        let content = draw(&mut ScrollView::new(), numbered(3));
        assert!(content.contains("Event Log"));
        assert!(content.contains("Line 0"));
        assert!(content.contains("Line 2"));
    }

    #[test]
    fn test_offset_skips_leading_lines() {
        let mut view = ScrollView {
            scroll_offset: 2,
            max_offset: 0,
        };
        let content = draw(&mut view, numbered(8));
        assert!(!content.contains("Line 1"));
        assert!(content.contains("Line 2"));
        assert!(content.contains("Line 5"));
    }

    #[test]
    fn test_offset_is_clamped_to_last_page() {
        let mut view = ScrollView {
            scroll_offset: 100,
            max_offset: 0,
        };
        let content = draw(&mut view, numbered(8));
        // 4 visible rows: the last page is Line 4..=7.
        assert!(content.contains("Line 4"));
        assert!(content.contains("Line 7"));
        assert_eq!(view.scroll_offset, 4);
        assert_eq!(view.max_offset, 4);
    }

    #[test]
    fn test_scroll_up_responds_right_after_reaching_the_end() {
        let mut view = ScrollView::new();
        draw(&mut view, numbered(8));

        for _ in 0..20 {
            view.scroll_down();
        }
        assert_eq!(view.scroll_offset, 4);

        view.scroll_up();
        assert_eq!(view.scroll_offset, 3);
        let content = draw(&mut view, numbered(8));
        assert!(content.contains("Line 3"));
    }

    #[test]
    fn test_scroll_bounds() {
        let mut view = ScrollView::new();
        view.scroll_up();
        assert_eq!(view.scroll_offset, 0);

        // Nothing rendered yet, so there is nowhere to scroll.
        view.scroll_down();
        assert_eq!(view.scroll_offset, 0);

        view.max_offset = 1;
        view.scroll_down();
        view.scroll_down();
        assert_eq!(view.scroll_offset, 1);

        view.scroll_to_top();
        assert_eq!(view.scroll_offset, 0);
    }

    #[test]
    fn test_offset_beyond_u16_does_not_wrap() {
        let mut view = ScrollView {
            scroll_offset: 70_000,
            max_offset: 0,
        };
        let lines: Vec<Line<'static>> =
            (0..70_010).map(|i| Line::from(format!("L{i}"))).collect();
        let content = draw(&mut view, lines);
        // Saturates at the widest offset the terminal backend can express.
        assert!(content.contains("L65535"));
        assert!(!content.contains("L4464"));
        assert_eq!(view.scroll_offset, 70_000);
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("short", 10), vec!["short"]);
        assert_eq!(wrap_text("", 10), vec![""]);
        assert_eq!(
            wrap_text("alpha beta gamma delta", 11),
            vec!["alpha beta", "gamma delta"]
        );
        assert_eq!(wrap_text("  • one two three", 9), vec!["  • one", "  two", "  three"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }
}
