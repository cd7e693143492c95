//! Overlay windows: full-cell view, keybinding help, table metadata, and
//! the search prompt.

use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::ui::actions;
use crate::ui::render::coord_label;
use crate::ui::viewer::{Overlay, Viewer};

/// A rect of at most `width` x `height`, centered in `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Greedy word wrap by display width, with continuation lines indented two
/// cells. Words longer than the width stay unbroken on their own line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(8);
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        if raw.split_whitespace().next().is_none() {
            lines.push(String::new());
            continue;
        }
        let mut line = String::new();
        for word in raw.split_whitespace() {
            let sep = if line.is_empty() { 0 } else { 1 };
            if !line.trim().is_empty()
                && UnicodeWidthStr::width(line.as_str()) + sep + UnicodeWidthStr::width(word)
                    > width
            {
                lines.push(std::mem::take(&mut line));
                line.push_str("  ");
            }
            if !line.is_empty() && !line.ends_with(' ') {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

pub fn draw_overlay(f: &mut Frame, viewer: &Viewer) {
    match &viewer.overlay {
        Overlay::None => {}
        Overlay::Cell { lines, scroll } => {
            draw_text_popup(f, "Cell", lines, *scroll, viewer.behavior.popup_wrap_width + 4);
        }
        Overlay::Help { scroll } => {
            let lines: Vec<String> = actions::bindings()
                .iter()
                .map(|(keys, what)| format!("{:<20} {}", keys, what))
                .collect();
            draw_text_popup(f, "Keys", &lines, *scroll, 64);
        }
        Overlay::Metadata => {
            let lines = metadata_lines(viewer);
            draw_text_popup(f, "Table", &lines, 0, 48);
        }
        Overlay::SearchInput { input } => {
            let area = f.area();
            let popup = centered_rect(44, 3, area);
            f.render_widget(Clear, popup);
            let prompt = format!("Search: {}", input.value());
            f.render_widget(
                Paragraph::new(prompt).block(Block::default().borders(Borders::ALL)),
                popup,
            );
            let cursor_x = popup.x + 1 + 8 + input.visual_cursor() as u16;
            f.set_cursor_position((cursor_x.min(popup.right().saturating_sub(2)), popup.y + 1));
        }
    }
}

fn draw_text_popup(f: &mut Frame, title: &str, lines: &[String], scroll: u16, max_width: u16) {
    let area = f.area();
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup = centered_rect(max_width, height.max(3), area);
    f.render_widget(Clear, popup);
    let text: Vec<Line> = lines.iter().map(|l| Line::from(l.as_str())).collect();
    let max_scroll = (lines.len() as u16).saturating_sub(popup.height.saturating_sub(2));
    f.render_widget(
        Paragraph::new(text)
            .scroll((scroll.min(max_scroll), 0))
            .block(Block::default().borders(Borders::ALL).title(title.to_string())),
        popup,
    );
}

fn metadata_lines(viewer: &Viewer) -> Vec<String> {
    let mut lines = vec![
        format!("source     {}", viewer.table.name()),
        format!("rows       {}", viewer.table.row_count()),
        format!("columns    {}", viewer.table.column_count()),
        format!(
            "header     {}",
            if viewer.table.header_shown() {
                "shown"
            } else {
                "hidden"
            }
        ),
        format!("widths     {}", viewer.policy.mode.label()),
        format!("gap        {}", viewer.gap),
    ];
    if viewer.search.is_active() {
        lines.push(format!(
            "search     '{}' ({}/{})",
            viewer.search.term(),
            viewer.search.current_number(),
            viewer.search.match_count()
        ));
    }
    if let Some((row, col)) = viewer.mark {
        lines.push(format!("mark       {}", coord_label(row, col)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_breaks_on_words_and_indents_continuations() {
        let lines = wrap_text("alpha beta gamma delta", 11);
        assert_eq!(lines, vec!["alpha beta", "  gamma", "  delta"]);
    }

    #[test]
    fn wrap_keeps_blank_lines() {
        let lines = wrap_text("a\n\nb", 20);
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn wrap_leaves_long_words_unbroken() {
        let lines = wrap_text("tiny incomprehensibilities", 10);
        assert_eq!(lines, vec!["tiny", "  incomprehensibilities"]);
    }

    #[test]
    fn centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        let r = centered_rect(40, 40, area);
        assert_eq!((r.width, r.height), (20, 10));
        let r = centered_rect(10, 4, area);
        assert_eq!((r.x, r.y, r.width, r.height), (5, 3, 10, 4));
    }
}
