//! Frame drawing: status line, rule, header and the grid itself.
//!
//! Layout offsets come straight from the layout engine, so each line is
//! assembled as one span per visible column padded to its layout width
//! plus the gap. The cursor cell renders in reverse video.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::ui::popup;
use crate::ui::viewer::Viewer;

pub fn draw(f: &mut Frame, viewer: &Viewer) {
    let area = f.area();
    if area.height < 3 || area.width == 0 {
        return;
    }

    draw_status(f, viewer, Rect::new(area.x, area.y, area.width, 1));
    draw_rule(f, Rect::new(area.x, area.y + 1, area.width, 1));

    let offset = viewer.header_offset();
    if viewer.table.header_shown() {
        draw_header(f, viewer, Rect::new(area.x, area.y + 2, area.width, 1));
    }
    if area.height > offset {
        let grid = Rect::new(area.x, area.y + offset, area.width, area.height - offset);
        draw_grid(f, viewer, grid);
    }

    popup::draw_overlay(f, viewer);
}

/// Spreadsheet-style label for an absolute position: columns A..Z then
/// AA..ZZ, rows 1-based. Columns past ZZ fall back to a plain number.
pub fn coord_label(row: usize, col: usize) -> String {
    let letters = if col < 26 {
        String::from((b'A' + col as u8) as char)
    } else if col < 702 {
        let c = col - 26;
        let first = (b'A' + (c / 26) as u8) as char;
        let second = (b'A' + (c % 26) as u8) as char;
        format!("{}{}", first, second)
    } else {
        format!("C{}", col + 1)
    };
    format!("{}-{}", letters, row + 1)
}

/// Newlines inside a cell would wreck the single-line grid.
fn sanitize(s: &str) -> String {
    if s.contains('\n') || s.contains('\r') {
        s.replace('\r', "").replace('\n', "\\n")
    } else {
        s.to_string()
    }
}

/// Fit `s` into exactly `width` display cells: pad with spaces, or clip
/// with a trailing continuation marker.
fn clip_cell(s: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let full = UnicodeWidthStr::width(s);
    if full <= width {
        let mut out = String::with_capacity(s.len() + width - full);
        out.push_str(s);
        out.extend(std::iter::repeat(' ').take(width - full));
        return out;
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width.saturating_sub(1) {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}

fn draw_status(f: &mut Frame, viewer: &Viewer, area: Rect) {
    let row = viewer.view.cursor_row();
    let col = viewer.view.cursor_col();
    let label = format!("  {}  ", coord_label(row, col));
    let content = sanitize(viewer.table.cell(row, col));

    let mut spans = vec![
        Span::styled(label, Style::default().add_modifier(Modifier::REVERSED)),
        Span::raw("  "),
        Span::raw(content),
    ];
    let pending = viewer.dispatcher.pending();
    if !pending.is_empty() {
        spans.push(Span::styled(
            format!("  {}", pending),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_rule(f: &mut Frame, area: Rect) {
    f.render_widget(
        Paragraph::new(Line::from("─".repeat(area.width as usize))),
        area,
    );
}

fn draw_header(f: &mut Frame, viewer: &Viewer, area: Rect) {
    let layout = viewer.layout();
    let gap = " ".repeat(viewer.gap as usize);
    let header = viewer.table.header();
    let mut spans = Vec::new();
    for col in layout.visible(viewer.view.win_x) {
        let cell = header.get(col.index).map(String::as_str).unwrap_or("");
        spans.push(Span::styled(
            clip_cell(&sanitize(cell), col.width as usize),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(gap.clone()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_grid(f: &mut Frame, viewer: &Viewer, area: Rect) {
    let layout = viewer.layout();
    let visible = layout.visible(viewer.view.win_x);
    let gap = " ".repeat(viewer.gap as usize);
    let rows = viewer.table.row_count();

    let mut lines = Vec::with_capacity(area.height as usize);
    for y in 0..area.height as usize {
        let yp = viewer.view.win_y + y;
        let mut spans = Vec::with_capacity(visible.len() * 2);
        for col in &visible {
            let text = clip_cell(
                &sanitize(viewer.table.cell(yp, col.index)),
                col.width as usize,
            );
            let style = if y == viewer.view.y && col.index == viewer.view.cursor_col() && yp < rows
            {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            spans.push(Span::styled(text, style));
            spans.push(Span::raw(gap.clone()));
        }
        lines.push(Line::from(spans));
    }
    f.render_widget(Paragraph::new(Text::from(lines)), area);
}
