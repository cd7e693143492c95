//! Layout engine: per-column widths and the horizontal window.
//!
//! Given terminal width, a width table and a gap, this answers two
//! questions for the viewport: how many columns fit fully starting at a
//! scroll offset (forward count), and how many columns fit ending at a
//! target column (reverse count, used for right-anchored scrolling).

use unicode_width::UnicodeWidthStr;

use crate::data::table::TableBuffer;

/// A trailing column narrower than this many cells is dropped instead of
/// being drawn clipped.
pub const MIN_CLIP_WIDTH: u16 = 4;

/// How per-column widths are derived from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthMode {
    /// Every column gets the configured fixed width.
    Fixed,
    /// Widest observed cell per column, capped.
    Max,
    /// Most frequent cell length per column, unless the modal width sits
    /// close enough to the maximum that the maximum is used outright.
    Modal,
}

impl WidthMode {
    pub fn cycle(&self) -> Self {
        match self {
            WidthMode::Fixed => WidthMode::Max,
            WidthMode::Max => WidthMode::Modal,
            WidthMode::Modal => WidthMode::Fixed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WidthMode::Fixed => "fixed",
            WidthMode::Max => "max",
            WidthMode::Modal => "mode",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fixed" => Some(WidthMode::Fixed),
            "max" => Some(WidthMode::Max),
            "mode" => Some(WidthMode::Modal),
            _ => None,
        }
    }
}

/// Width-derivation settings, lifted from the display config.
#[derive(Debug, Clone, Copy)]
pub struct WidthPolicy {
    pub mode: WidthMode,
    pub fixed: u16,
    pub min: u16,
    pub max: u16,
    /// Modal mode switches to the maximum length when
    /// `max - modal <= max * slack / 100`.
    pub mode_slack_percent: u16,
}

impl WidthPolicy {
    /// One width per data column, honoring the active mode, floored and
    /// capped. The header row participates in the observed lengths since it
    /// is displayed in the same columns.
    pub fn compute(&self, table: &TableBuffer) -> Vec<u16> {
        (0..table.column_count())
            .map(|col| self.column_width(table, col))
            .collect()
    }

    fn column_width(&self, table: &TableBuffer, col: usize) -> u16 {
        let width = match self.mode {
            WidthMode::Fixed => self.fixed,
            WidthMode::Max => observed_max(table, col),
            WidthMode::Modal => {
                let max = observed_max(table, col);
                let modal = observed_modal(table, col);
                if max.saturating_sub(modal) <= max * self.mode_slack_percent / 100 {
                    max
                } else {
                    modal
                }
            }
        };
        width.clamp(self.min, self.max.max(self.min))
    }
}

fn cell_width(s: &str) -> u16 {
    UnicodeWidthStr::width(s).min(u16::MAX as usize) as u16
}

fn observed_max(table: &TableBuffer, col: usize) -> u16 {
    let mut max = cell_width(table.header().get(col).map(String::as_str).unwrap_or(""));
    for row in table.rows() {
        if let Some(cell) = row.get(col) {
            max = max.max(cell_width(cell));
        }
    }
    max
}

/// Most frequent cell width in the column; ties break toward the wider
/// width so frequent short cells cannot starve slightly longer ones.
fn observed_modal(table: &TableBuffer, col: usize) -> u16 {
    use std::collections::HashMap;
    let mut counts: HashMap<u16, usize> = HashMap::new();
    for row in table.rows() {
        if let Some(cell) = row.get(col) {
            *counts.entry(cell_width(cell)).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .max_by_key(|&(width, count)| (count, width))
        .map(|(width, _)| width)
        .unwrap_or(0)
}

/// Grow or shrink one width by roughly 20%, never below one cell.
pub fn scale_width(width: &mut u16, grow: bool) {
    let step = (*width / 5).max(1);
    *width = if grow {
        width.saturating_add(step)
    } else {
        width.saturating_sub(step).max(1)
    };
}

pub fn scale_widths(widths: &mut [u16], grow: bool) {
    for w in widths {
        scale_width(w, grow);
    }
}

/// A column visible at the current horizontal scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleColumn {
    /// Absolute column index in the table.
    pub index: usize,
    /// X offset of the cell's first character, in terminal cells.
    pub x: u16,
    /// Width available for the cell content.
    pub width: u16,
    /// True for a trailing partially-fitting column.
    pub clipped: bool,
}

/// Snapshot of the horizontal geometry for one frame.
#[derive(Debug, Clone)]
pub struct Layout {
    widths: Vec<u16>,
    gap: u16,
    term_width: u16,
}

impl Layout {
    pub fn new(widths: Vec<u16>, gap: u16, term_width: u16) -> Self {
        Self {
            widths,
            gap,
            term_width,
        }
    }

    pub fn column_count(&self) -> usize {
        self.widths.len()
    }

    /// Number of columns fully accommodated starting at `start`: cells plus
    /// the trailing gap are accumulated until the next column would exceed
    /// the terminal width. Always at least 1 while columns remain, so a
    /// single over-wide column still occupies the screen.
    pub fn fit_forward(&self, start: usize) -> usize {
        let mut used = 0u32;
        let mut count = 0usize;
        for &w in self.widths.iter().skip(start) {
            let need = u32::from(w) + u32::from(self.gap);
            if used + need > u32::from(self.term_width) {
                break;
            }
            used += need;
            count += 1;
        }
        if count == 0 && start < self.widths.len() {
            1
        } else {
            count
        }
    }

    /// Symmetric reverse count: how many columns ending at `end` (inclusive)
    /// fit on screen. Used to step the window back so a target column
    /// becomes the last fully visible one.
    pub fn fit_backward(&self, end: usize) -> usize {
        let mut used = 0u32;
        let mut count = 0usize;
        for &w in self.widths.iter().take(end + 1).rev() {
            let need = u32::from(w) + u32::from(self.gap);
            if used + need > u32::from(self.term_width) {
                break;
            }
            used += need;
            count += 1;
        }
        count.max(1)
    }

    /// The window start that right-aligns the last column set against the
    /// end of data.
    pub fn right_anchor(&self, last_col: usize) -> usize {
        last_col + 1 - self.fit_backward(last_col).min(last_col + 1)
    }

    /// Fully visible columns from `win_x`, plus a trailing clipped column
    /// when at least `MIN_CLIP_WIDTH` cells of width remain.
    pub fn visible(&self, win_x: usize) -> Vec<VisibleColumn> {
        let full = self.fit_forward(win_x);
        let mut cols = Vec::with_capacity(full + 1);
        let mut x = 0u16;
        for (i, &w) in self.widths.iter().enumerate().skip(win_x).take(full) {
            cols.push(VisibleColumn {
                index: i,
                x,
                width: w,
                clipped: false,
            });
            x = x.saturating_add(w).saturating_add(self.gap);
        }
        let next = win_x + full;
        if next < self.widths.len() {
            let remaining = self.term_width.saturating_sub(x);
            if remaining >= MIN_CLIP_WIDTH {
                cols.push(VisibleColumn {
                    index: next,
                    x,
                    width: remaining.min(self.widths[next]),
                    clipped: true,
                });
            }
        }
        cols
    }
}
