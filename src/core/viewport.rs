//! Viewport/cursor state machine.
//!
//! State is four scalars: the in-window cursor `(x, y)` and the scroll
//! offset `(win_x, win_y)` of the window's top-left cell. The absolute
//! cursor is `(win_y + y, win_x + x)`. Every operation keeps the invariant
//! that the absolute cursor stays inside the table and inside the window.
//!
//! `goto_row`/`goto_col` are the primitives most commands reduce to: a
//! target already inside the visible band moves only the in-window cursor;
//! a target above/left scrolls it to the top/left edge; a target
//! below/right scrolls it to the bottom/right edge.

use tracing::debug;

use crate::core::layout::Layout;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// In-window cursor column.
    pub x: usize,
    /// In-window cursor row.
    pub y: usize,
    /// Horizontal scroll offset.
    pub win_x: usize,
    /// Vertical scroll offset.
    pub win_y: usize,
}

impl Viewport {
    pub fn cursor_row(&self) -> usize {
        self.win_y + self.y
    }

    pub fn cursor_col(&self) -> usize {
        self.win_x + self.x
    }

    /// Vertical goto primitive. `rows` is the data row count, `page_rows`
    /// the window height in rows.
    pub fn goto_row(&mut self, target: usize, rows: usize, page_rows: usize) {
        if rows == 0 {
            self.y = 0;
            self.win_y = 0;
            return;
        }
        let page_rows = page_rows.max(1);
        let target = target.min(rows - 1);
        if target >= self.win_y && target < self.win_y + page_rows {
            self.y = target - self.win_y;
        } else if target < self.win_y {
            self.win_y = target;
            self.y = 0;
        } else {
            self.win_y = target + 1 - page_rows;
            self.y = page_rows - 1;
        }
        debug!(target: "viewport", "goto_row {} -> win_y={} y={}", target, self.win_y, self.y);
    }

    /// Horizontal goto primitive. `cols` is the addressable column count
    /// for the current row.
    pub fn goto_col(&mut self, target: usize, cols: usize, layout: &Layout) {
        if cols == 0 {
            self.x = 0;
            self.win_x = 0;
            return;
        }
        let target = target.min(cols - 1);
        let fit = layout.fit_forward(self.win_x);
        if target >= self.win_x && target < self.win_x + fit {
            self.x = target - self.win_x;
        } else if target < self.win_x {
            self.win_x = target;
            self.x = 0;
        } else {
            self.win_x = layout.right_anchor(target);
            self.x = target - self.win_x;
        }
        debug!(target: "viewport", "goto_col {} -> win_x={} x={}", target, self.win_x, self.x);
    }

    pub fn move_up(&mut self, count: usize, rows: usize, page_rows: usize) {
        self.goto_row(self.cursor_row().saturating_sub(count), rows, page_rows);
    }

    pub fn move_down(&mut self, count: usize, rows: usize, page_rows: usize) {
        self.goto_row(self.cursor_row().saturating_add(count), rows, page_rows);
    }

    pub fn move_left(&mut self, count: usize, cols: usize, layout: &Layout) {
        self.goto_col(self.cursor_col().saturating_sub(count), cols, layout);
    }

    /// Step right, stopping at the end of the current row.
    pub fn move_right(&mut self, count: usize, row_len: usize, layout: &Layout) {
        if row_len == 0 {
            return;
        }
        let target = self.cursor_col().saturating_add(count).min(row_len - 1);
        self.goto_col(target, row_len, layout);
    }

    /// Move down a full window of rows. The last page is special-cased: the
    /// window never scrolls past the point where the final row would leave
    /// blank trailing space, and the cursor pins to the true last row.
    pub fn page_down(&mut self, rows: usize, page_rows: usize) {
        if rows == 0 {
            return;
        }
        let page_rows = page_rows.max(1);
        let end = rows - 1;
        let last_win = rows.saturating_sub(page_rows);
        if self.win_y < last_win {
            let new_win = (self.win_y + page_rows).min(last_win);
            self.win_y = new_win;
            if self.win_y + self.y > end {
                self.y = end - self.win_y;
            }
        } else {
            // Already on the last page: pin the cursor to the final row.
            self.y = end - self.win_y;
        }
    }

    pub fn page_up(&mut self, page_rows: usize) {
        let page_rows = page_rows.max(1);
        if self.win_y == 0 {
            self.y = 0;
        } else {
            self.win_y = self.win_y.saturating_sub(page_rows);
        }
    }

    /// Move right by the columns that fit on screen, keeping the last full
    /// column set anchored to the right edge of data instead of landing on
    /// a partial page.
    pub fn page_right(&mut self, row_len: usize, layout: &Layout) {
        if row_len == 0 {
            return;
        }
        let end = row_len - 1;
        let anchor = layout.right_anchor(end);
        if self.win_x >= anchor {
            // Final column set is already on screen: pin to the last column.
            self.x = end.saturating_sub(self.win_x);
            return;
        }
        let fit = layout.fit_forward(self.win_x);
        self.win_x = (self.win_x + fit).min(anchor);
        let fit_now = layout.fit_forward(self.win_x);
        if self.x >= fit_now {
            self.x = fit_now - 1;
        }
        if self.win_x + self.x > end {
            self.x = end - self.win_x;
        }
    }

    pub fn page_left(&mut self, layout: &Layout) {
        if self.win_x == 0 {
            self.x = 0;
            return;
        }
        let step = layout.fit_backward(self.win_x - 1);
        self.win_x = self.win_x.saturating_sub(step);
        let fit = layout.fit_forward(self.win_x);
        if self.x >= fit {
            self.x = fit.saturating_sub(1);
        }
    }

    pub fn line_home(&mut self) {
        self.x = 0;
        self.win_x = 0;
    }

    /// Jump to the last cell of the current row, using that row's own
    /// length so jagged rows land on their actual final cell.
    pub fn line_end(&mut self, row_len: usize, layout: &Layout) {
        if row_len == 0 {
            return;
        }
        self.goto_col(row_len - 1, row_len, layout);
    }

    pub fn top(&mut self) {
        self.y = 0;
        self.win_y = 0;
    }

    /// Re-establish the invariants after the world changed under the
    /// cursor: resize, sort, header toggle, width adjustments. The cursor
    /// stays on the nearest existing cell.
    pub fn clamp(&mut self, rows: usize, cols: usize, page_rows: usize, layout: &Layout) {
        let row = self.cursor_row();
        let col = self.cursor_col();
        if self.win_y >= rows {
            self.win_y = rows.saturating_sub(1);
            self.y = 0;
        }
        if self.win_x >= cols {
            self.win_x = cols.saturating_sub(1);
            self.x = 0;
        }
        self.goto_row(row, rows, page_rows);
        self.goto_col(col, cols, layout);
    }
}
