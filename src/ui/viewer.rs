//! The Viewer: owns the table, the viewport, and every piece of
//! interactive state, and maps dispatched actions onto them.
//!
//! The main loop is strictly one blocking event per iteration with a full
//! redraw after each handled key. Quit and reload are ordinary return
//! values ([`Exit`]), not errors; navigation never surfaces a failure to
//! the user, it clamps instead.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::backend::Backend;
use ratatui::Terminal;
use tracing::{debug, info};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::config::config::{BehaviorConfig, Config};
use crate::core::layout::{self, Layout, WidthPolicy};
use crate::core::search::SearchState;
use crate::core::viewport::Viewport;
use crate::data::table::TableBuffer;
use crate::ui::actions::{Action, Dispatch, Dispatcher};
use crate::ui::{popup, render};

/// Widest the column gap can be stretched.
const MAX_GAP: u16 = 16;

/// Result of handling one key.
pub enum Step {
    Continue,
    Exit(Exit),
}

/// Why the viewer loop ended.
pub enum Exit {
    Quit,
    Reload(ReloadState),
}

/// User-visible settings carried across a reload so the rebuilt viewer
/// comes back where the user left it.
#[derive(Debug, Clone)]
pub struct ReloadState {
    pub cursor: (usize, usize),
    pub scroll: (usize, usize),
    pub policy: WidthPolicy,
    pub gap: u16,
    pub search_term: String,
    pub header_shown: bool,
}

/// Modal state drawn on top of the grid. While an overlay is open it
/// receives all keys.
#[derive(Default)]
pub enum Overlay {
    #[default]
    None,
    Help {
        scroll: u16,
    },
    Cell {
        lines: Vec<String>,
        scroll: u16,
    },
    Metadata,
    SearchInput {
        input: Input,
    },
}

pub struct Viewer {
    pub(crate) table: TableBuffer,
    pub(crate) view: Viewport,
    pub(crate) search: SearchState,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) mark: Option<(usize, usize)>,
    pub(crate) policy: WidthPolicy,
    pub(crate) widths: Vec<u16>,
    pub(crate) gap: u16,
    pub(crate) behavior: BehaviorConfig,
    pub(crate) term_width: u16,
    pub(crate) term_height: u16,
    pub(crate) overlay: Overlay,
}

impl Viewer {
    pub fn new(table: TableBuffer, config: &Config, size: (u16, u16)) -> Self {
        let policy = config.width_policy();
        let widths = policy.compute(&table);
        Self {
            table,
            view: Viewport::default(),
            search: SearchState::default(),
            dispatcher: Dispatcher::new(),
            mark: None,
            policy,
            widths,
            gap: config.display.column_gap,
            behavior: config.behavior.clone(),
            term_width: size.0,
            term_height: size.1,
            overlay: Overlay::None,
        }
    }

    /// Rebuild after a reload, restoring position and cosmetic settings
    /// from the snapshot. Out-of-range positions (the file shrank) clamp.
    pub fn restore(table: TableBuffer, config: &Config, state: ReloadState, size: (u16, u16)) -> Self {
        let mut viewer = Self::new(table, config, size);
        viewer.policy = state.policy;
        viewer.gap = state.gap;
        viewer.recompute_widths();
        if !state.header_shown && viewer.table.header_shown() {
            viewer.table.toggle_header();
        }
        viewer.view.win_y = state.scroll.0;
        viewer.view.win_x = state.scroll.1;
        viewer.view.y = state.cursor.0.saturating_sub(state.scroll.0);
        viewer.view.x = state.cursor.1.saturating_sub(state.scroll.1);
        viewer.clamp();
        if !state.search_term.is_empty() {
            let cursor = (viewer.view.cursor_row(), viewer.view.cursor_col());
            let term = state.search_term.clone();
            viewer.search.run(viewer.table.rows(), &term, cursor);
        }
        info!(target: "session", "viewer rebuilt after reload");
        viewer
    }

    /// Absolute cursor position `(row, col)`.
    pub fn cursor(&self) -> (usize, usize) {
        (self.view.cursor_row(), self.view.cursor_col())
    }

    /// Scroll offset `(win_y, win_x)` of the viewport.
    pub fn scroll(&self) -> (usize, usize) {
        (self.view.win_y, self.view.win_x)
    }

    pub fn table(&self) -> &TableBuffer {
        &self.table
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    /// Rows of chrome above the grid: status line, rule, and the header
    /// row while it is shown.
    pub(crate) fn header_offset(&self) -> u16 {
        if self.table.header_shown() {
            3
        } else {
            2
        }
    }

    /// Grid height in rows.
    pub(crate) fn page_rows(&self) -> usize {
        (self.term_height as usize)
            .saturating_sub(self.header_offset() as usize)
            .max(1)
    }

    pub(crate) fn layout(&self) -> Layout {
        Layout::new(self.widths.clone(), self.gap, self.term_width)
    }

    fn recompute_widths(&mut self) {
        self.widths = self.policy.compute(&self.table);
    }

    fn clamp(&mut self) {
        let layout = self.layout();
        self.view.clamp(
            self.table.row_count(),
            self.table.column_count(),
            self.page_rows(),
            &layout,
        );
    }

    /// The blocking event loop: draw, read one event, handle it. Returns
    /// only for quit or reload.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<Exit> {
        loop {
            terminal.draw(|f| render::draw(f, self))?;
            match event::read()? {
                Event::Key(key) => {
                    // Key release events double-fire toggles on Windows.
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if let Step::Exit(exit) = self.handle_key(key)? {
                        return Ok(exit);
                    }
                }
                Event::Resize(width, height) => self.handle_resize(width, height),
                _ => {}
            }
        }
    }

    pub fn handle_resize(&mut self, width: u16, height: u16) {
        debug!(target: "viewport", "resize to {}x{}", width, height);
        self.term_width = width;
        self.term_height = height;
        self.clamp();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<Step> {
        if !matches!(self.overlay, Overlay::None) {
            self.handle_overlay_key(key);
            return Ok(Step::Continue);
        }
        match self.dispatcher.dispatch(&key) {
            Dispatch::Absorbed => Ok(Step::Continue),
            Dispatch::Run(action) => self.apply(action),
        }
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) {
        self.overlay = match std::mem::take(&mut self.overlay) {
            Overlay::SearchInput { mut input } => match key.code {
                KeyCode::Esc => Overlay::None,
                KeyCode::Enter => {
                    let needle = input.value().to_string();
                    self.run_search(&needle);
                    Overlay::None
                }
                _ => {
                    input.handle_event(&Event::Key(key));
                    Overlay::SearchInput { input }
                }
            },
            Overlay::Help { scroll } => match key.code {
                KeyCode::Down | KeyCode::Char('j') => Overlay::Help {
                    scroll: scroll.saturating_add(1),
                },
                KeyCode::Up | KeyCode::Char('k') => Overlay::Help {
                    scroll: scroll.saturating_sub(1),
                },
                _ => Overlay::None,
            },
            Overlay::Cell { lines, scroll } => match key.code {
                KeyCode::Down | KeyCode::Char('j') => Overlay::Cell {
                    lines,
                    scroll: scroll.saturating_add(1),
                },
                KeyCode::Up | KeyCode::Char('k') => Overlay::Cell {
                    lines,
                    scroll: scroll.saturating_sub(1),
                },
                _ => Overlay::None,
            },
            Overlay::Metadata | Overlay::None => Overlay::None,
        };
    }

    /// Execute one operation. Any count the operation did not consume is
    /// discarded afterwards.
    pub fn apply(&mut self, action: Action) -> Result<Step> {
        let rows = self.table.row_count();
        let page_rows = self.page_rows();
        match action {
            Action::MoveUp => {
                let n = self.dispatcher.take_count(1);
                self.view.move_up(n, rows, page_rows);
            }
            Action::MoveDown => {
                let n = self.dispatcher.take_count(1);
                self.view.move_down(n, rows, page_rows);
            }
            Action::MoveLeft => {
                let n = self.dispatcher.take_count(1);
                let layout = self.layout();
                let row_len = self.table.row_len(self.view.cursor_row());
                self.view.move_left(n, row_len, &layout);
            }
            Action::MoveRight => {
                let n = self.dispatcher.take_count(1);
                let layout = self.layout();
                let row_len = self.table.row_len(self.view.cursor_row());
                self.view.move_right(n, row_len, &layout);
            }
            Action::PageUp => self.view.page_up(page_rows),
            Action::PageDown => self.view.page_down(rows, page_rows),
            Action::PageLeft => {
                let layout = self.layout();
                self.view.page_left(&layout);
            }
            Action::PageRight => {
                let layout = self.layout();
                let row_len = self.table.row_len(self.view.cursor_row());
                self.view.page_right(row_len, &layout);
            }
            Action::Mark => {
                self.mark = Some((self.view.cursor_row(), self.view.cursor_col()));
            }
            Action::GotoMark => {
                if let Some(pos) = self.mark {
                    self.jump_to(pos);
                }
            }
            Action::Top => self.view.top(),
            Action::GotoRow => {
                let target = match self.dispatcher.take_target() {
                    Some(n) => n.min(rows).saturating_sub(1),
                    None => rows.saturating_sub(1),
                };
                self.view.goto_row(target, rows, page_rows);
            }
            Action::GotoCol => {
                let cols = self.table.column_count();
                let target = match self.dispatcher.take_target() {
                    Some(n) => n.min(cols).saturating_sub(1),
                    None => 0,
                };
                let layout = self.layout();
                self.view.goto_col(target, cols, &layout);
            }
            Action::LineHome => self.view.line_home(),
            Action::LineEnd => {
                let layout = self.layout();
                let row_len = self.table.row_len(self.view.cursor_row());
                self.view.line_end(row_len, &layout);
            }
            Action::ToggleHeader => {
                let row = self.view.cursor_row();
                let shown = self.table.toggle_header();
                let target = if shown { row.saturating_sub(1) } else { row + 1 };
                let rows = self.table.row_count();
                let page_rows = self.page_rows();
                self.view.goto_row(target, rows, page_rows);
                self.clamp();
            }
            Action::WidenGap => {
                self.gap = (self.gap + 1).min(MAX_GAP);
                self.clamp();
            }
            Action::NarrowGap => {
                self.gap = self.gap.saturating_sub(1);
                self.clamp();
            }
            Action::WidenColumn | Action::NarrowColumn => {
                let col = self.view.cursor_col();
                if let Some(width) = self.widths.get_mut(col) {
                    layout::scale_width(width, action == Action::WidenColumn);
                    self.clamp();
                }
            }
            Action::WidenAll | Action::NarrowAll => {
                layout::scale_widths(&mut self.widths, action == Action::WidenAll);
                self.clamp();
            }
            Action::CycleWidthMode => {
                self.policy.mode = self.policy.mode.cycle();
                info!(target: "viewport", "width policy: {}", self.policy.mode.label());
                self.recompute_widths();
                self.clamp();
            }
            Action::StartSearch => {
                self.overlay = Overlay::SearchInput {
                    input: Input::default(),
                };
            }
            Action::NextMatch => {
                if let Some(pos) = self.search.next() {
                    self.jump_to(pos);
                }
            }
            Action::PrevMatch => {
                if let Some(pos) = self.search.prev() {
                    self.jump_to(pos);
                }
            }
            Action::Sort { mode, descending } => {
                let col = self.view.cursor_col();
                if col < self.table.column_count() {
                    self.table.sort_by_column(col, mode, descending);
                    // Cached match coordinates no longer line up.
                    self.search.invalidate();
                }
            }
            Action::Reload => {
                self.dispatcher.discard();
                return Ok(Step::Exit(Exit::Reload(self.snapshot())));
            }
            Action::ShowCell => {
                let content = self.table.cell(self.view.cursor_row(), self.view.cursor_col());
                if !content.is_empty() {
                    let lines = popup::wrap_text(content, self.behavior.popup_wrap_width as usize);
                    self.overlay = Overlay::Cell { lines, scroll: 0 };
                }
            }
            Action::ShowMetadata => self.overlay = Overlay::Metadata,
            Action::YankCell => self.yank_cell(),
            Action::Help => self.overlay = Overlay::Help { scroll: 0 },
            Action::Quit => {
                info!(target: "session", "quit");
                return Ok(Step::Exit(Exit::Quit));
            }
        }
        self.dispatcher.discard();
        Ok(Step::Continue)
    }

    /// Move the cursor to an absolute position, ignoring positions that no
    /// longer exist (the table may have been resorted or reloaded since the
    /// position was recorded).
    fn jump_to(&mut self, pos: (usize, usize)) {
        let (row, col) = pos;
        if row >= self.table.row_count() || col >= self.table.column_count() {
            debug!(target: "viewport", "stale jump target ({}, {}) ignored", row, col);
            return;
        }
        let page_rows = self.page_rows();
        self.view.goto_row(row, self.table.row_count(), page_rows);
        let layout = self.layout();
        self.view.goto_col(col, self.table.column_count(), &layout);
    }

    fn run_search(&mut self, needle: &str) {
        if needle.is_empty() {
            self.search.clear();
            return;
        }
        let cursor = (self.view.cursor_row(), self.view.cursor_col());
        if let Some(pos) = self.search.run(self.table.rows(), needle, cursor) {
            self.jump_to(pos);
        }
    }

    /// Best-effort copy of the current cell. A missing clipboard mechanism
    /// is not an error the user sees.
    fn yank_cell(&mut self) {
        if !self.behavior.clipboard {
            return;
        }
        let text = self
            .table
            .cell(self.view.cursor_row(), self.view.cursor_col())
            .to_string();
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => debug!(target: "dispatch", "cell copied to clipboard"),
            Err(e) => debug!(target: "dispatch", "clipboard unavailable: {}", e),
        }
    }

    fn snapshot(&self) -> ReloadState {
        ReloadState {
            cursor: (self.view.cursor_row(), self.view.cursor_col()),
            scroll: (self.view.win_y, self.view.win_x),
            policy: self.policy,
            gap: self.gap,
            search_term: self.search.term().to_string(),
            header_shown: self.table.header_shown(),
        }
    }
}
