//! The command set and the key dispatcher.
//!
//! Every operation the viewer supports is a variant of [`Action`], so the
//! command set is enumerable and testable without constructing a viewer.
//! The dispatcher owns the pending digit modifier and implements the
//! disambiguation rule for digit keys: a digit extends a pending modifier,
//! or starts one only when it is not itself bound ('0' is bound to
//! line-home).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::trace;

use crate::data::sort::SortMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    PageUp,
    PageDown,
    PageLeft,
    PageRight,
    Mark,
    GotoMark,
    Top,
    GotoRow,
    GotoCol,
    LineHome,
    LineEnd,
    ToggleHeader,
    WidenGap,
    NarrowGap,
    WidenColumn,
    NarrowColumn,
    WidenAll,
    NarrowAll,
    CycleWidthMode,
    StartSearch,
    NextMatch,
    PrevMatch,
    Sort { mode: SortMode, descending: bool },
    Reload,
    ShowCell,
    ShowMetadata,
    YankCell,
    Help,
    Quit,
}

/// What one keypress resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Run this operation.
    Run(Action),
    /// The key was absorbed (modifier digit or unbound key); redraw only.
    Absorbed,
}

#[derive(Debug, Default)]
pub struct Dispatcher {
    modifier: String,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulated digit string, for the status line.
    pub fn pending(&self) -> &str {
        &self.modifier
    }

    /// Consume the modifier as a repeat count, falling back to `default`
    /// when empty or unparseable.
    pub fn take_count(&mut self, default: usize) -> usize {
        let count = self.modifier.parse::<usize>().ok().filter(|&n| n > 0);
        self.modifier.clear();
        count.unwrap_or(default)
    }

    /// Consume the modifier as an explicit 1-based target, if any.
    pub fn take_target(&mut self) -> Option<usize> {
        let target = self.modifier.parse::<usize>().ok().filter(|&n| n > 0);
        self.modifier.clear();
        target
    }

    /// Discard whatever a finished command did not consume.
    pub fn discard(&mut self) {
        self.modifier.clear();
    }

    /// Resolve one keypress against the binding table and the pending
    /// modifier.
    pub fn dispatch(&mut self, key: &KeyEvent) -> Dispatch {
        if let KeyCode::Char(c) = key.code {
            if c.is_ascii_digit()
                && !key.modifiers.contains(KeyModifiers::CONTROL)
                && (!self.modifier.is_empty() || action_for(key).is_none())
            {
                self.modifier.push(c);
                trace!(target: "dispatch", "modifier: {}", self.modifier);
                return Dispatch::Absorbed;
            }
        }
        match action_for(key) {
            Some(action) => Dispatch::Run(action),
            None => {
                self.modifier.clear();
                Dispatch::Absorbed
            }
        }
    }
}

/// The binding table. Plain chars arrive with or without SHIFT; control
/// chords are matched explicitly.
pub fn action_for(key: &KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Char('h') | KeyCode::Left => Some(Action::MoveLeft),
        KeyCode::Char('l') | KeyCode::Right => Some(Action::MoveRight),
        KeyCode::Char('J') | KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::Char('K') | KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::Char('L') => Some(Action::PageRight),
        KeyCode::Char('H') => Some(Action::PageLeft),
        KeyCode::Char('m') | KeyCode::Insert => Some(Action::Mark),
        KeyCode::Char('\'') | KeyCode::Delete => Some(Action::GotoMark),
        KeyCode::Char('g') => Some(Action::Top),
        KeyCode::Char('G') => Some(Action::GotoRow),
        KeyCode::Char('|') => Some(Action::GotoCol),
        KeyCode::Char('0') | KeyCode::Char('^') | KeyCode::Home => Some(Action::LineHome),
        KeyCode::Char('$') | KeyCode::End => Some(Action::LineEnd),
        KeyCode::Char('t') => Some(Action::ToggleHeader),
        KeyCode::Char(']') => Some(Action::WidenGap),
        KeyCode::Char('[') => Some(Action::NarrowGap),
        KeyCode::Char('>') => Some(Action::WidenColumn),
        KeyCode::Char('<') => Some(Action::NarrowColumn),
        KeyCode::Char('}') => Some(Action::WidenAll),
        KeyCode::Char('{') => Some(Action::NarrowAll),
        KeyCode::Char('w') => Some(Action::CycleWidthMode),
        KeyCode::Char('/') => Some(Action::StartSearch),
        KeyCode::Char('n') => Some(Action::NextMatch),
        KeyCode::Char('p') => Some(Action::PrevMatch),
        KeyCode::Char('s') => Some(Action::Sort {
            mode: SortMode::Lexical,
            descending: false,
        }),
        KeyCode::Char('S') => Some(Action::Sort {
            mode: SortMode::Lexical,
            descending: true,
        }),
        KeyCode::Char('a') => Some(Action::Sort {
            mode: SortMode::Natural,
            descending: false,
        }),
        KeyCode::Char('A') => Some(Action::Sort {
            mode: SortMode::Natural,
            descending: true,
        }),
        KeyCode::Char('i') => Some(Action::Sort {
            mode: SortMode::Numeric,
            descending: false,
        }),
        KeyCode::Char('I') => Some(Action::Sort {
            mode: SortMode::Numeric,
            descending: true,
        }),
        KeyCode::Char('y') => Some(Action::YankCell),
        KeyCode::Char('r') => Some(Action::Reload),
        KeyCode::Enter => Some(Action::ShowCell),
        KeyCode::Char('d') => Some(Action::ShowMetadata),
        KeyCode::Char('?') | KeyCode::F(1) => Some(Action::Help),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
        _ => None,
    }
}

/// Key/description pairs for the help popup, kept next to the binding
/// table so the two cannot drift apart.
pub fn bindings() -> &'static [(&'static str, &'static str)] {
    &[
        ("j k h l / arrows", "move one cell (prefix with a count)"),
        ("J / PgDn, K / PgUp", "page down / up"),
        ("L, H", "page right / left"),
        ("g", "top of file"),
        ("G", "last row, or row N with a count"),
        ("|", "first column, or column N with a count"),
        ("0 ^ / Home", "first cell of the row"),
        ("$ / End", "last cell of the row"),
        ("m / Insert", "mark the current cell"),
        ("' / Delete", "jump to the mark"),
        ("t", "toggle the header row"),
        ("w", "cycle column width policy (fixed/max/mode)"),
        ("> <", "widen / narrow the current column"),
        ("} {", "widen / narrow all columns"),
        ("] [", "widen / narrow the column gap"),
        ("/", "search"),
        ("n, p", "next / previous match"),
        ("s S", "sort by column, lexical (reverse)"),
        ("a A", "sort by column, natural (reverse)"),
        ("i I", "sort by column, numeric (reverse)"),
        ("y", "copy current cell to the clipboard"),
        ("Enter", "show the full cell"),
        ("d", "show table details"),
        ("r", "reload the file"),
        ("?, F1", "this help"),
        ("q", "quit"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyEvent::from(KeyCode::Char(c))
    }

    #[test]
    fn digits_accumulate_unless_bound() {
        let mut d = Dispatcher::new();
        assert_eq!(d.dispatch(&key('1')), Dispatch::Absorbed);
        assert_eq!(d.dispatch(&key('2')), Dispatch::Absorbed);
        assert_eq!(d.pending(), "12");
        assert_eq!(d.take_count(1), 12);
        assert_eq!(d.pending(), "");
    }

    #[test]
    fn zero_is_line_home_without_a_pending_modifier() {
        let mut d = Dispatcher::new();
        assert_eq!(d.dispatch(&key('0')), Dispatch::Run(Action::LineHome));

        d.dispatch(&key('1'));
        assert_eq!(d.dispatch(&key('0')), Dispatch::Absorbed);
        assert_eq!(d.pending(), "10");
    }

    #[test]
    fn unbound_key_clears_the_modifier() {
        let mut d = Dispatcher::new();
        d.dispatch(&key('4'));
        assert_eq!(d.dispatch(&key('!')), Dispatch::Absorbed);
        assert_eq!(d.pending(), "");
        assert_eq!(d.take_count(7), 7);
    }

    #[test]
    fn garbage_modifier_falls_back_to_default() {
        let mut d = Dispatcher::new();
        d.modifier = "99999999999999999999999999".into();
        assert_eq!(d.take_count(1), 1);
        d.modifier = "0".into();
        assert_eq!(d.take_target(), None);
    }

    #[test]
    fn bound_keys_resolve_to_actions() {
        assert_eq!(action_for(&key('G')), Some(Action::GotoRow));
        assert_eq!(
            action_for(&KeyEvent::from(KeyCode::PageDown)),
            Some(Action::PageDown)
        );
        assert_eq!(
            action_for(&key('A')),
            Some(Action::Sort {
                mode: SortMode::Natural,
                descending: true
            })
        );
        assert_eq!(action_for(&key('!')), None);
    }

    #[test]
    fn every_advertised_binding_is_nonempty() {
        for (keys, what) in bindings() {
            assert!(!keys.is_empty());
            assert!(!what.is_empty());
        }
    }
}
