//! Viewport/layout interplay with uneven column widths, where the forward
//! and reverse fit counts actually diverge.

use gridview::core::layout::Layout;
use gridview::core::viewport::Viewport;

/// Mixed narrow and wide columns: [4, 30, 8, 25, 6, 40, 10], gap 2,
/// terminal 60 cells wide.
fn uneven() -> Layout {
    Layout::new(vec![4, 30, 8, 25, 6, 40, 10], 2, 60)
}

#[test]
fn forward_and_reverse_counts_disagree_on_uneven_widths() {
    let layout = uneven();
    // From the left: 4+2 + 30+2 + 8+2 = 48, next (25+2) would be 75.
    assert_eq!(layout.fit_forward(0), 3);
    // Ending at the last column: 10+2 + 40+2 = 54, next (6+2) would be 62.
    assert_eq!(layout.fit_backward(6), 2);
}

#[test]
fn goto_col_right_scroll_anchors_the_target_as_last_visible() {
    let layout = uneven();
    let mut v = Viewport::default();
    v.goto_col(6, 7, &layout);
    // Column 6 becomes the last of a right-anchored window.
    assert_eq!(v.win_x, 5);
    assert_eq!(v.cursor_col(), 6);

    // Going back left to column 0 scrolls it to the first slot.
    v.goto_col(0, 7, &layout);
    assert_eq!((v.win_x, v.x), (0, 0));
}

#[test]
fn stepping_right_across_wide_columns_keeps_the_cursor_in_window() {
    let layout = uneven();
    let mut v = Viewport::default();
    for _ in 0..10 {
        v.move_right(1, 7, &layout);
        let fit = layout.fit_forward(v.win_x);
        assert!(v.x < fit, "cursor left the visible window");
        assert!(v.cursor_col() < 7);
    }
    assert_eq!(v.cursor_col(), 6);
}

#[test]
fn page_right_never_exposes_blank_trailing_space() {
    let layout = uneven();
    let mut v = Viewport::default();
    for _ in 0..6 {
        v.page_right(7, &layout);
        // Whatever window we are in, it is never past the right anchor.
        assert!(v.win_x <= layout.right_anchor(6));
        assert!(v.cursor_col() < 7);
    }
    assert_eq!(v.cursor_col(), 6);
    // And paging back left always reaches the origin.
    for _ in 0..6 {
        v.page_left(&layout);
    }
    assert_eq!((v.win_x, v.x), (0, 0));
}

#[test]
fn page_down_reaches_the_bottom_within_the_page_bound() {
    let rows = 95;
    let page = 10;
    let mut v = Viewport::default();
    let mut presses = 0;
    while v.cursor_row() != rows - 1 {
        v.page_down(rows, page);
        presses += 1;
        assert!(presses <= rows.div_ceil(page), "too many pages to reach the end");
    }
    // Once pinned, further paging is a no-op.
    let pinned = v;
    v.page_down(rows, page);
    assert_eq!(v, pinned);
}

#[test]
fn vertical_invariant_survives_mixed_paging_and_jumps() {
    let rows = 73;
    let page = 7;
    let mut v = Viewport::default();
    let script: &[fn(&mut Viewport)] = &[
        |v| v.page_down(73, 7),
        |v| v.move_down(5, 73, 7),
        |v| v.goto_row(72, 73, 7),
        |v| v.page_up(7),
        |v| v.move_up(11, 73, 7),
        |v| v.goto_row(0, 73, 7),
        |v| v.page_down(73, 7),
    ];
    for (step, op) in script.iter().cycle().take(70).enumerate() {
        op(&mut v);
        assert!(v.cursor_row() < rows, "out of bounds at step {}", step);
        assert!(v.y < page, "cursor below the window at step {}", step);
        assert!(v.win_y + v.y == v.cursor_row());
    }
}
