//! Cursor — position tracking and movement.
//!
//! The cursor sits at `(cx, cy)`: raw column `cx` of row `cy`. It may also
//! sit on the virtual line just past the last row (`cy == num_rows`), where
//! the only valid column is 0. Every movement keeps these bounds:
//!
//! - `cy <= num_rows`
//! - `cx <= row_len(cy)` (and so `cx == 0` past the last row)
//!
//! Horizontal moves wrap across line ends; vertical moves stop at the
//! document edges and pull `cx` back if the destination row is shorter.
//!
//! `rx`, the render column, is derived. [`Viewport::scroll`] refreshes it
//! before every frame.
//!
//! [`Viewport::scroll`]: crate::view::Viewport::scroll

use crate::document::Document;

/// Direction of a single-step cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A cursor in a document.
///
/// Does not own or reference the document; the document is passed to
/// movement methods as a parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Raw column.
    pub cx: usize,
    /// Row index.
    pub cy: usize,
    /// Render column of `cx` on row `cy`.
    pub rx: usize,
}

impl Cursor {
    /// A cursor at the top-left corner.
    #[must_use]
    pub const fn new() -> Self {
        Self { cx: 0, cy: 0, rx: 0 }
    }

    /// Move one step in `dir`, then clamp to the destination row.
    pub fn step(&mut self, dir: Direction, doc: &Document) {
        match dir {
            Direction::Left => {
                if self.cx > 0 {
                    self.cx -= 1;
                } else if self.cy > 0 {
                    self.cy -= 1;
                    self.cx = doc.row_len(self.cy);
                }
            }
            Direction::Right => {
                if let Some(row) = doc.row(self.cy) {
                    if self.cx < row.size() {
                        self.cx += 1;
                    } else {
                        self.cy += 1;
                        self.cx = 0;
                    }
                }
            }
            Direction::Up => self.cy = self.cy.saturating_sub(1),
            Direction::Down => {
                if self.cy < doc.num_rows() {
                    self.cy += 1;
                }
            }
        }
        self.clamp(doc);
    }

    /// Step `count` times in `dir`.
    pub fn step_n(&mut self, dir: Direction, count: usize, doc: &Document) {
        for _ in 0..count {
            self.step(dir, doc);
        }
    }

    /// Jump to the start of the row.
    pub const fn home(&mut self) {
        self.cx = 0;
    }

    /// Jump just past the last byte of the row (stays at 0 past the end).
    pub fn end(&mut self, doc: &Document) {
        self.cx = doc.row_len(self.cy);
    }

    /// Pull the cursor back inside the document bounds.
    pub fn clamp(&mut self, doc: &Document) {
        self.cy = self.cy.min(doc.num_rows());
        self.cx = self.cx.min(doc.row_len(self.cy));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        let mut d = Document::default();
        d.load_lines(text.as_bytes()).unwrap();
        d
    }

    fn at(cx: usize, cy: usize) -> Cursor {
        Cursor { cx, cy, rx: 0 }
    }

    fn assert_in_bounds(c: &Cursor, d: &Document) {
        assert!(c.cy <= d.num_rows(), "cy {} > {}", c.cy, d.num_rows());
        assert!(c.cx <= d.row_len(c.cy), "cx {} > {}", c.cx, d.row_len(c.cy));
    }

    // ── Horizontal ────────────────────────────────────────────────────────

    #[test]
    fn right_moves_within_row() {
        let d = doc("abc");
        let mut c = Cursor::new();
        c.step(Direction::Right, &d);
        assert_eq!((c.cx, c.cy), (1, 0));
    }

    #[test]
    fn right_at_end_wraps_to_next_row() {
        let d = doc("abc\nde");
        let mut c = at(3, 0);
        c.step(Direction::Right, &d);
        assert_eq!((c.cx, c.cy), (0, 1));
    }

    #[test]
    fn right_at_end_of_last_row_goes_past_end() {
        let d = doc("ab");
        let mut c = at(2, 0);
        c.step(Direction::Right, &d);
        assert_eq!((c.cx, c.cy), (0, 1));
        c.step(Direction::Right, &d);
        assert_eq!((c.cx, c.cy), (0, 1));
    }

    #[test]
    fn left_moves_within_row() {
        let d = doc("abc");
        let mut c = at(2, 0);
        c.step(Direction::Left, &d);
        assert_eq!((c.cx, c.cy), (1, 0));
    }

    #[test]
    fn left_at_start_wraps_to_previous_row_end() {
        let d = doc("abcd\nx");
        let mut c = at(0, 1);
        c.step(Direction::Left, &d);
        assert_eq!((c.cx, c.cy), (4, 0));
    }

    #[test]
    fn left_at_origin_stays() {
        let d = doc("abc");
        let mut c = Cursor::new();
        c.step(Direction::Left, &d);
        assert_eq!((c.cx, c.cy), (0, 0));
    }

    // ── Vertical ──────────────────────────────────────────────────────────

    #[test]
    fn down_clamps_cx_to_shorter_row() {
        let d = doc("abcdef\nab");
        let mut c = at(5, 0);
        c.step(Direction::Down, &d);
        assert_eq!((c.cx, c.cy), (2, 1));
    }

    #[test]
    fn down_stops_one_past_last_row() {
        let d = doc("a\nb\nc");
        let mut c = Cursor::new();
        c.step_n(Direction::Down, 30, &d);
        assert_eq!((c.cx, c.cy), (0, 3));
    }

    #[test]
    fn up_clamps_at_top() {
        let d = doc("a\nb");
        let mut c = at(0, 1);
        c.step_n(Direction::Up, 5, &d);
        assert_eq!(c.cy, 0);
    }

    #[test]
    fn down_past_end_resets_cx() {
        let d = doc("abc");
        let mut c = at(3, 0);
        c.step(Direction::Down, &d);
        assert_eq!((c.cx, c.cy), (0, 1));
    }

    #[test]
    fn empty_document_cursor_stays_at_origin() {
        let d = Document::default();
        let mut c = Cursor::new();
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            c.step(dir, &d);
            assert_eq!((c.cx, c.cy), (0, 0));
        }
    }

    // ── Home / End ────────────────────────────────────────────────────────

    #[test]
    fn home_and_end() {
        let d = doc("hello");
        let mut c = at(2, 0);
        c.end(&d);
        assert_eq!(c.cx, 5);
        c.home();
        assert_eq!(c.cx, 0);
    }

    #[test]
    fn end_past_last_row_is_zero() {
        let d = doc("hello");
        let mut c = at(0, 1);
        c.end(&d);
        assert_eq!(c.cx, 0);
    }

    // ── Invariant ─────────────────────────────────────────────────────────

    #[test]
    fn random_walk_stays_in_bounds() {
        let d = doc("short\n\na much longer line\n\tx\nend");
        let mut c = Cursor::new();
        let dirs = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];
        // Deterministic pseudo-random walk.
        let mut seed: u32 = 12_345;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let dir = dirs[(seed >> 16) as usize % dirs.len()];
            c.step(dir, &d);
            assert_in_bounds(&c, &d);
        }
    }
}
