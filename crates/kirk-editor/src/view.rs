//! View — scrolling and frame composition.
//!
//! A [`Viewport`] remembers which part of the document is on screen: the
//! first visible row and the first visible render column. Before each frame
//! [`Viewport::scroll`] nudges those offsets just far enough to keep the
//! cursor in view.
//!
//! [`compose`] then paints the whole screen into an [`OutputBuffer`]:
//!
//! ```text
//! ESC[?25l ESC[H                 hide cursor, go home
//! row 0 ESC[K \r\n               visible slice of each row, or `~`
//! row 1 ESC[K \r\n
//! ...
//! row N ESC[K                    no line break after the last row
//! ESC[cy;cxH ESC[?25h            place and show the cursor
//! ```
//!
//! The buffer is flushed with a single write by the caller, so the
//! terminal never shows a half-drawn frame.

use std::io::{self, Write};

use kirk_term::ansi;
use kirk_term::output::OutputBuffer;
use kirk_term::terminal::Size;

use crate::cursor::Cursor;
use crate::document::Document;

/// Product name shown in the welcome banner.
pub const PRODUCT_NAME: &str = "Kirk editor";

/// Version shown in the welcome banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Marker drawn on screen rows past the end of the document.
const FILLER: u8 = b'~';

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Scroll offsets of the visible window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// First document row on screen.
    pub row_offset: usize,
    /// First render column on screen.
    pub col_offset: usize,
}

impl Viewport {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            row_offset: 0,
            col_offset: 0,
        }
    }

    /// Refresh `cursor.rx` and scroll just enough to keep the cursor visible.
    ///
    /// Afterwards `row_offset <= cy < row_offset + rows` and
    /// `col_offset <= rx < col_offset + cols`. A zero-sized screen leaves
    /// the offsets alone.
    pub fn scroll(&mut self, cursor: &mut Cursor, doc: &Document, screen: Size) {
        cursor.rx = doc.cx_to_rx(cursor.cy, cursor.cx);

        if screen.rows == 0 || screen.cols == 0 {
            return;
        }

        if cursor.cy < self.row_offset {
            self.row_offset = cursor.cy;
        }
        if cursor.cy >= self.row_offset + screen.rows {
            self.row_offset = cursor.cy - screen.rows + 1;
        }

        if cursor.rx < self.col_offset {
            self.col_offset = cursor.rx;
        }
        if cursor.rx >= self.col_offset + screen.cols {
            self.col_offset = cursor.rx - screen.cols + 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Frame composition
// ---------------------------------------------------------------------------

/// The welcome banner text.
#[must_use]
pub fn banner() -> String {
    format!("{PRODUCT_NAME} -- version {VERSION}")
}

/// Assemble one full frame into `out`.
///
/// Does not flush; the caller writes the buffer in one go.
///
/// # Errors
///
/// Only propagates errors from `out`, which never fails for an
/// [`OutputBuffer`].
pub fn compose(
    doc: &Document,
    cursor: &Cursor,
    view: &Viewport,
    screen: Size,
    out: &mut OutputBuffer,
) -> io::Result<()> {
    ansi::cursor_hide(out)?;
    ansi::cursor_home(out)?;

    draw_rows(doc, view, screen, out)?;

    ansi::cursor_to(
        out,
        cursor.cy.saturating_sub(view.row_offset),
        cursor.rx.saturating_sub(view.col_offset),
    )?;
    ansi::cursor_show(out)
}

fn draw_rows(
    doc: &Document,
    view: &Viewport,
    screen: Size,
    out: &mut OutputBuffer,
) -> io::Result<()> {
    for y in 0..screen.rows {
        let file_row = y + view.row_offset;

        match doc.row(file_row) {
            Some(row) => {
                let render = row.render();
                let start = view.col_offset.min(render.len());
                let end = (start + screen.cols).min(render.len());
                out.push_bytes(&render[start..end]);
            }
            None if doc.is_empty() && y == screen.rows / 3 => draw_banner(screen.cols, out),
            None => out.push_bytes(&[FILLER]),
        }

        ansi::clear_line(out)?;
        if y + 1 < screen.rows {
            out.write_all(b"\r\n")?;
        }
    }
    Ok(())
}

/// Centre the banner on a row, with the filler marker in the first column.
fn draw_banner(cols: usize, out: &mut OutputBuffer) {
    let text = banner();
    let text = &text.as_bytes()[..text.len().min(cols)];

    let mut padding = (cols - text.len()) / 2;
    if padding > 0 {
        out.push_bytes(&[FILLER]);
        padding -= 1;
    }
    out.push_bytes(&b" ".repeat(padding));
    out.push_bytes(text);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
