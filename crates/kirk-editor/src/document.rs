//! Document — the rows being viewed.
//!
//! A [`Document`] is an ordered list of [`Row`]s addressed by index. Each row
//! keeps the bytes exactly as read from the file (`chars`) next to the form
//! that goes on screen (`render`), where every tab has been expanded to
//! spaces up to the next tab stop. Everything else is copied byte for byte:
//! the viewer works in bytes, not characters, so a row's columns line up with
//! what the terminal receives.
//!
//! Rows are never edited once appended. Their rendering is computed
//! eagerly so drawing a frame is just slicing.
//!
//! # Raw vs render columns
//!
//! The cursor lives in raw columns (`cx`, an index into `chars`) but is
//! drawn in render columns (`rx`). [`Row::cx_to_rx`] replays the tab
//! arithmetic to convert one into the other:
//!
//! ```text
//! chars:  a  \t                      b
//! cx:     0  1                       2
//! render: a  ·  ·  ·  ·  ·  ·  ·     b
//! rx:     0  1  2  3  4  5  6  7     8
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{EditorError, Result};
use crate::options::TAB_STOP;

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One line of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Raw bytes, without the line terminator.
    chars: Vec<u8>,
    /// `chars` with tabs expanded.
    render: Vec<u8>,
}

impl Row {
    /// Build a row from raw bytes and render it.
    #[must_use]
    pub fn new(chars: Vec<u8>, tab_stop: usize) -> Self {
        let mut row = Self {
            chars,
            render: Vec::new(),
        };
        row.update_render(tab_stop);
        row
    }

    /// Raw bytes.
    #[inline]
    #[must_use]
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// Rendered bytes.
    #[inline]
    #[must_use]
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// Length of the raw bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.chars.len()
    }

    /// Length of the rendered bytes.
    #[inline]
    #[must_use]
    pub fn rsize(&self) -> usize {
        self.render.len()
    }

    /// Recompute `render` from `chars`.
    pub fn update_render(&mut self, tab_stop: usize) {
        let tab_stop = tab_stop.max(1);
        let tabs = self.chars.iter().filter(|&&b| b == b'\t').count();

        self.render.clear();
        self.render.reserve(self.chars.len() + tabs * (tab_stop - 1));
        for &b in &self.chars {
            if b == b'\t' {
                // At least one space, then pad to the next stop.
                self.render.push(b' ');
                while self.render.len() % tab_stop != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(b);
            }
        }
    }

    /// Render column of raw column `cx`.
    ///
    /// `cx` past the end of the row is treated as the end of the row.
    #[must_use]
    pub fn cx_to_rx(&self, cx: usize, tab_stop: usize) -> usize {
        let tab_stop = tab_stop.max(1);
        self.chars.iter().take(cx).fold(0, |rx, &b| {
            if b == b'\t' {
                (rx / tab_stop + 1) * tab_stop
            } else {
                rx + 1
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The rows being viewed, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    rows: Vec<Row>,
    tab_stop: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(TAB_STOP)
    }
}

impl Document {
    /// An empty document with the given tab stop.
    #[must_use]
    pub const fn new(tab_stop: usize) -> Self {
        Self {
            rows: Vec::new(),
            tab_stop,
        }
    }

    /// Load a file, one row per line.
    ///
    /// # Errors
    ///
    /// [`EditorError::Open`] if the file can't be opened,
    /// [`EditorError::Read`] if reading it fails midway.
    pub fn open(path: &Path, tab_stop: usize) -> Result<Self> {
        let file = File::open(path).map_err(|source| EditorError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut doc = Self::new(tab_stop);
        doc.load_lines(BufReader::new(file))
            .map_err(|source| EditorError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        log::info!("loaded {} rows from {}", doc.num_rows(), path.display());
        Ok(doc)
    }

    /// Append every line of `reader`, minus its trailing CR/LF.
    ///
    /// A final line without a terminator still becomes a row; an empty
    /// reader adds nothing.
    ///
    /// # Errors
    ///
    /// Propagates read errors from `reader`.
    pub fn load_lines(&mut self, mut reader: impl BufRead) -> io::Result<()> {
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                return Ok(());
            }
            while matches!(line.last(), Some(b'\n' | b'\r')) {
                line.pop();
            }
            self.append_row(&line);
        }
    }

    /// Append a row holding a copy of `bytes`.
    pub fn append_row(&mut self, bytes: &[u8]) {
        self.rows.push(Row::new(bytes.to_vec(), self.tab_stop));
    }

    /// Recompute the rendering of row `at`. Out-of-range indices are ignored.
    pub fn render_row(&mut self, at: usize) {
        let tab_stop = self.tab_stop;
        if let Some(row) = self.rows.get_mut(at) {
            row.update_render(tab_stop);
        }
    }

    /// Render column of raw column `cx` on row `cy`; 0 past the last row.
    #[must_use]
    pub fn cx_to_rx(&self, cy: usize, cx: usize) -> usize {
        self.rows
            .get(cy)
            .map_or(0, |row| row.cx_to_rx(cx, self.tab_stop))
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Whether the document has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row `at`, if it exists.
    #[inline]
    #[must_use]
    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    /// Raw length of row `at`; 0 past the last row.
    #[inline]
    #[must_use]
    pub fn row_len(&self, at: usize) -> usize {
        self.rows.get(at).map_or(0, Row::size)
    }

    /// The tab stop rows are rendered with.
    #[inline]
    #[must_use]
    pub const fn tab_stop(&self) -> usize {
        self.tab_stop
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc_from(text: &str) -> Document {
        let mut doc = Document::default();
        doc.load_lines(text.as_bytes()).unwrap();
        doc
    }

    // ── Rendering ─────────────────────────────────────────────────────────

    #[test]
    fn render_without_tabs_is_identity() {
        let row = Row::new(b"hello world".to_vec(), 8);
        assert_eq!(row.render(), b"hello world");
        assert_eq!(row.rsize(), row.size());
    }

    #[test]
    fn render_tab_at_start() {
        let row = Row::new(b"\tx".to_vec(), 8);
        assert_eq!(row.render(), b"        x");
    }

    #[test]
    fn render_tab_mid_stop() {
        let row = Row::new(b"a\tb".to_vec(), 8);
        assert_eq!(row.render(), b"a       b");
        assert_eq!(row.rsize(), 9);
    }

    #[test]
    fn render_tab_just_before_stop_is_one_space() {
        let row = Row::new(b"1234567\tx".to_vec(), 8);
        assert_eq!(row.render(), b"1234567 x");
    }

    #[test]
    fn render_tab_on_stop_is_full_width() {
        let row = Row::new(b"12345678\tx".to_vec(), 8);
        assert_eq!(row.render(), b"12345678        x");
    }

    #[test]
    fn render_consecutive_tabs() {
        let row = Row::new(b"\t\t".to_vec(), 4);
        assert_eq!(row.render(), b"        ");
    }

    #[test]
    fn render_preserves_non_tab_bytes() {
        let raw = b"\x01\xff a\tz\x7f".to_vec();
        let row = Row::new(raw.clone(), 8);
        let without_spaces: Vec<u8> = row.render().iter().copied().filter(|&b| b != b' ').collect();
        let expected: Vec<u8> = raw.iter().copied().filter(|&b| b != b' ' && b != b'\t').collect();
        assert_eq!(without_spaces, expected);
    }

    #[test]
    fn render_row_is_repeatable() {
        let mut doc = doc_from("a\tb\n");
        let before = doc.row(0).unwrap().clone();
        doc.render_row(0);
        doc.render_row(7);
        assert_eq!(doc.row(0).unwrap(), &before);
    }

    // ── cx → rx ───────────────────────────────────────────────────────────

    #[test]
    fn cx_to_rx_across_tab() {
        let row = Row::new(b"a\tb".to_vec(), 8);
        assert_eq!(row.cx_to_rx(0, 8), 0);
        assert_eq!(row.cx_to_rx(1, 8), 1);
        assert_eq!(row.cx_to_rx(2, 8), 8);
        assert_eq!(row.cx_to_rx(3, 8), 9);
    }

    #[test]
    fn cx_to_rx_matches_rendered_length_at_end() {
        let row = Row::new(b"\tab\tc\t".to_vec(), 8);
        assert_eq!(row.cx_to_rx(row.size(), 8), row.rsize());
    }

    #[test]
    fn cx_to_rx_past_end_clamps() {
        let row = Row::new(b"ab".to_vec(), 8);
        assert_eq!(row.cx_to_rx(10, 8), 2);
    }

    #[test]
    fn document_cx_to_rx_past_last_row() {
        let doc = doc_from("a\tb");
        assert_eq!(doc.cx_to_rx(0, 2), 8);
        assert_eq!(doc.cx_to_rx(1, 0), 0);
    }

    // ── Loading ───────────────────────────────────────────────────────────

    #[test]
    fn load_strips_line_endings() {
        let doc = doc_from("one\ntwo\r\nthree");
        assert_eq!(doc.num_rows(), 3);
        assert_eq!(doc.row(0).unwrap().chars(), b"one");
        assert_eq!(doc.row(1).unwrap().chars(), b"two");
        assert_eq!(doc.row(2).unwrap().chars(), b"three");
    }

    #[test]
    fn load_keeps_blank_lines() {
        let doc = doc_from("a\n\nb\n");
        assert_eq!(doc.num_rows(), 3);
        assert_eq!(doc.row_len(1), 0);
    }

    #[test]
    fn load_empty_input() {
        let doc = doc_from("");
        assert!(doc.is_empty());
        assert_eq!(doc.num_rows(), 0);
    }

    #[test]
    fn load_non_utf8_bytes() {
        let mut doc = Document::default();
        doc.load_lines(&b"\xff\xfe\n"[..]).unwrap();
        assert_eq!(doc.row(0).unwrap().chars(), b"\xff\xfe");
    }

    #[test]
    fn append_row_copies_bytes() {
        let mut doc = Document::default();
        let mut bytes = b"abc".to_vec();
        doc.append_row(&bytes);
        bytes[0] = b'z';
        assert_eq!(doc.row(0).unwrap().chars(), b"abc");
    }

    #[test]
    fn row_len_past_end_is_zero() {
        let doc = doc_from("abc");
        assert_eq!(doc.row_len(0), 3);
        assert_eq!(doc.row_len(1), 0);
    }

    #[test]
    fn custom_tab_stop() {
        let mut doc = Document::new(4);
        doc.append_row(b"a\tb");
        assert_eq!(doc.row(0).unwrap().render(), b"a   b");
        assert_eq!(doc.cx_to_rx(0, 2), 4);
    }

    #[test]
    fn open_missing_file() {
        let err = Document::open(Path::new("/nonexistent/kirk/file.txt"), 8).unwrap_err();
        assert!(matches!(err, EditorError::Open { .. }));
    }

    #[test]
    fn open_reads_file() {
        let path = std::env::temp_dir().join(format!("kirk-doc-{}.txt", std::process::id()));
        std::fs::write(&path, "first\n\tsecond\n").unwrap();
        let doc = Document::open(&path, 8).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(doc.num_rows(), 2);
        assert_eq!(doc.row(1).unwrap().render(), b"        second");
    }
}
