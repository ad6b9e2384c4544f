// SPDX-License-Identifier: MIT
//
// Key decoder.
//
// Turns the raw stdin byte stream into logical keys. Plain bytes map to
// themselves; the escape byte starts a short sequence that names a
// navigation key:
//
//   ESC [ A..D        arrows          ESC [ H / ESC [ F     Home / End
//   ESC [ n ~         n = 1/7 Home, 2 Delete, 4/8 End, 5 PageUp, 6 PageDown
//   ESC O H / ESC O F Home / End (SS3 form)
//
// # Design
//
// Decoding is an explicit state machine: each state reads at most one
// byte through the [`ByteSource`] and either finishes with a key or moves
// to the next state. Final bytes are resolved through small lookup
// tables, so adding a sequence means adding a table row.
//
// Every read carries the raw-mode timeout. If a sequence stalls halfway
// (the user really pressed Escape, or sent a sequence we don't know) the
// decoder gives up and reports [`Key::Escape`] rather than waiting. It
// never blocks past one read timeout per byte and never fails on bad
// input; only I/O errors propagate.

use crate::error::Result;
use crate::reader::ByteSource;

/// The escape byte that introduces every multi-byte sequence.
pub const ESC: u8 = 0x1b;

/// A decoded keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable byte (anything that is not a control code).
    Char(u8),
    /// A control code: 0x00..=0x1F or DEL (0x7F), as read.
    Ctrl(u8),
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    // ── Editing ─────────────────────────────────────────────────
    Delete,
    /// A lone ESC, or an escape sequence we could not resolve.
    Escape,
}

impl Key {
    /// Classify a plain (non-escape) byte.
    #[must_use]
    pub const fn from_byte(b: u8) -> Self {
        if b.is_ascii_control() {
            Self::Ctrl(b)
        } else {
            Self::Char(b)
        }
    }
}

/// The control code produced by holding Ctrl with `letter`.
///
/// Terminals clear the top three bits: `ctrl_key(b'q') == 0x11`.
#[inline]
#[must_use]
pub const fn ctrl_key(letter: u8) -> u8 {
    letter & 0x1f
}

// ─── Lookup tables ──────────────────────────────────────────────────────────

/// `ESC [ <digit> ~` sequences, keyed by the digit.
///
/// `3` is absent on purpose: the classic VT `Delete` code is left
/// unmapped and decodes to [`Key::Escape`].
const TILDE_KEYS: &[(u8, Key)] = &[
    (b'1', Key::Home),
    (b'2', Key::Delete),
    (b'4', Key::End),
    (b'5', Key::PageUp),
    (b'6', Key::PageDown),
    (b'7', Key::Home),
    (b'8', Key::End),
];

/// `ESC [ <letter>` sequences, keyed by the letter.
const CSI_KEYS: &[(u8, Key)] = &[
    (b'A', Key::Up),
    (b'B', Key::Down),
    (b'C', Key::Right),
    (b'D', Key::Left),
    (b'H', Key::Home),
    (b'F', Key::End),
];

/// `ESC O <letter>` sequences, keyed by the letter.
const SS3_KEYS: &[(u8, Key)] = &[(b'H', Key::Home), (b'F', Key::End)];

fn lookup(table: &[(u8, Key)], byte: u8) -> Option<Key> {
    table.iter().find(|&&(b, _)| b == byte).map(|&(_, key)| key)
}

// ─── State machine ──────────────────────────────────────────────────────────

/// Decoder position inside an escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Just read ESC; the next byte picks the sequence family.
    Escape,
    /// Read `ESC [`; expecting a letter or a digit.
    Csi,
    /// Read `ESC [ <digit>`; expecting `~`.
    CsiParam(u8),
    /// Read `ESC O` (or `ESC 0`); expecting a letter.
    Ss3,
}

/// Outcome of feeding one byte to a state.
enum Step {
    Next(State),
    Done(Key),
}

impl State {
    fn step(self, byte: u8) -> Step {
        match self {
            Self::Escape => match byte {
                b'[' => Step::Next(Self::Csi),
                b'O' | b'0' => Step::Next(Self::Ss3),
                _ => Step::Done(Key::Escape),
            },
            Self::Csi if byte.is_ascii_digit() => Step::Next(Self::CsiParam(byte)),
            Self::Csi => Step::Done(lookup(CSI_KEYS, byte).unwrap_or(Key::Escape)),
            Self::CsiParam(digit) if byte == b'~' => {
                Step::Done(lookup(TILDE_KEYS, digit).unwrap_or(Key::Escape))
            }
            Self::CsiParam(_) => Step::Done(Key::Escape),
            Self::Ss3 => Step::Done(lookup(SS3_KEYS, byte).unwrap_or(Key::Escape)),
        }
    }
}

/// Decode one key from `src`.
///
/// Returns `Ok(None)` when the first read times out: nothing was typed
/// and the caller should simply try again.
///
/// # Errors
///
/// Propagates read failures from the byte source.
pub fn read_key(src: &mut impl ByteSource) -> Result<Option<Key>> {
    let Some(first) = src.read_byte()? else {
        return Ok(None);
    };

    if first != ESC {
        return Ok(Some(Key::from_byte(first)));
    }

    // The two bytes after ESC are both read before either is examined,
    // so `ESC x y` swallows the `y` as well.
    let mut lead = [0u8; 2];
    for slot in &mut lead {
        let Some(byte) = src.read_byte()? else {
            log::trace!("lone escape");
            return Ok(Some(Key::Escape));
        };
        *slot = byte;
    }

    let mut lead = lead.into_iter();
    let mut state = State::Escape;
    loop {
        let byte = match lead.next() {
            Some(byte) => byte,
            None => match src.read_byte()? {
                Some(byte) => byte,
                None => {
                    log::trace!("escape sequence timed out in state {state:?}");
                    return Ok(Some(Key::Escape));
                }
            },
        };
        match state.step(byte) {
            Step::Next(next) => state = next,
            Step::Done(key) => {
                if key == Key::Escape {
                    log::trace!("unresolved escape sequence ending in {byte:#04x}");
                }
                return Ok(Some(key));
            }
        }
    }
}

/// Block (in read-timeout sized steps) until a key arrives.
///
/// # Errors
///
/// Propagates read failures from the byte source.
pub fn wait_key(src: &mut impl ByteSource) -> Result<Key> {
    loop {
        if let Some(key) = read_key(src)? {
            return Ok(key);
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
