// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, window size, and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ) and isatty. These are the standard POSIX
// interfaces for terminal control; there is no safe alternative. Each
// unsafe block is minimal.
#![allow(unsafe_code)]
//
// This module owns the terminal's mode state. `TerminalSession::enter`
// snapshots the original termios and switches to raw mode with a 100 ms
// read timeout; the snapshot is restored exactly once, by whichever of
// `leave()`, `Drop`, or the panic hook gets there first.
//
// The snapshot lives in a process-wide slot rather than only in the
// session struct because the panic hook can't reach the struct. Restoring
// *takes* the snapshot out of the slot under its lock, which is what makes
// the restore happen once no matter how many exit paths race for it.

use std::io::Write;
#[cfg(unix)]
use std::sync::Mutex;
use std::sync::Once;

use crate::ansi;
use crate::error::{Result, TermError};
use crate::reader::ByteSource;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of rows (height in character cells).
    pub rows: usize,
    /// Number of columns (width in character cells).
    pub cols: usize,
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if the query fails or reports zero columns (some
/// terminals answer the ioctl with an all-zero struct).
#[cfg(unix)]
#[must_use]
pub fn query_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

    if result == -1 || ws.ws_col == 0 {
        None
    } else {
        Some(Size {
            rows: usize::from(ws.ws_row),
            cols: usize::from(ws.ws_col),
        })
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn query_size() -> Option<Size> {
    None
}

/// Longest cursor position reply we are willing to buffer.
const CURSOR_REPORT_MAX: usize = 31;

/// Parse a cursor position report `ESC [ rows ; cols` (the trailing `R`
/// already stripped).
///
/// Returns `None` if the prefix is wrong or either number is missing or
/// not a decimal integer.
#[must_use]
pub fn parse_cursor_report(reply: &[u8]) -> Option<Size> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let body = std::str::from_utf8(body).ok()?;
    let (rows, cols) = body.split_once(';')?;
    Some(Size {
        rows: rows.parse().ok()?,
        cols: cols.parse().ok()?,
    })
}

/// Ask the terminal where its cursor is.
///
/// Writes a DSR request to `out` and collects the reply from `input` up
/// to the terminating `R`, a read timeout, or [`CURSOR_REPORT_MAX`] bytes,
/// whichever comes first.
///
/// # Errors
///
/// Returns [`TermError::CursorReport`] if the reply is malformed, or an
/// OS error if the write or a read fails.
pub fn cursor_position(out: &mut impl Write, input: &mut impl ByteSource) -> Result<Size> {
    ansi::request_cursor_position(out).map_err(|e| TermError::os("write", e))?;
    out.flush().map_err(|e| TermError::os("write", e))?;

    let mut reply = Vec::with_capacity(CURSOR_REPORT_MAX);
    while reply.len() < CURSOR_REPORT_MAX {
        match input.read_byte()? {
            Some(b'R') | None => break,
            Some(b) => reply.push(b),
        }
    }

    parse_cursor_report(&reply).ok_or(TermError::CursorReport)
}

/// Discover the window size.
///
/// Tries `TIOCGWINSZ` first. If that is unavailable, pushes the cursor
/// to the bottom-right corner and reads back its position.
///
/// # Errors
///
/// Fails only if the fallback path fails.
pub fn window_size(out: &mut impl Write, input: &mut impl ByteSource) -> Result<Size> {
    if let Some(size) = query_size() {
        log::debug!("window size {}x{} from ioctl", size.cols, size.rows);
        return Ok(size);
    }

    ansi::cursor_to_far_corner(out).map_err(|e| TermError::os("write", e))?;
    out.flush().map_err(|e| TermError::os("write", e))?;
    let size = cursor_position(out, input)?;
    log::debug!("window size {}x{} from cursor report", size.cols, size.rows);
    Ok(size)
}

// ─── Raw Mode ───────────────────────────────────────────────────────────────

/// Read timeout in tenths of a second (`VTIME`).
pub const READ_TIMEOUT_DECISECONDS: u8 = 1;

/// Derive the raw attribute set from `termios` in place.
///
/// Input: no break-to-SIGINT, no CR→NL, no parity check, no 8th-bit
/// strip, no XON/XOFF. Output: no post-processing. Local: no echo, no
/// canonical mode, no extended processing, no signal characters.
/// 8-bit characters. `read()` returns after any input or 100 ms.
#[cfg(unix)]
pub fn make_raw(termios: &mut libc::termios) {
    termios.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    termios.c_oflag &= !libc::OPOST;
    termios.c_cflag |= libc::CS8;
    termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

    termios.c_cc[libc::VMIN] = 0;
    termios.c_cc[libc::VTIME] = READ_TIMEOUT_DECISECONDS;
}

/// Snapshot of the original termios, shared with the panic hook.
///
/// `Some` exactly while raw mode is in effect.
#[cfg(unix)]
static SNAPSHOT: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore the snapshot if it hasn't been restored yet.
///
/// Returns `Ok(false)` when there was nothing left to restore.
#[cfg(unix)]
fn restore_snapshot() -> Result<bool> {
    let mut guard = SNAPSHOT
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    let Some(original) = guard.take() else {
        return Ok(false);
    };

    if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const original) } == -1
    {
        return Err(TermError::last_os("tcsetattr"));
    }
    Ok(true)
}

#[cfg(not(unix))]
fn restore_snapshot() -> Result<bool> {
    Ok(false)
}

/// Panic hook guard — ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that leaves raw mode before printing the error.
///
/// Without this, a panic leaves the user's shell without echo or line
/// editing, and the panic message itself is smeared across the screen
/// because output post-processing is off.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore_snapshot();
            original(info);
        }));
    });
}

// ─── TerminalSession ────────────────────────────────────────────────────────

/// Raw-mode session with RAII cleanup.
///
/// While a session is alive the terminal is in raw mode. The original
/// mode comes back when the session is [left](Self::leave) or dropped,
/// including during a panic unwind.
///
/// # Example
///
/// ```no_run
/// use kirk_term::terminal::TerminalSession;
///
/// let session = TerminalSession::enter()?;
/// // ... read keys, draw frames ...
/// drop(session); // original mode restored
/// # Ok::<(), kirk_term::TermError>(())
/// ```
#[derive(Debug)]
pub struct TerminalSession {
    active: bool,
}

impl TerminalSession {
    /// Snapshot the current attributes and switch stdin to raw mode.
    ///
    /// # Errors
    ///
    /// Returns an error if `tcgetattr` or `tcsetattr` fails (for
    /// example, when stdin is not a terminal).
    #[cfg(unix)]
    pub fn enter() -> Result<Self> {
        install_panic_hook();

        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) } == -1 {
            return Err(TermError::last_os("tcgetattr"));
        }

        *SNAPSHOT
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(termios);
        // From here on Drop owns the restore, even if the next call fails.
        let session = Self { active: true };

        make_raw(&mut termios);
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const termios) }
            == -1
        {
            return Err(TermError::last_os("tcsetattr"));
        }

        log::debug!("entered raw mode");
        Ok(session)
    }

    #[cfg(not(unix))]
    pub fn enter() -> Result<Self> {
        install_panic_hook();
        Ok(Self { active: true })
    }

    /// Whether this session still holds the terminal in raw mode.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Restore the original terminal attributes.
    ///
    /// Idempotent: leaving twice (or dropping after leaving) restores
    /// only once.
    ///
    /// # Errors
    ///
    /// Returns an error if `tcsetattr` fails.
    pub fn leave(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        if restore_snapshot()? {
            log::debug!("left raw mode");
        }
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = self.leave() {
            log::error!("failed to restore terminal: {e}");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
