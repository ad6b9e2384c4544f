// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Raw stdin reads with a timeout.
//
// Raw mode sets VMIN=0 and VTIME=1, so a `read()` on the tty returns as
// soon as one byte is available or after 100 ms with nothing. That
// timeout is the viewer's heartbeat: the key decoder wakes at least ten
// times a second even when the user is idle, and a lone ESC resolves
// into a keypress once its follow-up bytes fail to show up.
//
// The decoder never talks to stdin directly. It pulls bytes from a
// [`ByteSource`], which lets tests feed it scripted byte sequences with
// timeouts in exactly the places they want them.

use std::collections::VecDeque;
#[cfg(unix)]
use std::io;

use crate::error::Result;
#[cfg(unix)]
use crate::error::TermError;

/// A source of single bytes that may time out.
pub trait ByteSource {
    /// Read one byte.
    ///
    /// `Ok(None)` means the read timed out with nothing available. That
    /// is not an error: callers decide whether to wait again or give up.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    fn read_byte(&mut self) -> Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }
}

/// Scripted input: each entry is either a byte or a timeout.
///
/// Once the script runs dry every further read times out.
impl ByteSource for VecDeque<Option<u8>> {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.pop_front().flatten())
    }
}

/// Byte reader on the process's stdin descriptor.
///
/// Relies on the read timeout installed by
/// [`TerminalSession`](crate::terminal::TerminalSession); outside raw
/// mode a read blocks until a whole line is typed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TtyReader;

impl TtyReader {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl ByteSource for TtyReader {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };

        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                // Cygwin reports a VTIME expiry as EAGAIN; a signal mid-read
                // is just another empty tick.
                match err.kind() {
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                    _ => Err(TermError::os("read", err)),
                }
            }
        }
    }
}

#[cfg(not(unix))]
impl ByteSource for TtyReader {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match std::io::stdin().lock().read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(e) => Err(crate::error::TermError::os("read", e)),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
