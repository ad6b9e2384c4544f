// SPDX-License-Identifier: MIT
//
// Terminal errors.
//
// Every OS-level failure carries the name of the call that failed, so
// the top-level handler can print `tcsetattr: Inappropriate ioctl for
// device` instead of a bare errno.

use std::io;

use thiserror::Error;

/// Errors raised while talking to the terminal.
#[derive(Debug, Error)]
pub enum TermError {
    /// A system call on the terminal failed.
    #[error("{op}: {source}")]
    Os {
        /// Name of the failing operation (`tcgetattr`, `read`, ...).
        op: &'static str,
        #[source]
        source: io::Error,
    },

    /// The reply to a cursor position request was not `ESC [ rows ; cols R`.
    #[error("getCursorPosition: malformed cursor position report")]
    CursorReport,
}

impl TermError {
    /// Wrap the calling thread's last OS error under `op`.
    #[must_use]
    pub fn last_os(op: &'static str) -> Self {
        Self::Os {
            op,
            source: io::Error::last_os_error(),
        }
    }

    /// Wrap an existing I/O error under `op`.
    #[must_use]
    pub const fn os(op: &'static str, source: io::Error) -> Self {
        Self::Os { op, source }
    }
}

pub type Result<T> = std::result::Result<T, TermError>;
