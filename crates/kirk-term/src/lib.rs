// SPDX-License-Identifier: MIT
//
// kirk-term — Terminal layer for kirk.
//
// Everything that touches the tty lives here: entering and leaving raw
// mode, discovering the window size, decoding keypresses out of the raw
// byte stream, and pushing whole frames to the screen in one write.
//
// Like its sibling crates it talks to the terminal directly through
// termios and ANSI escape sequences. No TUI framework sits in between,
// so every byte sent or received is one we chose.

pub mod ansi;
pub mod error;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;

pub use error::{Result, TermError};
