//! # kirk-editor — Viewer core for kirk
//!
//! This crate holds the state the viewer draws from and the code that turns
//! it into frames:
//!
//! - **[`document`]** — rows of raw bytes plus their tab-expanded rendering
//! - **[`cursor`]** — cursor position and movement within the document
//! - **[`view`]** — scroll offsets and composition of a full-screen frame
//! - **[`options`]** — tab stop and quit key, with environment overrides
//! - **[`error`]** — errors surfaced to the binary
//!
//! Nothing here touches the terminal directly; frames are assembled into an
//! [`OutputBuffer`](kirk_term::output::OutputBuffer) and written by the
//! caller.

pub mod cursor;
pub mod document;
pub mod error;
pub mod options;
pub mod view;

pub use error::EditorError;
