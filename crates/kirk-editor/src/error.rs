//! Errors surfaced by the viewer core.

use std::io;
use std::path::PathBuf;

use kirk_term::TermError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Term(#[from] TermError),

    #[error("fopen: {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("getline: {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
