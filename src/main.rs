// SPDX-License-Identifier: MIT
//
// kirk — a small read-only terminal text viewer.
//
// This is the binary that wires the crates together:
//
//   kirk-term   → raw mode, window size, key decoding, single-write output
//   kirk-editor → document rows, cursor, viewport, frame composition
//
// The Editor struct is the one context object for a session. Each loop
// iteration draws a frame, waits for a key, and dispatches it:
//
//   refresh_screen → scroll → compose → one write
//   wait_key       → decode → cursor movement / quit
//
// Startup order matters: raw mode first (the window size fallback talks
// to the terminal and needs unbuffered, unechoed input), then the window
// size, then the file.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use kirk_editor::cursor::{Cursor, Direction};
use kirk_editor::document::Document;
use kirk_editor::error::{EditorError, Result};
use kirk_editor::options::Options;
use kirk_editor::view::{self, Viewport};

use kirk_term::ansi;
use kirk_term::input::{self, Key};
use kirk_term::output::{OutputBuffer, TtyWriter};
use kirk_term::reader::{ByteSource, TtyReader};
use kirk_term::terminal::{self, Size, TerminalSession};

/// Log destination; logging is off unless this is set.
const LOG_FILE_VAR: &str = "KIRK_LOG_FILE";

/// Log filter, in `env_logger` syntax.
const LOG_FILTER_VAR: &str = "KIRK_LOG";

// ─── CLI ────────────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "kirk", version, about = "A small read-only terminal text viewer")]
struct Cli {
    /// Text file to open.
    file: Option<PathBuf>,
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// What the loop does after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Continue,
    Quit,
}

/// Session state: the document, where we are in it, and the terminal ends.
///
/// Generic over the writer and the byte source so tests can drive the
/// whole loop without a tty.
struct Editor<W: Write, S: ByteSource> {
    doc: Document,
    cursor: Cursor,
    view: Viewport,
    screen: Size,
    options: Options,
    frame: OutputBuffer,
    out: W,
    input: S,
}

impl<W: Write, S: ByteSource> Editor<W, S> {
    fn new(doc: Document, screen: Size, options: Options, out: W, input: S) -> Self {
        Self {
            doc,
            cursor: Cursor::new(),
            view: Viewport::new(),
            screen,
            options,
            frame: OutputBuffer::new(),
            out,
            input,
        }
    }

    /// Run until the quit key.
    fn run(&mut self) -> Result<()> {
        loop {
            self.refresh_screen()?;
            if self.process_keypress()? == Action::Quit {
                return Ok(());
            }
        }
    }

    /// Draw one frame and send it in a single write.
    fn refresh_screen(&mut self) -> Result<()> {
        self.view.scroll(&mut self.cursor, &self.doc, self.screen);

        self.frame.clear();
        view::compose(&self.doc, &self.cursor, &self.view, self.screen, &mut self.frame)?;
        self.frame.flush_to(&mut self.out)?;
        Ok(())
    }

    /// Wait for one key and act on it.
    fn process_keypress(&mut self) -> Result<Action> {
        let key = input::wait_key(&mut self.input)?;
        Ok(self.handle_key(key)?)
    }

    fn handle_key(&mut self, key: Key) -> io::Result<Action> {
        match key {
            Key::Ctrl(code) if code == self.options.quit_key => {
                ansi::clear_screen(&mut self.out)?;
                ansi::cursor_home(&mut self.out)?;
                self.out.flush()?;
                log::debug!("quit");
                return Ok(Action::Quit);
            }
            Key::Home => self.cursor.home(),
            Key::End => self.cursor.end(&self.doc),
            Key::PageUp => self.cursor.step_n(Direction::Up, self.screen.rows, &self.doc),
            Key::PageDown => self.cursor.step_n(Direction::Down, self.screen.rows, &self.doc),
            Key::Up => self.cursor.step(Direction::Up, &self.doc),
            Key::Down => self.cursor.step(Direction::Down, &self.doc),
            Key::Left => self.cursor.step(Direction::Left, &self.doc),
            Key::Right => self.cursor.step(Direction::Right, &self.doc),
            Key::Char(_) | Key::Ctrl(_) | Key::Delete | Key::Escape => {}
        }
        Ok(Action::Continue)
    }
}

// ─── Startup ────────────────────────────────────────────────────────────────

/// Send log output to `$KIRK_LOG_FILE`, if set.
///
/// The screen belongs to the viewer, so there is no stderr fallback.
fn init_logging() {
    let Some(path) = std::env::var_os(LOG_FILE_VAR) else {
        return;
    };
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("kirk: cannot open log file {}: {e}", PathBuf::from(path).display());
            return;
        }
    };

    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_FILTER_VAR, "debug"))
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let options = Options::from_env();
    let mut session = TerminalSession::enter()?;

    let mut out = TtyWriter::new();
    let mut input = TtyReader::new();
    let screen = terminal::window_size(&mut out, &mut input)?;

    let doc = match &cli.file {
        Some(path) => Document::open(path, options.tab_stop)?,
        None => Document::new(options.tab_stop),
    };

    Editor::new(doc, screen, options, out, input).run()?;
    session.leave()?;
    Ok(())
}

/// Leave the screen clean, then describe the failure on `err`.
///
/// Write failures are ignored: we are already on the way out.
fn report_fatal(out: &mut impl Write, err: &mut impl Write, e: &EditorError) {
    let _ = ansi::clear_screen(out);
    let _ = ansi::cursor_home(out);
    let _ = out.flush();
    let _ = writeln!(err, "kirk: {e}");
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    // The session has already been dropped (terminal restored) by the
    // time run() hands back an error.
    if let Err(e) = run(&cli) {
        log::error!("{e}");
        report_fatal(&mut TtyWriter::new(), &mut io::stderr().lock(), &e);
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
