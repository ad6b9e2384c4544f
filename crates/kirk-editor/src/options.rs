//! Viewer options.
//!
//! Two knobs, both with fixed defaults that match the classic behavior:
//!
//! | Option     | Env override   | Default       |
//! |------------|----------------|---------------|
//! | `tab_stop` | `KIRK_TABSTOP` | 8             |
//! | `quit_key` | —              | `Ctrl-Q`      |
//!
//! Overrides are read once at startup by [`Options::from_env`]. A value that
//! doesn't parse is ignored with a warning rather than aborting startup.

use kirk_term::input::ctrl_key;

/// Default distance between tab stops, in render columns.
pub const TAB_STOP: usize = 8;

/// Environment variable overriding [`Options::tab_stop`].
pub const TABSTOP_VAR: &str = "KIRK_TABSTOP";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Tabs advance the render column to the next multiple of this.
    pub tab_stop: usize,
    /// Control code that quits the viewer.
    pub quit_key: u8,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tab_stop: TAB_STOP,
            quit_key: ctrl_key(b'q'),
        }
    }
}

impl Options {
    /// Defaults, overridden by any valid environment settings.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) but with an injectable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();
        if let Some(raw) = lookup(TABSTOP_VAR) {
            match parse_tab_stop(&raw) {
                Some(n) => options.tab_stop = n,
                None => log::warn!("ignoring {TABSTOP_VAR}={raw:?}: expected a positive integer"),
            }
        }
        options
    }
}

/// Parse a tab stop: a positive decimal integer, surrounding spaces allowed.
#[must_use]
pub fn parse_tab_stop(raw: &str) -> Option<usize> {
    raw.trim().parse().ok().filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let o = Options::default();
        assert_eq!(o.tab_stop, 8);
        assert_eq!(o.quit_key, 0x11);
    }

    #[test]
    fn no_env_is_default() {
        assert_eq!(Options::from_lookup(|_| None), Options::default());
    }

    #[test]
    fn tabstop_override() {
        let o = Options::from_lookup(|name| (name == TABSTOP_VAR).then(|| "4".to_string()));
        assert_eq!(o.tab_stop, 4);
    }

    #[test]
    fn invalid_tabstop_is_ignored() {
        for bad in ["0", "-2", "four", ""] {
            let o = Options::from_lookup(|_| Some(bad.to_string()));
            assert_eq!(o.tab_stop, TAB_STOP, "{bad:?} should be ignored");
        }
    }

    #[test]
    fn parse_tab_stop_trims() {
        assert_eq!(parse_tab_stop(" 2 "), Some(2));
    }
}
