// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::terminal;
use std::io;

/// Holds the terminal in raw mode for as long as it is alive. Dropping it restores the
/// mode that was in effect before, on every exit path, including panics and `?`.
///
/// ```no_run
/// use r3bl_repl::RawModeGuard;
///
/// {
///     let _guard = RawModeGuard::acquire(false)?;
///     // Terminal is now in raw mode
///     // ... do work ...
/// } // Raw mode automatically disabled when guard is dropped
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct RawModeGuard {
    /// `false` when raw mode was already on, or the output is a mock. Then drop is a
    /// no-op.
    should_restore: bool,
}

impl RawModeGuard {
    /// Enable raw mode, unless `is_mock` is set or the terminal is already in raw mode.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be enabled, eg stdin is not a TTY.
    pub fn acquire(is_mock: bool) -> io::Result<Self> {
        if is_mock || terminal::is_raw_mode_enabled()? {
            return Ok(Self {
                should_restore: false,
            });
        }

        terminal::enable_raw_mode()?;
        tracing::trace!(message = "Raw mode -> enabled");
        Ok(Self {
            should_restore: true,
        })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.should_restore {
            drop(terminal::disable_raw_mode());
            tracing::trace!(message = "Raw mode -> disabled");
        }
    }
}
