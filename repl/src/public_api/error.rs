// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::ReadlineError;
use std::io;

/// Every way the REPL can fail. Dispatch failures ([`ReplError::CommandNotFound`] and
/// [`ReplError::ArgumentMismatch`]) may be redirected to a fallback by
/// [`crate::ErrorPolicy::Lenient`]; everything else always reaches the caller.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ReplError {
    /// No command is registered under the first token of the line.
    #[error("Command `{name}` not found")]
    #[diagnostic(
        code(r3bl_repl::dispatch::command_not_found),
        help("Type `help` to see every registered command")
    )]
    CommandNotFound { name: String },

    /// The line's arguments don't fit the command's parameters.
    #[error("Invalid arguments for `{name}`: {reason}")]
    #[diagnostic(
        code(r3bl_repl::dispatch::argument_mismatch),
        help("Type `help {name}` to see the parameters of this command")
    )]
    ArgumentMismatch { name: String, reason: String },

    /// A handler ran and reported a failure of its own.
    #[error("Command `{name}` failed: {message}")]
    #[diagnostic(code(r3bl_repl::dispatch::command_failed))]
    CommandFailed { name: String, message: String },

    #[error("Please run on a TTY-supporting (Unix) terminal")]
    #[diagnostic(
        code(r3bl_repl::terminal::unsupported),
        help("stdin and stdout must both be a terminal that supports raw mode")
    )]
    TerminalUnsupported,

    /// `Ctrl+C` under [`crate::InterruptBehavior::Signal`].
    #[error("Interrupted")]
    #[diagnostic(code(r3bl_repl::session::interrupted))]
    Interrupted,

    /// `Ctrl+D` when it doesn't terminate the session.
    #[error("End of input")]
    #[diagnostic(code(r3bl_repl::session::end_of_input))]
    EndOfInput,

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(r3bl_repl::config::invalid))]
    InvalidConfig(String),

    #[error(transparent)]
    #[diagnostic(code(r3bl_repl::io))]
    IO(#[from] io::Error),
}

impl From<ReadlineError> for ReplError {
    fn from(error: ReadlineError) -> Self {
        match error {
            ReadlineError::IO(error) => ReplError::IO(error),
            ReadlineError::RawMode(error) => {
                tracing::error!(message = "Raw mode -> unavailable", %error);
                ReplError::TerminalUnsupported
            }
        }
    }
}

impl ReplError {
    /// `true` for the errors that [`crate::ErrorPolicy::Lenient`] may redirect.
    #[must_use]
    pub fn is_dispatch_error(&self) -> bool {
        matches!(
            self,
            ReplError::CommandNotFound { .. } | ReplError::ArgumentMismatch { .. }
        )
    }
}
