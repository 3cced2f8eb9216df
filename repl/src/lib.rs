// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The `r3bl_repl` library turns raw terminal keystrokes into a line editing, command
//! dispatching REPL (read execute print loop). It puts the terminal in raw mode, renders
//! an editable prompt line with live feedback, refuses to accept a line that looks
//! malformed, then turns the accepted line into a command call.
//!
//! # Table of contents
//!
//! <!-- TOC -->
//!
//! - [Mental model](#mental-model)
//! - [Line editing](#line-editing)
//! - [Commands](#commands)
//! - [Configuration and exit policy](#configuration-and-exit-policy)
//! - [Testing](#testing)
//!
//! <!-- /TOC -->
//!
//! # Mental model
//!
//! ```text
//! InputDevice ─ RawEvent ─▶ LineState ─ EditResult ─▶ Readline ─ line ─▶ tokenize()
//!                               │                                          │
//!                          highlight()                         CommandInvocation
//!                          unescape()                                      │
//!                                                      dispatch() ─▶ CommandRegistry
//! ```
//!
//! 1. [`Readline::read_line()`] blocks on the next event from the [`InputDevice`] and
//!    feeds it to the [`LineState`] state machine, one event at a time. Raw mode is held
//!    by a [`RawModeGuard`] for exactly as long as one line is being read.
//! 2. After every keystroke the line is normalized by [`unescape()`] and rendered with
//!    [`highlight()`], which underlines runs of consecutive spaces in red.
//! 3. Pressing `Enter` on a line that still has a highlighted run rings the terminal bell
//!    instead of accepting the line.
//! 4. An accepted line is split by [`tokenize()`] into a [`CommandInvocation`], which
//!    [`dispatch()`] hands to the matching [`Command`] in the [`CommandRegistry`].
//!
//! # Line editing
//!
//! | Key         | Effect                                                        |
//! |-------------|---------------------------------------------------------------|
//! | printable   | Insert at the cursor                                          |
//! | `Backspace` | Delete the character before the cursor                        |
//! | `Left`      | Move the cursor left (stops at the start)                     |
//! | `Right`     | Move the cursor right (stops at the end)                      |
//! | `Enter`     | Accept the line if it is valid, otherwise ring the bell       |
//! | `Ctrl+C`    | Interrupt: exit, restart the line, or signal the caller       |
//! | `Ctrl+D`    | End of input: exit, or signal the caller                      |
//!
//! Typing a backslash escape like `\n` or `\x1b` turns it into the literal control
//! character. The cursor is corrected so it keeps pointing at the same character.
//!
//! # Commands
//!
//! Commands are registered explicitly, along with the names of their parameters and a
//! description that [`builtins::help_command()`] prints.
//!
//! ```
//! use r3bl_repl::{Command, CommandOutput, CommandRegistry, builtins};
//!
//! let mut registry = CommandRegistry::default();
//! builtins::register_builtins(&mut registry);
//! registry.register(
//!     Command::new("greet", |args| {
//!         let name = args.get("name").unwrap_or("stranger");
//!         Ok(CommandOutput::Print(format!("Hello {name}.")))
//!     })
//!     .optional_param("name")
//!     .description("Greets someone."),
//! );
//! ```
//!
//! The line `greet name:Ada` binds `Ada` to the `name` parameter, so does `greet Ada`.
//!
//! # Configuration and exit policy
//!
//! [`ReplConfig::builder()`] produces an immutable configuration. It controls the prompt,
//! what `Ctrl+C` and `Ctrl+D` do, the action to run at exit, the optional password for
//! commands that require authorization, and the [`ErrorPolicy`] that decides whether an
//! unknown command or bad arguments are returned as an error or redirected to a
//! fallback.
//!
//! The `exit` builtin follows a deliberately asymmetric policy, see [`ExitStatus`].
//!
//! # Testing
//!
//! Every part of this crate can be driven without a real terminal. The
//! [`test_fixtures`] module provides a [`StdoutMock`] output device and a mock
//! [`InputDevice`] that replays a list of events.

// https://github.com/rust-lang/rust-clippy
// https://rust-lang.github.io/rust-clippy/master/index.html
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod command_impl;
pub mod highlighter;
pub mod public_api;
pub mod readline_impl;
pub mod terminal_io;
pub mod test_fixtures;
pub mod tracing_logging;

// Re-export the public API.
pub use command_impl::*;
pub use highlighter::*;
pub use public_api::*;
pub use readline_impl::*;
pub use terminal_io::*;
pub use test_fixtures::*;
pub use tracing_logging::*;

// Type aliases.
use smallvec::SmallVec;
use std::sync::Arc;

pub type StdMutex<T> = std::sync::Mutex<T>;

pub type SendRawTerminal = dyn std::io::Write + Send;
pub type SafeRawTerminal = Arc<StdMutex<SendRawTerminal>>;

pub type CrosstermEventResult = std::io::Result<crossterm::event::Event>;

pub type CommonResult<T> = miette::Result<T>;

pub type InlineVec<T> = SmallVec<[T; INLINE_VEC_SIZE]>;

// Constants.
pub const INLINE_VEC_SIZE: usize = 8;
pub const DEFAULT_PROMPT: &str = "> ";
pub const PASSWORD_PROMPT: &str = "Password: ";
pub const PASSWORD_MASK_CHAR: char = '•';
