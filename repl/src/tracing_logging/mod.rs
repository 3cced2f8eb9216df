// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Opt in [`tracing`] output. The library only emits events, nothing is logged until a
//! subscriber is installed with [`init_tracing()`].
//!
//! Logging to the display while the line editor owns the terminal garbles the prompt,
//! so binaries should prefer [`WriterConfig::File`].

// Attach sources.
pub mod init_tracing;
pub mod rolling_file_appender_impl;
pub mod tracing_config;

// Re-export.
pub use init_tracing::*;
pub use tracing_config::*;
