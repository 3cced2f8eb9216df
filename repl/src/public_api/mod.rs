// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod config;
pub mod error;
pub mod repl;

// Re-export.
pub use config::*;
pub use error::*;
pub use repl::*;
