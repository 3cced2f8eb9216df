// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod builtins;
pub mod dispatcher;
pub mod exit_status;
pub mod registry;
pub mod tokenizer;

// Re-export.
pub use dispatcher::*;
pub use exit_status::*;
pub use registry::*;
pub use tokenizer::*;
