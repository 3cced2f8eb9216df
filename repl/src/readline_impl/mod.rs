// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod line_state;
pub mod raw_event;
pub mod readline;

// Re-export.
pub use line_state::*;
pub use raw_event::*;
pub use readline::*;
