// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod input_device;
pub mod output_device;
pub mod raw_mode;
pub mod tty;

// Re-export.
pub use input_device::*;
pub use output_device::*;
pub use raw_mode::*;
pub use tty::*;
