// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Mock input and output devices, so the line editor and the REPL can be driven in tests
//! without a TTY.

// Attach sources.
pub mod input_device_ext;
pub mod key_events;
pub mod output_device_ext;
pub mod stdout_mock;

// Re-export.
pub use input_device_ext::*;
pub use key_events::*;
pub use output_device_ext::*;
pub use stdout_mock::*;
