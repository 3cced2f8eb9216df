// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Pure text transformations that run on the line on every keystroke.
//!
//! - [`highlight()`] decorates runs of consecutive spaces and reports whether the line
//!   can be accepted.
//! - [`unescape()`] turns backslash escapes into the control characters they name, and
//!   corrects the cursor index for the change in length.
//!
//! Neither function touches the terminal, and neither caches anything, since the result
//! has to reflect the line exactly as it is mid edit.

// Attach sources.
pub mod highlight;
pub mod unescape;

// Re-export.
pub use highlight::*;
pub use unescape::*;
