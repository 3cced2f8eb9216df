// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Underline + bold red. Written right before a run of consecutive spaces.
pub const DECORATION_START: &str = "\x1b[4m\x1b[31;1m";

/// Reset all attributes. Written right after a decorated run.
pub const DECORATION_END: &str = "\x1b[0m";

/// Shortest run of spaces that gets decorated.
pub const MIN_DECORATED_RUN_LEN: usize = 2;

/// Result of [`highlight()`]. Recomputed from scratch for every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightOutcome {
    /// The input text with every decorated run wrapped in [`DECORATION_START`] and
    /// [`DECORATION_END`]. Nothing else is added or removed.
    pub decorated_text: String,

    /// `true` when no run was decorated, ie the line can be accepted.
    pub is_valid: bool,
}

/// Wrap every run of [`MIN_DECORATED_RUN_LEN`] or more consecutive spaces with the
/// decoration markers.
///
/// Consecutive spaces in a line almost always mean that the arguments were not separated
/// the way the user intended, so they are flagged in red before the line is submitted.
/// The whole run is measured before anything is written, so a run that grows by one
/// space is still wrapped exactly once. A single space is never decorated, and runs at
/// the very start or end of the text are decorated like any other.
///
/// ```
/// use r3bl_repl::{DECORATION_END, DECORATION_START, highlight};
///
/// let outcome = highlight("a  b");
/// assert!(!outcome.is_valid);
/// assert_eq!(
///     outcome.decorated_text,
///     format!("a{DECORATION_START}  {DECORATION_END}b")
/// );
/// assert!(highlight("a b").is_valid);
/// ```
#[must_use]
pub fn highlight(text: &str) -> HighlightOutcome {
    let mut decorated_text = String::with_capacity(text.len());
    let mut is_valid = true;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != ' ' {
            decorated_text.push(ch);
            continue;
        }

        let mut run_len = 1;
        while chars.next_if_eq(&' ').is_some() {
            run_len += 1;
        }

        if run_len >= MIN_DECORATED_RUN_LEN {
            is_valid = false;
            decorated_text.push_str(DECORATION_START);
            decorated_text.extend(std::iter::repeat_n(' ', run_len));
            decorated_text.push_str(DECORATION_END);
        } else {
            decorated_text.push(' ');
        }
    }

    HighlightOutcome {
        decorated_text,
        is_valid,
    }
}

/// Shorthand for `highlight(text).is_valid`.
#[must_use]
pub fn is_line_valid(text: &str) -> bool { highlight(text).is_valid }
