// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::IsTerminal;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum TTYResult {
    IsInteractive,
    IsNotInteractive,
}

/// Returns [`TTYResult::IsInteractive`] only if stdin *and* stdout are TTYs. Reading keys
/// needs stdin, and the cursor escape sequences only make sense on stdout.
///
/// If you run `echo "help" | hello_repl` or `hello_repl | grep foo`, the following
/// returns [`TTYResult::IsNotInteractive`].
#[must_use]
pub fn is_fully_interactive_terminal() -> TTYResult {
    if std::io::stdin().is_terminal() && std::io::stdout().is_terminal() {
        TTYResult::IsInteractive
    } else {
        TTYResult::IsNotInteractive
    }
}
