// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// What the `exit` builtin was asked to do. The three cases are handled differently on
/// purpose:
///
/// | Argument        | Variant                      | Effect                                  |
/// |-----------------|------------------------------|-----------------------------------------|
/// | `"0"` (default) | [`ExitStatus::Normal`]       | Run the exit action, end the session    |
/// | all digits      | [`ExitStatus::Code`]         | End the session with that process code  |
/// | anything else   | [`ExitStatus::Message`]      | Print the text, keep the session going  |
///
/// A digit string too large for an `i32` is still a [`ExitStatus::Code`]. It is reduced
/// modulo [`EXIT_CODE_MODULUS`], which is the status a Unix parent sees anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStatus {
    Normal,
    Code(i32),
    Message(String),
}

impl ExitStatus {
    #[must_use]
    pub fn parse(status: &str) -> Self {
        if status == "0" {
            return ExitStatus::Normal;
        }

        let is_all_digits = !status.is_empty() && status.bytes().all(|it| it.is_ascii_digit());
        if !is_all_digits {
            return ExitStatus::Message(status.to_owned());
        }

        match status.parse::<i32>() {
            Ok(code) => ExitStatus::Code(code),
            Err(_) => ExitStatus::Code(reduce_exit_code(status)),
        }
    }

    /// The process exit code this status maps to.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            ExitStatus::Normal => 0,
            ExitStatus::Code(code) => *code,
            ExitStatus::Message(_) => 1,
        }
    }
}

/// Exit statuses are truncated to their low 8 bits by the OS.
pub const EXIT_CODE_MODULUS: u32 = 256;

/// `digits` modulo [`EXIT_CODE_MODULUS`], without parsing the whole number.
fn reduce_exit_code(digits: &str) -> i32 {
    let code = digits
        .bytes()
        .fold(0, |acc, it| (acc * 10 + u32::from(it - b'0')) % EXIT_CODE_MODULUS);
    i32::try_from(code).unwrap_or_default()
}
