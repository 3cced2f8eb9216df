// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CancelReason, ControlSignalPolicy, EditResult, InputDevice, LineState,
            OutputDevice, RawEvent, RawModeGuard, lock_output_device_as_mut};
use std::io;
use thiserror::Error;

/// Reads one line at a time from an [`InputDevice`], and renders it to an
/// [`OutputDevice`].
///
/// # Raw mode
///
/// Raw mode is turned on at the start of [`Readline::read_line()`], and restored before
/// it returns, no matter how it returns. In between the terminal doesn't echo, doesn't
/// buffer lines, and doesn't turn `Ctrl+C` into a signal. Outside of a `read_line()` call
/// (eg while a command runs and prints) the terminal is back in cooked mode.
///
/// # Mocking
///
/// Pass a mock [`OutputDevice`] (see [`crate::OutputDeviceExt`]) to skip raw mode
/// entirely, and a mock [`InputDevice`] (see [`crate::InputDeviceExt`]) to replay key
/// presses. A mock input that runs out behaves as if `Ctrl+D` was pressed.
#[allow(missing_debug_implementations)]
pub struct Readline {
    pub input_device: InputDevice,
    pub output_device: OutputDevice,
    pub line_state: LineState,
}

/// Error returned from [`Readline::read_line()`].
#[derive(Debug, Error)]
pub enum ReadlineError {
    /// An internal I/O error occurred.
    #[error(transparent)]
    IO(#[from] io::Error),

    /// The terminal refused to switch to raw mode.
    #[error("unable to enable raw mode")]
    RawMode(#[source] io::Error),
}

/// Events returned by [`Readline::read_line()`].
#[derive(Debug, PartialEq, Clone)]
pub enum ReadlineEvent {
    /// The user pressed `Enter` on a valid line.
    Line(String),

    /// `Ctrl+C` or `Ctrl+D` under a policy that hands them back to the caller.
    Cancelled(CancelReason),

    /// `Ctrl+C` or `Ctrl+D` under a policy that ends the session. Raw mode has already
    /// been restored, the caller runs its exit action.
    Terminated,
}

impl Readline {
    pub fn new(
        prompt: impl Into<String>,
        policy: ControlSignalPolicy,
        input_device: InputDevice,
        output_device: OutputDevice,
    ) -> Self {
        Self {
            input_device,
            output_device,
            line_state: LineState::new(prompt, policy),
        }
    }

    /// Block until a line is accepted, cancelled, or the session is terminated.
    ///
    /// # Errors
    ///
    /// Returns [`ReadlineError::RawMode`] if raw mode can't be enabled, and
    /// [`ReadlineError::IO`] if reading events or writing to the terminal fails.
    pub fn read_line(&mut self) -> Result<ReadlineEvent, ReadlineError> {
        // Held until this function returns, on every path.
        let _raw_mode_guard =
            RawModeGuard::acquire(self.output_device.is_mock).map_err(ReadlineError::RawMode)?;

        self.line_state.reset();
        self.line_state
            .render_and_flush(lock_output_device_as_mut!(self.output_device))?;

        loop {
            let raw_event = self
                .input_device
                .next_raw_event()?
                .unwrap_or(RawEvent::EndOfInput);

            let edit_result = self
                .line_state
                .apply_event_and_render(raw_event, lock_output_device_as_mut!(self.output_device))?;

            match edit_result {
                EditResult::Continue { .. } => {}
                EditResult::Accepted(line) => return Ok(ReadlineEvent::Line(line)),
                EditResult::Cancelled(reason) => return Ok(ReadlineEvent::Cancelled(reason)),
                EditResult::Terminated => return Ok(ReadlineEvent::Terminated),
            }
        }
    }

    /// Read a secret with a masked [`LineState::new_password()`] prompt, then put the
    /// regular line state back.
    ///
    /// # Errors
    ///
    /// Same as [`Readline::read_line()`].
    pub fn read_password(&mut self, prompt: &str) -> Result<ReadlineEvent, ReadlineError> {
        let saved_line_state =
            std::mem::replace(&mut self.line_state, LineState::new_password(prompt));
        let result = self.read_line();
        self.line_state = saved_line_state;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputDeviceExt, OutputDeviceExt, StdoutMock, ctrl_key_press, key_press,
                typed, typed_line};
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    fn new_readline(
        events: Vec<crate::CrosstermEventResult>,
        policy: ControlSignalPolicy,
    ) -> (Readline, StdoutMock) {
        let (output_device, stdout_mock) = OutputDevice::new_mock();
        let readline = Readline::new("> ", policy, InputDevice::new_mock(events), output_device);
        (readline, stdout_mock)
    }

    #[test]
    fn test_read_line() {
        let (mut readline, stdout_mock) =
            new_readline(typed_line("hi Ada"), ControlSignalPolicy::default());

        let it = readline.read_line().unwrap();

        assert_eq!(it, ReadlineEvent::Line("hi Ada".into()));
        assert!(
            stdout_mock
                .get_copy_of_buffer_as_string_strip_ansi()
                .ends_with("> hi Ada\n")
        );
    }

    #[test]
    fn test_read_several_lines() {
        let mut events = typed_line("one");
        events.extend(typed_line("two"));
        let (mut readline, _) = new_readline(events, ControlSignalPolicy::default());

        assert_eq!(readline.read_line().unwrap(), ReadlineEvent::Line("one".into()));
        assert_eq!(readline.read_line().unwrap(), ReadlineEvent::Line("two".into()));
        assert_eq!(readline.read_line().unwrap(), ReadlineEvent::Terminated);
    }

    #[test]
    fn test_invalid_line_is_not_accepted_until_fixed() {
        let mut events = typed_line("hi  Ada");
        events.push(key_press(KeyCode::Left));
        events.push(key_press(KeyCode::Left));
        events.push(key_press(KeyCode::Left));
        events.push(key_press(KeyCode::Backspace));
        events.push(key_press(KeyCode::Enter));
        let (mut readline, stdout_mock) = new_readline(events, ControlSignalPolicy::default());

        let it = readline.read_line().unwrap();

        assert_eq!(it, ReadlineEvent::Line("hi Ada".into()));
        assert!(stdout_mock.get_copy_of_buffer_as_string().contains(crate::BELL));
    }

    #[test]
    fn test_edited_line_is_delivered() {
        let mut events = typed("ac");
        events.push(key_press(KeyCode::Left));
        events.extend(typed_line("b"));
        let (mut readline, _) = new_readline(events, ControlSignalPolicy::default());

        assert_eq!(readline.read_line().unwrap(), ReadlineEvent::Line("abc".into()));
    }

    #[test]
    fn test_exhausted_input_is_end_of_input() {
        let (mut readline, _) = new_readline(typed("abc"), ControlSignalPolicy::cancel_only());

        assert_eq!(
            readline.read_line().unwrap(),
            ReadlineEvent::Cancelled(CancelReason::EndOfInput)
        );
    }

    #[test]
    fn test_interrupt_restarts_then_accepts() {
        let mut events = typed("discard me");
        events.push(ctrl_key_press('c'));
        events.extend(typed_line("keep"));
        let policy = ControlSignalPolicy {
            exit_on_interrupt: false,
            ..Default::default()
        };
        let (mut readline, _) = new_readline(events, policy);

        assert_eq!(readline.read_line().unwrap(), ReadlineEvent::Line("keep".into()));
    }

    #[test]
    fn test_interrupt_terminates() {
        let mut events = typed("abc");
        events.push(ctrl_key_press('c'));
        let (mut readline, _) = new_readline(events, ControlSignalPolicy::default());

        assert_eq!(readline.read_line().unwrap(), ReadlineEvent::Terminated);
    }

    #[test]
    fn test_read_password_restores_line_state() {
        let mut events = typed_line("s3cret");
        events.extend(typed_line("next"));
        let (mut readline, stdout_mock) = new_readline(events, ControlSignalPolicy::default());

        assert_eq!(
            readline.read_password("Password: ").unwrap(),
            ReadlineEvent::Line("s3cret".into())
        );
        assert!(!stdout_mock.get_copy_of_buffer_as_string().contains("s3cret"));
        assert_eq!(readline.line_state.prompt, "> ");

        assert_eq!(readline.read_line().unwrap(), ReadlineEvent::Line("next".into()));
    }

    #[test]
    fn test_io_error_is_propagated() {
        let (mut readline, _) = new_readline(
            vec![Err(io::Error::other("boom"))],
            ControlSignalPolicy::default(),
        );

        assert!(matches!(readline.read_line(), Err(ReadlineError::IO(_))));
    }
}
