// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CancelReason, CommandOutput, CommandRegistry, CommonResult, ExitStatus,
            InputDevice, OutputDevice, PASSWORD_PROMPT, Readline, ReadlineEvent,
            ReplConfig, ReplError, TTYResult, dispatch, is_fully_interactive_terminal,
            lock_output_device_as_mut, tokenize};
use crossterm::{QueueableCommand,
                cursor::MoveTo,
                style::Print,
                terminal::{Clear, ClearType}};

/// Printed after a wrong password, before asking again.
pub const INCORRECT_PASSWORD_MSG: &str = "Incorrect!";

/// How a session ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplExit {
    /// The exit action ran (`exit`, or `Ctrl+C` / `Ctrl+D` under an exiting policy).
    Normal,
    /// `exit <digits>`. The exit action did not run, the caller is expected to end the
    /// process with this code.
    Code(i32),
}

#[derive(Debug)]
enum AuthOutcome {
    Authorized,
    Cancelled(CancelReason),
}

/// Reads lines, dispatches them to the [`CommandRegistry`], and prints what the commands
/// return, until the session ends.
#[allow(missing_debug_implementations)]
pub struct Repl {
    pub config: ReplConfig,
    pub registry: CommandRegistry,
    pub readline: Readline,
    /// Set once the password was entered correctly. Lasts for the rest of the session.
    pub is_authorized: bool,
}

impl Repl {
    /// Attach to the real terminal.
    ///
    /// # Errors
    ///
    /// Returns [`ReplError::TerminalUnsupported`] if stdin or stdout is not a TTY.
    pub fn try_new(config: ReplConfig, registry: CommandRegistry) -> CommonResult<Self> {
        if let TTYResult::IsNotInteractive = is_fully_interactive_terminal() {
            return Err(ReplError::TerminalUnsupported.into());
        }
        Ok(Self::new_with_devices(
            config,
            registry,
            InputDevice::new_event_reader(),
            OutputDevice::new_stdout(),
        ))
    }

    /// Use any pair of devices, eg the mocks in [`crate::test_fixtures`].
    #[must_use]
    pub fn new_with_devices(
        config: ReplConfig,
        registry: CommandRegistry,
        input_device: InputDevice,
        output_device: OutputDevice,
    ) -> Self {
        let readline = Readline::new(
            config.prompt(),
            config.control_signal_policy(),
            input_device,
            output_device,
        );
        Self {
            config,
            registry,
            readline,
            is_authorized: false,
        }
    }

    /// Authorize the session with a secret supplied up front, eg from a command line
    /// flag. Returns `true` if the session is now authorized. Without a configured
    /// password there is nothing to check, and this returns `false`.
    pub fn authorize_with(&mut self, secret: &str) -> bool {
        if self.config.password() == Some(secret) {
            self.is_authorized = true;
        }
        self.is_authorized
    }

    /// Run the session until it ends.
    ///
    /// The banner (if any) is printed on a cleared screen first. Then, with
    /// [`ReplConfig::authorize_at_start()`], the password is asked for until it is
    /// correct.
    ///
    /// # Errors
    ///
    /// - [`ReplError::Interrupted`] or [`ReplError::EndOfInput`] when a control signal
    ///   doesn't terminate the session, including one that cancels the password prompt
    ///   at the start.
    /// - Dispatch errors under [`crate::ErrorPolicy::Strict`], and handler failures.
    /// - [`ReplError::TerminalUnsupported`] or [`ReplError::IO`] from the terminal.
    pub fn run(&mut self) -> CommonResult<ReplExit> {
        tracing::debug!(message = "Session -> start", config = ?self.config);

        self.print_banner()?;

        if self.config.authorize_at_start() {
            match self.authorize()? {
                AuthOutcome::Authorized => {}
                AuthOutcome::Cancelled(CancelReason::Interrupted) => {
                    return Err(ReplError::Interrupted.into());
                }
                AuthOutcome::Cancelled(CancelReason::EndOfInput) => {
                    return Err(ReplError::EndOfInput.into());
                }
            }
        }

        loop {
            let readline_event = self.readline.read_line().map_err(ReplError::from)?;

            match readline_event {
                ReadlineEvent::Line(line) => {
                    if let Some(repl_exit) = self.execute_line(&line)? {
                        return Ok(repl_exit);
                    }
                }
                ReadlineEvent::Cancelled(CancelReason::Interrupted) => {
                    return Err(ReplError::Interrupted.into());
                }
                ReadlineEvent::Cancelled(CancelReason::EndOfInput) => {
                    return Err(ReplError::EndOfInput.into());
                }
                ReadlineEvent::Terminated => {
                    self.config.run_at_exit();
                    return Ok(ReplExit::Normal);
                }
            }
        }
    }

    /// Tokenize, authorize, dispatch, then act on one accepted line. Blank lines do
    /// nothing. Returns `Some` when the line ended the session.
    ///
    /// # Errors
    ///
    /// Same as [`Repl::run()`], minus the control signal errors.
    pub fn execute_line(&mut self, line: &str) -> CommonResult<Option<ReplExit>> {
        let Some(invocation) = tokenize(line) else {
            return Ok(None);
        };

        if !self.ensure_authorized(&invocation.name)? {
            return Ok(None);
        }

        let output = dispatch(&invocation, &self.registry, self.config.on_error())?;
        self.handle_output(output)
    }

    fn handle_output(&mut self, output: CommandOutput) -> CommonResult<Option<ReplExit>> {
        match output {
            CommandOutput::Silent => Ok(None),
            CommandOutput::Print(text) => {
                self.println(&text)?;
                Ok(None)
            }
            CommandOutput::Exit(ExitStatus::Normal) => {
                self.config.run_at_exit();
                Ok(Some(ReplExit::Normal))
            }
            CommandOutput::Exit(ExitStatus::Code(code)) => {
                tracing::debug!(message = "Session -> exit with code", code);
                Ok(Some(ReplExit::Code(code)))
            }
            CommandOutput::Exit(ExitStatus::Message(message)) => {
                self.println(&message)?;
                Ok(None)
            }
        }
    }

    /// Returns `false` if the password prompt was cancelled. Commands that don't require
    /// authorization pass.
    fn ensure_authorized(&mut self, command_name: &str) -> CommonResult<bool> {
        let requires_auth = self
            .registry
            .get(command_name)
            .is_some_and(|command| command.requires_auth);

        if !requires_auth {
            return Ok(true);
        }

        tracing::debug!(message = "Password -> required", command = command_name);
        Ok(matches!(self.authorize()?, AuthOutcome::Authorized))
    }

    /// Ask for the password until it is correct. Passes right away when the session is
    /// already authorized, or no password is configured.
    fn authorize(&mut self) -> CommonResult<AuthOutcome> {
        let password = match self.config.password() {
            Some(password) if !self.is_authorized => password.to_owned(),
            _ => return Ok(AuthOutcome::Authorized),
        };

        loop {
            match self
                .readline
                .read_password(PASSWORD_PROMPT)
                .map_err(ReplError::from)?
            {
                ReadlineEvent::Line(attempt) if attempt == password => {
                    tracing::debug!(message = "Password -> accepted");
                    self.is_authorized = true;
                    return Ok(AuthOutcome::Authorized);
                }
                ReadlineEvent::Line(_) => {
                    tracing::warn!(message = "Password -> rejected");
                    self.println(INCORRECT_PASSWORD_MSG)?;
                }
                ReadlineEvent::Cancelled(reason) => return Ok(AuthOutcome::Cancelled(reason)),
                // The password prompt never terminates, see `LineState::new_password()`.
                ReadlineEvent::Terminated => {
                    return Ok(AuthOutcome::Cancelled(CancelReason::EndOfInput));
                }
            }
        }
    }

    fn print_banner(&self) -> CommonResult<()> {
        let Some(banner) = self.config.banner() else {
            return Ok(());
        };
        let term = lock_output_device_as_mut!(self.readline.output_device);
        term.queue(Clear(ClearType::All))
            .and_then(|it| it.queue(MoveTo(0, 0)))
            .and_then(|it| it.queue(Print(banner)))
            .and_then(|it| it.queue(Print("\n")))
            .and_then(|it| it.flush())
            .map_err(ReplError::from)?;
        Ok(())
    }

    fn println(&self, text: &str) -> CommonResult<()> {
        let term = lock_output_device_as_mut!(self.readline.output_device);
        writeln!(term, "{text}")
            .and_then(|()| term.flush())
            .map_err(ReplError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Command, ErrorPolicy, InputDeviceExt, OutputDeviceExt, StdoutMock,
                builtins, ctrl_key_press, typed, typed_line};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc,
                    atomic::{AtomicUsize, Ordering}};

    struct TestRepl {
        repl: Repl,
        stdout_mock: StdoutMock,
        exit_count: Arc<AtomicUsize>,
    }

    fn new_test_repl(
        lines: &[&str],
        builder: crate::ReplConfigBuilder,
    ) -> TestRepl {
        let exit_count = Arc::new(AtomicUsize::new(0));
        let config = {
            let exit_count = exit_count.clone();
            builder
                .at_exit(move || {
                    exit_count.fetch_add(1, Ordering::SeqCst);
                })
                .build()
                .unwrap()
        };

        let mut registry = CommandRegistry::new();
        builtins::register_builtins(&mut registry);
        registry.register(builtins::hi_command());
        registry.register(
            Command::new("secret", |_| Ok(CommandOutput::Print("42".into())))
                .requires_auth(true),
        );

        let events = lines.iter().flat_map(|line| typed_line(line)).collect();
        let (output_device, stdout_mock) = OutputDevice::new_mock();
        let repl = Repl::new_with_devices(
            config,
            registry,
            InputDevice::new_mock(events),
            output_device,
        );

        TestRepl {
            repl,
            stdout_mock,
            exit_count,
        }
    }

    #[test]
    fn test_hi_then_end_of_input() {
        let mut it = new_test_repl(&["hi name:Ada"], ReplConfig::builder());

        let repl_exit = it.repl.run().unwrap();

        assert_eq!(repl_exit, ReplExit::Normal);
        assert_eq!(it.exit_count.load(Ordering::SeqCst), 1);
        assert!(
            it.stdout_mock
                .get_copy_of_buffer_as_string_strip_ansi()
                .contains("Hello Ada.\n")
        );
    }

    #[test]
    fn test_exit_runs_at_exit_once() {
        let mut it = new_test_repl(&["exit", "hi"], ReplConfig::builder());

        assert_eq!(it.repl.run().unwrap(), ReplExit::Normal);
        assert_eq!(it.exit_count.load(Ordering::SeqCst), 1);
        assert!(
            !it.stdout_mock
                .get_copy_of_buffer_as_string_strip_ansi()
                .contains("Hi.")
        );
    }

    #[test]
    fn test_exit_with_code_skips_at_exit() {
        let mut it = new_test_repl(&["exit 3"], ReplConfig::builder());

        assert_eq!(it.repl.run().unwrap(), ReplExit::Code(3));
        assert_eq!(it.exit_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_exit_with_huge_code_still_exits() {
        let mut it = new_test_repl(&["exit 99999999999", "hi"], ReplConfig::builder());

        assert_eq!(it.repl.run().unwrap(), ReplExit::Code(255));
        assert_eq!(it.exit_count.load(Ordering::SeqCst), 0);
        assert!(
            !it.stdout_mock
                .get_copy_of_buffer_as_string_strip_ansi()
                .contains("Hi.")
        );
    }

    #[test]
    fn test_exit_with_message_keeps_going() {
        let mut it = new_test_repl(&["exit later", "hi"], ReplConfig::builder());

        assert_eq!(it.repl.run().unwrap(), ReplExit::Normal);
        let output = it.stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
        assert!(output.contains("later\n"));
        assert!(output.contains("Hi.\n"));
    }

    #[test]
    fn test_strict_unknown_command() {
        let mut it = new_test_repl(&["greet"], ReplConfig::builder());

        let report = it.repl.run().unwrap_err();

        assert!(matches!(
            report.downcast_ref::<ReplError>(),
            Some(ReplError::CommandNotFound { name }) if name == "greet"
        ));
        assert_eq!(it.exit_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_lenient_unknown_command() {
        let mut it = new_test_repl(
            &["greet", "hi"],
            ReplConfig::builder().on_error(ErrorPolicy::lenient(|error| {
                Ok(CommandOutput::Print(format!("Oops: {error}")))
            })),
        );

        assert_eq!(it.repl.run().unwrap(), ReplExit::Normal);
        let output = it.stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
        assert!(output.contains("Oops: Command `greet` not found\n"));
        assert!(output.contains("Hi.\n"));
    }

    #[test]
    fn test_blank_line_does_nothing() {
        let mut it = new_test_repl(&["", "hi"], ReplConfig::builder());

        assert_eq!(it.repl.run().unwrap(), ReplExit::Normal);
    }

    #[test]
    fn test_end_of_input_as_error() {
        let mut it = new_test_repl(&[], ReplConfig::builder().exit_on_end_of_input(false));

        let report = it.repl.run().unwrap_err();

        assert!(matches!(
            report.downcast_ref::<ReplError>(),
            Some(ReplError::EndOfInput)
        ));
        assert_eq!(it.exit_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_interrupt_as_error() {
        let mut it = new_test_repl(
            &[],
            ReplConfig::builder()
                .exit_on_interrupt(false)
                .interrupt_behavior(crate::InterruptBehavior::Signal),
        );
        it.repl.readline.input_device = InputDevice::new_mock(vec![ctrl_key_press('c')]);

        let report = it.repl.run().unwrap_err();

        assert!(matches!(
            report.downcast_ref::<ReplError>(),
            Some(ReplError::Interrupted)
        ));
    }

    #[test]
    fn test_secret_without_password_is_not_gated() {
        let mut it = new_test_repl(&["secret"], ReplConfig::builder());

        it.repl.run().unwrap();

        assert!(
            it.stdout_mock
                .get_copy_of_buffer_as_string_strip_ansi()
                .contains("42\n")
        );
    }

    #[test]
    fn test_password_gate() {
        let mut it = new_test_repl(
            &["hi", "secret", "wrong", "hunter2", "secret"],
            ReplConfig::builder().password("hunter2"),
        );

        assert_eq!(it.repl.run().unwrap(), ReplExit::Normal);
        assert!(it.repl.is_authorized);

        let output = it.stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
        assert_eq!(output.matches(INCORRECT_PASSWORD_MSG).count(), 1);
        assert_eq!(output.matches("42\n").count(), 2);
        assert!(!output.contains("hunter2"));
    }

    #[test]
    fn test_password_prompt_cancelled() {
        let mut it = new_test_repl(&["secret"], ReplConfig::builder().password("hunter2"));
        let mut events = typed_line("secret");
        events.extend(typed("hunt"));
        events.push(ctrl_key_press('c'));
        it.repl.readline.input_device = InputDevice::new_mock(events);

        assert_eq!(it.repl.run().unwrap(), ReplExit::Normal);
        assert!(!it.repl.is_authorized);
        assert!(
            !it.stdout_mock
                .get_copy_of_buffer_as_string_strip_ansi()
                .contains("42")
        );
    }

    #[test]
    fn test_authorize_at_start() {
        let mut it = new_test_repl(
            &["nope", "hunter2", "secret"],
            ReplConfig::builder()
                .password("hunter2")
                .authorize_at_start(true),
        );

        assert_eq!(it.repl.run().unwrap(), ReplExit::Normal);
        assert!(it.repl.is_authorized);

        let output = it.stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
        assert!(output.starts_with(PASSWORD_PROMPT));
        assert_eq!(output.matches(INCORRECT_PASSWORD_MSG).count(), 1);
        assert!(output.contains("42\n"));
    }

    #[test]
    fn test_authorize_at_start_cancelled() {
        let mut it = new_test_repl(
            &[],
            ReplConfig::builder()
                .password("hunter2")
                .authorize_at_start(true),
        );
        it.repl.readline.input_device = InputDevice::new_mock(vec![ctrl_key_press('c')]);

        let report = it.repl.run().unwrap_err();

        assert!(matches!(
            report.downcast_ref::<ReplError>(),
            Some(ReplError::Interrupted)
        ));
        assert!(!it.repl.is_authorized);
        assert_eq!(it.exit_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_authorize_with_supplied_secret() {
        let mut it = new_test_repl(
            &["secret"],
            ReplConfig::builder()
                .password("hunter2")
                .authorize_at_start(true),
        );

        assert!(!it.repl.authorize_with("wrong"));
        assert!(it.repl.authorize_with("hunter2"));
        assert_eq!(it.repl.run().unwrap(), ReplExit::Normal);

        let output = it.stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
        assert!(!output.contains(PASSWORD_PROMPT));
        assert!(output.contains("42\n"));
    }

    #[test]
    fn test_authorize_with_and_no_password() {
        let mut it = new_test_repl(&[], ReplConfig::builder());
        assert!(!it.repl.authorize_with("anything"));
    }

    #[test]
    fn test_banner_is_printed_before_the_first_prompt() {
        let mut it = new_test_repl(&["hi"], ReplConfig::builder().banner("Ready!"));

        it.repl.run().unwrap();

        let raw_output = it.stdout_mock.get_copy_of_buffer_as_string();
        assert!(raw_output.starts_with("\x1b[2J\x1b[1;1HReady!\n"));
        assert!(
            it.stdout_mock
                .get_copy_of_buffer_as_string_strip_ansi()
                .starts_with("Ready!\n> ")
        );
    }

    #[test]
    fn test_no_banner_writes_nothing_up_front() {
        let mut it = new_test_repl(&[], ReplConfig::builder());

        it.repl.run().unwrap();

        assert!(
            it.stdout_mock
                .get_copy_of_buffer_as_string_strip_ansi()
                .starts_with("> ")
        );
    }
}
