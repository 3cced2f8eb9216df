// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{ControlSignalPolicy, DEFAULT_PROMPT, ErrorPolicy, InterruptBehavior, ReplError};
use std::{fmt, sync::Arc};

pub type AtExitFn = Arc<dyn Fn() + Send + Sync>;

/// Immutable once built. Use [`ReplConfig::builder()`] to make one, or
/// [`ReplConfig::default()`] for the defaults below.
///
/// | Setting                  | Default                                     |
/// |--------------------------|---------------------------------------------|
/// | `prompt`                 | [`DEFAULT_PROMPT`]                          |
/// | `exit_on_end_of_input`   | `true`                                      |
/// | `exit_on_interrupt`      | `true`                                      |
/// | `interrupt_behavior`     | [`InterruptBehavior::RestartLine`]          |
/// | `on_error`               | [`ErrorPolicy::Strict`]                     |
/// | `at_exit`                | `std::process::exit(0)`                     |
/// | `password`               | none, so no command is gated                |
/// | `authorize_at_start`     | `false`, ask only when a gated command runs |
/// | `banner`                 | none                                        |
#[derive(Clone)]
pub struct ReplConfig {
    prompt: String,
    exit_on_end_of_input: bool,
    exit_on_interrupt: bool,
    interrupt_behavior: InterruptBehavior,
    on_error: ErrorPolicy,
    at_exit: AtExitFn,
    password: Option<String>,
    authorize_at_start: bool,
    banner: Option<String>,
}

impl fmt::Debug for ReplConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplConfig")
            .field("prompt", &self.prompt)
            .field("exit_on_end_of_input", &self.exit_on_end_of_input)
            .field("exit_on_interrupt", &self.exit_on_interrupt)
            .field("interrupt_behavior", &self.interrupt_behavior)
            .field("on_error", &self.on_error)
            .field("has_password", &self.password.is_some())
            .field("authorize_at_start", &self.authorize_at_start)
            .field("banner", &self.banner)
            .finish_non_exhaustive()
    }
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_owned(),
            exit_on_end_of_input: true,
            exit_on_interrupt: true,
            interrupt_behavior: InterruptBehavior::default(),
            on_error: ErrorPolicy::default(),
            at_exit: Arc::new(|| std::process::exit(0)),
            password: None,
            authorize_at_start: false,
            banner: None,
        }
    }
}

impl ReplConfig {
    #[must_use]
    pub fn builder() -> ReplConfigBuilder { ReplConfigBuilder::default() }

    #[must_use]
    pub fn prompt(&self) -> &str { &self.prompt }

    #[must_use]
    pub fn on_error(&self) -> &ErrorPolicy { &self.on_error }

    #[must_use]
    pub fn password(&self) -> Option<&str> { self.password.as_deref() }

    /// Ask for the password before the first line, instead of when a gated command
    /// runs. Has no effect without a password.
    #[must_use]
    pub fn authorize_at_start(&self) -> bool { self.authorize_at_start }

    /// Printed on a cleared screen when the session starts.
    #[must_use]
    pub fn banner(&self) -> Option<&str> { self.banner.as_deref() }

    #[must_use]
    pub fn control_signal_policy(&self) -> ControlSignalPolicy {
        ControlSignalPolicy {
            exit_on_interrupt: self.exit_on_interrupt,
            exit_on_end_of_input: self.exit_on_end_of_input,
            interrupt_behavior: self.interrupt_behavior,
        }
    }

    pub fn run_at_exit(&self) {
        tracing::debug!(message = "Exit action -> run");
        (self.at_exit)();
    }
}

/// Builds a validated [`ReplConfig`].
///
/// ```
/// use r3bl_repl::{ErrorPolicy, CommandOutput, ReplConfig};
///
/// let config = ReplConfig::builder()
///     .prompt("$ ")
///     .exit_on_interrupt(false)
///     .on_error(ErrorPolicy::lenient(|error| Ok(CommandOutput::Print(error.to_string()))))
///     .at_exit(|| println!("Goodbye!"))
///     .build()
///     .unwrap();
/// assert_eq!(config.prompt(), "$ ");
/// ```
#[derive(Debug, Default)]
pub struct ReplConfigBuilder {
    config: ReplConfig,
}

impl ReplConfigBuilder {
    #[must_use]
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn exit_on_end_of_input(mut self, exit_on_end_of_input: bool) -> Self {
        self.config.exit_on_end_of_input = exit_on_end_of_input;
        self
    }

    #[must_use]
    pub fn exit_on_interrupt(mut self, exit_on_interrupt: bool) -> Self {
        self.config.exit_on_interrupt = exit_on_interrupt;
        self
    }

    #[must_use]
    pub fn interrupt_behavior(mut self, interrupt_behavior: InterruptBehavior) -> Self {
        self.config.interrupt_behavior = interrupt_behavior;
        self
    }

    #[must_use]
    pub fn on_error(mut self, on_error: ErrorPolicy) -> Self {
        self.config.on_error = on_error;
        self
    }

    #[must_use]
    pub fn at_exit(mut self, at_exit: impl Fn() + Send + Sync + 'static) -> Self {
        self.config.at_exit = Arc::new(at_exit);
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn authorize_at_start(mut self, authorize_at_start: bool) -> Self {
        self.config.authorize_at_start = authorize_at_start;
        self
    }

    #[must_use]
    pub fn banner(mut self, banner: impl Into<String>) -> Self {
        self.config.banner = Some(banner.into());
        self
    }

    /// # Errors
    ///
    /// Returns [`ReplError::InvalidConfig`] if the prompt contains a control character
    /// (it has to fit on one line, and its width has to be measurable), or the password
    /// is empty.
    pub fn build(self) -> Result<ReplConfig, ReplError> {
        let config = self.config;

        if config.prompt.chars().any(char::is_control) {
            return Err(ReplError::InvalidConfig(format!(
                "prompt {:?} must not contain control characters",
                config.prompt
            )));
        }

        if config.password.as_deref() == Some("") {
            return Err(ReplError::InvalidConfig(
                "password must not be empty".to_owned(),
            ));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};
    use test_case::test_case;

    #[test]
    fn test_defaults() {
        let config = ReplConfig::builder().build().unwrap();

        assert_eq!(config.prompt(), DEFAULT_PROMPT);
        assert_eq!(config.password(), None);
        assert!(!config.authorize_at_start());
        assert_eq!(config.banner(), None);
        assert!(matches!(config.on_error(), ErrorPolicy::Strict));
        assert_eq!(config.control_signal_policy(), ControlSignalPolicy::default());
    }

    #[test]
    fn test_builder_sets_everything() {
        let config = ReplConfig::builder()
            .prompt("$ ")
            .exit_on_end_of_input(false)
            .exit_on_interrupt(false)
            .interrupt_behavior(InterruptBehavior::Signal)
            .password("hunter2")
            .authorize_at_start(true)
            .banner("Welcome")
            .build()
            .unwrap();

        assert_eq!(config.prompt(), "$ ");
        assert_eq!(config.password(), Some("hunter2"));
        assert!(config.authorize_at_start());
        assert_eq!(config.banner(), Some("Welcome"));
        assert_eq!(
            config.control_signal_policy(),
            ControlSignalPolicy::cancel_only()
        );
    }

    #[test]
    fn test_at_exit_is_called() {
        let was_called = Arc::new(AtomicBool::new(false));
        let config = {
            let was_called = was_called.clone();
            ReplConfig::builder()
                .at_exit(move || was_called.store(true, Ordering::SeqCst))
                .build()
                .unwrap()
        };

        config.run_at_exit();

        assert!(was_called.load(Ordering::SeqCst));
    }

    #[test_case("line\nbreak" ; "newline")]
    #[test_case("\x1b[31m> " ; "escape sequence")]
    #[test_case("tab\t" ; "tab")]
    fn test_invalid_prompt(prompt: &str) {
        let result = ReplConfig::builder().prompt(prompt).build();
        assert!(matches!(result, Err(ReplError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_password() {
        let result = ReplConfig::builder().password("").build();
        assert!(matches!(result, Err(ReplError::InvalidConfig(_))));
    }

    #[test]
    fn test_debug_hides_password() {
        let config = ReplConfig::builder().password("hunter2").build().unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("has_password: true"));
    }
}
