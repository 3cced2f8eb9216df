// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Drive whole sessions through the public API, with mock devices standing in for the
//! terminal.

use crossterm::event::KeyCode;
use pretty_assertions::assert_eq;
use r3bl_repl::{BELL, Command, CommandOutput, CommandRegistry, DECORATION_END,
                DECORATION_START, ErrorPolicy, InputDevice, InputDeviceExt, OutputDevice,
                OutputDeviceExt, Repl, ReplConfig, ReplConfigBuilder, ReplError, ReplExit,
                StdoutMock, builtins, key_press, typed, typed_line};
use std::sync::{Arc, Mutex};

fn echo_command() -> Command {
    Command::new("echo", |args| {
        Ok(CommandOutput::Print(format!(
            "[{}]",
            args.get("text").unwrap_or_default()
        )))
    })
    .optional_param("text")
    .description("Prints `text` in brackets.")
}

fn run_session(
    events: Vec<r3bl_repl::CrosstermEventResult>,
    builder: ReplConfigBuilder,
) -> (miette::Result<ReplExit>, StdoutMock, Arc<Mutex<Vec<&'static str>>>) {
    let exit_log = Arc::new(Mutex::new(vec![]));
    let config = {
        let exit_log = exit_log.clone();
        builder
            .at_exit(move || exit_log.lock().unwrap().push("at_exit"))
            .build()
            .unwrap()
    };

    let mut registry = CommandRegistry::new();
    builtins::register_builtins(&mut registry);
    registry.register(builtins::hi_command());
    registry.register(echo_command());

    let (output_device, stdout_mock) = OutputDevice::new_mock();
    let mut repl = Repl::new_with_devices(
        config,
        registry,
        InputDevice::new_mock(events),
        output_device,
    );

    (repl.run(), stdout_mock, exit_log)
}

#[test]
fn test_double_space_rings_bell_until_fixed() {
    // `echo  x` has a double space. Enter rings the bell, then the extra space is
    // removed and Enter accepts the line.
    let mut events = typed_line("echo  x");
    events.push(key_press(KeyCode::Left));
    events.push(key_press(KeyCode::Backspace));
    events.push(key_press(KeyCode::Enter));

    let (result, stdout_mock, exit_log) = run_session(events, ReplConfig::builder());

    assert_eq!(result.unwrap(), ReplExit::Normal);
    assert_eq!(*exit_log.lock().unwrap(), vec!["at_exit"]);

    let raw_output = stdout_mock.get_copy_of_buffer_as_string();
    assert!(raw_output.contains(&format!("echo{DECORATION_START}  {DECORATION_END}x")));
    assert_eq!(raw_output.matches(BELL).count(), 1);

    let output = stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
    assert_eq!(output.matches("[x]\n").count(), 1);
}

#[test]
fn test_escapes_are_decoded_before_dispatch() {
    let (result, stdout_mock, _) =
        run_session(typed_line("echo text:\\x41\\x42"), ReplConfig::builder());

    assert_eq!(result.unwrap(), ReplExit::Normal);
    assert!(
        stdout_mock
            .get_copy_of_buffer_as_string_strip_ansi()
            .contains("[AB]\n")
    );
}

#[test]
fn test_help_lists_every_command() {
    let (result, stdout_mock, _) = run_session(typed_line("help"), ReplConfig::builder());

    assert_eq!(result.unwrap(), ReplExit::Normal);
    let output = stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
    for signature in ["echo(text?)", "exit(status?)", "help(command?)", "hi(name?)"] {
        assert!(output.contains(signature), "missing {signature} in {output:?}");
    }
}

#[test]
fn test_unknown_command_strict_vs_lenient() {
    let (strict, _, exit_log) = run_session(typed_line("bogus"), ReplConfig::builder());

    let report = strict.unwrap_err();
    assert!(matches!(
        report.downcast_ref::<ReplError>(),
        Some(ReplError::CommandNotFound { name }) if name == "bogus"
    ));
    assert!(exit_log.lock().unwrap().is_empty());

    let (lenient, stdout_mock, _) = run_session(
        typed_line("bogus"),
        ReplConfig::builder().on_error(ErrorPolicy::lenient(|_| {
            Ok(CommandOutput::Print("try `help`".into()))
        })),
    );

    assert_eq!(lenient.unwrap(), ReplExit::Normal);
    assert!(
        stdout_mock
            .get_copy_of_buffer_as_string_strip_ansi()
            .contains("try `help`\n")
    );
}

#[test]
fn test_argument_mismatch_is_reported() {
    let (result, _, _) = run_session(typed_line("hi Ada Lovelace"), ReplConfig::builder());

    let report = result.unwrap_err();
    assert!(matches!(
        report.downcast_ref::<ReplError>(),
        Some(ReplError::ArgumentMismatch { name, .. }) if name == "hi"
    ));
}

#[test]
fn test_interrupt_discards_the_line() {
    let mut events = typed("exit 9");
    events.push(r3bl_repl::ctrl_key_press('c'));
    events.extend(typed_line("hi"));

    let (result, stdout_mock, _) =
        run_session(events, ReplConfig::builder().exit_on_interrupt(false));

    assert_eq!(result.unwrap(), ReplExit::Normal);
    assert!(
        stdout_mock
            .get_copy_of_buffer_as_string_strip_ansi()
            .contains("Hi.\n")
    );
}

#[test]
fn test_exit_code_is_returned_to_the_caller() {
    let (result, _, exit_log) = run_session(typed_line("exit 7"), ReplConfig::builder());

    assert_eq!(result.unwrap(), ReplExit::Code(7));
    assert!(exit_log.lock().unwrap().is_empty());
}

#[test]
fn test_exit_code_too_big_for_i32_still_exits() {
    let (result, _, exit_log) =
        run_session(typed_line("exit 4294967296"), ReplConfig::builder());

    assert_eq!(result.unwrap(), ReplExit::Code(0));
    assert!(exit_log.lock().unwrap().is_empty());
}
