// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Commands that ship with the crate. [`register_builtins()`] adds `help` and `exit`,
//! `hi` is a sample to copy from.

use crate::{Command, CommandArgs, CommandOutput, CommandRegistry, CommandResult,
            ExitStatus, ReplError};

pub fn register_builtins(registry: &mut CommandRegistry) {
    registry.register(help_command());
    registry.register(exit_command());
}

#[must_use]
pub fn help_command() -> Command {
    Command::new("help", help)
        .optional_param("command")
        .description("Prints every command and how to use them.\nPass a command name to print only that one.")
}

fn help(args: &CommandArgs<'_>) -> CommandResult {
    let registry = args.registry;

    let text = match args.get("command") {
        Some(name) => {
            let command = registry
                .get(name)
                .ok_or_else(|| ReplError::CommandNotFound { name: name.into() })?;
            format_help_entry(command)
        }
        None => registry
            .iter()
            .map(format_help_entry)
            .collect::<Vec<_>>()
            .join("\n"),
    };

    Ok(CommandOutput::Print(text))
}

/// Signature, then the description indented by a tab.
fn format_help_entry(command: &Command) -> String {
    let mut it = format!("{}:\n", command.signature());
    for line in command.description.lines() {
        it.push('\t');
        it.push_str(line);
        it.push('\n');
    }
    it
}

#[must_use]
pub fn exit_command() -> Command {
    Command::new("exit", |args| {
        let status = args.get("status").unwrap_or("0");
        Ok(CommandOutput::Exit(ExitStatus::parse(status)))
    })
    .optional_param("status")
    .description(
        "Exits the REPL.\n`exit` or `exit 0` runs the exit action.\n\
         `exit <digits>` ends the process with that code.\n\
         Anything else is printed.",
    )
}

#[must_use]
pub fn hi_command() -> Command {
    Command::new("hi", |args| {
        let text = match args.get("name").filter(|it| !it.is_empty()) {
            Some(name) => format!("Hello {name}."),
            None => "Hi.".to_owned(),
        };
        Ok(CommandOutput::Print(text))
    })
    .optional_param("name")
    .description("Says hello, to `name` if it is given.")
}
