// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A small interactive shell with the `help`, `exit`, `hi`, and `secret` commands.
//! Try typing two spaces in a row, or `\x41`, to see the line editor react.

use clap::Parser;
use r3bl_repl::{Command, CommandOutput, CommandRegistry, CommonResult, DEFAULT_PROMPT,
                ErrorPolicy, InterruptBehavior, Repl, ReplConfig, ReplExit, TracingConfig,
                builtins, init_tracing};

#[derive(Debug, Parser)]
#[command(bin_name = "hello_repl")]
#[command(about = "🐚 A line editing REPL that flags runs of spaces before you submit")]
#[command(version)]
#[command(next_line_help = true)]
pub struct CLIArg {
    #[arg(long, short = 'p', default_value = DEFAULT_PROMPT, help = "Text shown before the cursor")]
    pub prompt: String,

    #[arg(long, help = "Report Ctrl+D as an error instead of exiting")]
    pub no_exit_on_eof: bool,

    #[arg(long, help = "Don't exit on Ctrl+C")]
    pub no_exit_on_interrupt: bool,

    #[arg(
        long,
        requires = "no_exit_on_interrupt",
        help = "When Ctrl+C doesn't exit, report it as an error instead of restarting the line"
    )]
    pub signal_interrupt: bool,

    #[arg(long, help = "Print unknown commands and bad arguments instead of quitting")]
    pub lenient: bool,

    #[arg(long, help = "Password that gates the `secret` command")]
    pub password: Option<String>,

    #[arg(
        long,
        requires = "password",
        help = "Ask for the password before the first prompt"
    )]
    pub authorize_at_start: bool,

    #[arg(
        long,
        short = 'l',
        help = "Log app output to a file named `repl_log.txt` for debugging"
    )]
    pub enable_logging: bool,
}

fn main() -> CommonResult<()> {
    let cli_arg = CLIArg::parse();

    if cli_arg.enable_logging {
        init_tracing(TracingConfig::new_file(None))?;
        // % is Display, ? is Debug.
        tracing::debug!(message = "Start logging...", cli_arg = ?cli_arg);
    }

    let config = create_config(&cli_arg)?;
    let registry = create_registry();

    // Fails on a pipe before anything is written. The banner is printed by `run()`.
    let mut repl = Repl::try_new(config, registry)?;
    let repl_exit = repl.run();

    tracing::debug!(message = "Stop logging...", repl_exit = ?repl_exit);

    match repl_exit? {
        ReplExit::Normal => Ok(()),
        ReplExit::Code(code) => std::process::exit(code),
    }
}

fn create_config(cli_arg: &CLIArg) -> CommonResult<ReplConfig> {
    let mut builder = ReplConfig::builder()
        .prompt(cli_arg.prompt.clone())
        .exit_on_end_of_input(!cli_arg.no_exit_on_eof)
        .exit_on_interrupt(!cli_arg.no_exit_on_interrupt)
        .banner("Ready! Type `help` to see what you can do.")
        .authorize_at_start(cli_arg.authorize_at_start)
        .at_exit(|| println!("Goodbye!"));

    if cli_arg.signal_interrupt {
        builder = builder.interrupt_behavior(InterruptBehavior::Signal);
    }

    if cli_arg.lenient {
        builder = builder.on_error(ErrorPolicy::lenient(|error| {
            Ok(CommandOutput::Print(error.to_string()))
        }));
    }

    if let Some(password) = &cli_arg.password {
        builder = builder.password(password.clone());
    }

    Ok(builder.build()?)
}

fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    builtins::register_builtins(&mut registry);
    registry.register(builtins::hi_command());
    registry.register(
        Command::new("secret", |_| {
            Ok(CommandOutput::Print("The cake is a lie.".to_owned()))
        })
        .requires_auth(true)
        .description("Tells a secret. Asks for the password if one was set."),
    );
    registry
}
