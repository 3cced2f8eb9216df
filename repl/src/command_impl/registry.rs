// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CommandInvocation, ExitStatus, InlineVec, NamedArgs, ReplError};
use std::{collections::BTreeMap, fmt, sync::Arc};

/// What a handler asks the REPL to do after it runs. Handlers never write to the
/// terminal themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Silent,
    Print(String),
    Exit(ExitStatus),
}

pub type CommandResult = Result<CommandOutput, ReplError>;

pub type CommandHandler = Arc<dyn Fn(&CommandArgs<'_>) -> CommandResult + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub is_required: bool,
}

/// The arguments of one call, after they were bound to the command's parameters.
#[derive(Debug)]
pub struct CommandArgs<'a> {
    pub positional_args: &'a [String],
    pub named_args: &'a NamedArgs,
    pub registry: &'a CommandRegistry,
    bound: BTreeMap<&'a str, &'a str>,
}

impl<'a> CommandArgs<'a> {
    /// Value of the parameter `param_name`, whether it was passed positionally or by name.
    #[must_use]
    pub fn get(&self, param_name: &str) -> Option<&'a str> {
        self.bound.get(param_name).copied()
    }
}

/// A named handler along with the metadata that `help` prints, and that arguments are
/// checked against before the handler runs.
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub params: InlineVec<Param>,
    pub description: String,
    pub requires_auth: bool,
    pub handler: CommandHandler,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("description", &self.description)
            .field("requires_auth", &self.requires_auth)
            .finish_non_exhaustive()
    }
}

impl Command {
    pub fn new(
        name: impl Into<String>,
        handler: impl Fn(&CommandArgs<'_>) -> CommandResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            params: InlineVec::new(),
            description: String::new(),
            requires_auth: false,
            handler: Arc::new(handler),
        }
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            is_required: true,
        });
        self
    }

    #[must_use]
    pub fn optional_param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            is_required: false,
        });
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn requires_auth(mut self, requires_auth: bool) -> Self {
        self.requires_auth = requires_auth;
        self
    }

    /// Eg `hi(name)` or `exit(status?)`.
    #[must_use]
    pub fn signature(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|param| {
                if param.is_required {
                    param.name.clone()
                } else {
                    format!("{}?", param.name)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({params})", self.name)
    }

    /// Map the invocation's arguments onto this command's parameters. Positional
    /// arguments fill parameters in declaration order, then named arguments fill the
    /// rest by name.
    ///
    /// # Errors
    ///
    /// Returns the reason as text when there are too many positional arguments, a named
    /// argument doesn't match a parameter, a parameter gets two values, or a required
    /// parameter gets none.
    pub fn bind_args<'a>(
        &'a self,
        invocation: &'a CommandInvocation,
    ) -> Result<BTreeMap<&'a str, &'a str>, String> {
        let positional_args = &invocation.positional_args;
        if positional_args.len() > self.params.len() {
            return Err(format!(
                "takes at most {} argument(s) but {} were given",
                self.params.len(),
                positional_args.len()
            ));
        }

        let mut bound = BTreeMap::new();
        for (param, value) in self.params.iter().zip(positional_args.iter()) {
            bound.insert(param.name.as_str(), value.as_str());
        }

        for (key, value) in &invocation.named_args {
            if !self.params.iter().any(|param| param.name == *key) {
                return Err(format!("unexpected argument `{key}`"));
            }
            if bound.insert(key.as_str(), value.as_str()).is_some() {
                return Err(format!("got multiple values for `{key}`"));
            }
        }

        if let Some(missing) = self
            .params
            .iter()
            .find(|param| param.is_required && !bound.contains_key(param.name.as_str()))
        {
            return Err(format!("missing required argument `{}`", missing.name));
        }

        Ok(bound)
    }

    /// Bind `invocation` and run the handler.
    ///
    /// # Errors
    ///
    /// Returns [`ReplError::ArgumentMismatch`] if the arguments don't bind, otherwise
    /// whatever the handler returns.
    pub fn invoke(
        &self,
        invocation: &CommandInvocation,
        registry: &CommandRegistry,
    ) -> CommandResult {
        let bound = self
            .bind_args(invocation)
            .map_err(|reason| ReplError::ArgumentMismatch {
                name: self.name.clone(),
                reason,
            })?;

        let args = CommandArgs {
            positional_args: &invocation.positional_args,
            named_args: &invocation.named_args,
            registry,
            bound,
        };
        (self.handler)(&args)
    }
}

/// Commands by name, iterated in name order.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Command>,
}

impl CommandRegistry {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns the command that was previously registered under the same name, if any.
    pub fn register(&mut self, command: Command) -> Option<Command> {
        let replaced = self.commands.insert(command.name.clone(), command);
        if let Some(replaced) = &replaced {
            tracing::debug!(message = "Command -> replaced", name = %replaced.name);
        }
        replaced
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Command> { self.commands.get(name) }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool { self.commands.contains_key(name) }

    pub fn iter(&self) -> impl Iterator<Item = &Command> { self.commands.values() }

    #[must_use]
    pub fn len(&self) -> usize { self.commands.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }
}
