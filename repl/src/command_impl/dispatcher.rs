// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CommandInvocation, CommandRegistry, CommandResult, ReplError};
use std::{fmt, sync::Arc};

pub type FallbackHandler = Arc<dyn Fn(&ReplError) -> CommandResult + Send + Sync>;

/// What happens when a line names an unknown command, or its arguments don't fit.
#[derive(Clone, Default)]
pub enum ErrorPolicy {
    /// Hand the error to the caller.
    #[default]
    Strict,
    /// Call the fallback with the error, and use its result instead.
    Lenient(FallbackHandler),
}

impl fmt::Debug for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Strict => write!(f, "Strict"),
            ErrorPolicy::Lenient(_) => write!(f, "Lenient(..)"),
        }
    }
}

impl ErrorPolicy {
    pub fn lenient(
        fallback: impl Fn(&ReplError) -> CommandResult + Send + Sync + 'static,
    ) -> Self {
        ErrorPolicy::Lenient(Arc::new(fallback))
    }

    /// Route a dispatch error. Errors that are not dispatch errors are always returned
    /// as is.
    ///
    /// # Errors
    ///
    /// Returns `error` under [`ErrorPolicy::Strict`], or whatever the fallback returns.
    pub fn apply(&self, error: ReplError) -> CommandResult {
        match self {
            ErrorPolicy::Lenient(fallback) if error.is_dispatch_error() => {
                tracing::debug!(message = "Dispatch -> fallback", %error);
                fallback(&error)
            }
            _ => Err(error),
        }
    }
}

/// Look up the command named by `invocation` and run it.
///
/// Unknown commands and arguments that don't bind are routed through `policy`. So is a
/// [`ReplError::CommandNotFound`] or [`ReplError::ArgumentMismatch`] returned by the
/// handler itself, eg `help nope`.
///
/// # Errors
///
/// Returns a dispatch error under [`ErrorPolicy::Strict`], and any other error the
/// handler returns.
pub fn dispatch(
    invocation: &CommandInvocation,
    registry: &CommandRegistry,
    policy: &ErrorPolicy,
) -> CommandResult {
    let Some(command) = registry.get(&invocation.name) else {
        return policy.apply(ReplError::CommandNotFound {
            name: invocation.name.clone(),
        });
    };

    tracing::debug!(message = "Dispatch -> run", command = %command.name, ?invocation);

    match command.invoke(invocation, registry) {
        Err(error) => policy.apply(error),
        ok => ok,
    }
}
