// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::InlineVec;
use std::collections::BTreeMap;

/// Separates the key from the value in a named argument, eg `name:Ada`.
pub const NAMED_ARG_SEPARATOR: char = ':';

pub type NamedArgs = BTreeMap<String, String>;

/// An accepted line, split into the command name and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub name: String,
    pub positional_args: InlineVec<String>,
    pub named_args: NamedArgs,
}

/// Split `line` on spaces into a [`CommandInvocation`]. Returns `None` if the line has no
/// tokens, ie it is empty or blank.
///
/// - The first token is the command name.
/// - A token that contains [`NAMED_ARG_SEPARATOR`] is split at its first occurrence into
///   a key and a value, so `url:http://x` has the value `http://x`. If a key repeats, the
///   last value wins.
/// - Every other token is a positional argument, in order.
///
/// Empty tokens (from leading, trailing, or repeated spaces) are dropped, and every
/// token is trimmed of surrounding whitespace.
///
/// ```
/// use r3bl_repl::tokenize;
///
/// let invocation = tokenize("greet name:Ada extra").unwrap();
/// assert_eq!(invocation.name, "greet");
/// assert_eq!(invocation.positional_args.as_slice(), ["extra"]);
/// assert_eq!(invocation.named_args["name"], "Ada");
///
/// assert!(tokenize("   ").is_none());
/// ```
#[must_use]
pub fn tokenize(line: &str) -> Option<CommandInvocation> {
    let mut tokens = line.split(' ').map(str::trim).filter(|it| !it.is_empty());

    let name = tokens.next()?.to_owned();
    let mut positional_args = InlineVec::new();
    let mut named_args = NamedArgs::new();

    for token in tokens {
        match token.split_once(NAMED_ARG_SEPARATOR) {
            Some((key, value)) => {
                named_args.insert(key.to_owned(), value.to_owned());
            }
            None => positional_args.push(token.to_owned()),
        }
    }

    Some(CommandInvocation {
        name,
        positional_args,
        named_args,
    })
}
