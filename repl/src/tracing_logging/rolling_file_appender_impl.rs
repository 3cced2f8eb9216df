// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::Path;

/// Open (or create) the log file at `path_str`, appending to it. The file never rolls
/// over.
///
/// Note that if you wrap this up in a non blocking writer, as shown below, nothing gets
/// written once the guard returned by `non_blocking` is dropped:
///
/// ```ignore
/// tracing_appender::non_blocking(try_create("repl.log")?);
/// ```
///
/// # Errors
///
/// Returns an error if `path_str` has no file name, eg it is empty or ends in `..`.
pub fn try_create(
    path_str: &str,
) -> miette::Result<tracing_appender::rolling::RollingFileAppender> {
    let path = Path::new(path_str);

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!(
            "Can't access file name {}. It might not exist, or don't have required permissions.",
            path.display()
        )
    })?;

    // A bare file name has an empty parent, which means the current folder.
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    Ok(tracing_appender::rolling::never(parent, file_name))
}
