// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Why [`try_unescape()`] gave up on a line. Positions are char indices into the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MalformedEscapeSequence {
    #[error("trailing backslash at char {at}")]
    TrailingBackslash { at: usize },

    #[error("incomplete `\\{kind}` escape at char {at}")]
    Incomplete { kind: char, at: usize },

    #[error("`{value:#x}` is not a unicode scalar value, at char {at}")]
    InvalidCodePoint { value: u32, at: usize },
}

/// Decode every backslash escape in `text`, and move `cursor` (a char index) so it keeps
/// pointing at the same character.
///
/// If the text contains a malformed escape, eg a trailing `\` or a `\x` that is still
/// missing a hex digit, the text and cursor are returned unchanged. This is the common
/// case while an escape is being typed, and is not an error.
///
/// ```
/// use r3bl_repl::unescape;
///
/// assert_eq!(unescape(r"a\nb", 4), ("a\nb".to_string(), 3));
/// assert_eq!(unescape(r"a\x", 3), (r"a\x".to_string(), 3));
/// ```
#[must_use]
pub fn unescape(text: &str, cursor: usize) -> (String, usize) {
    match try_unescape(text, cursor) {
        Ok(it) => it,
        Err(error) => {
            tracing::trace!(message = "unescape -> left as is", %error);
            (text.to_owned(), cursor)
        }
    }
}

/// Decode every backslash escape in `text`.
///
/// | Escape         | Result                                   |
/// |----------------|------------------------------------------|
/// | `\\` `\'` `\"` | The character itself                     |
/// | `\a` `\b` `\f` | BEL, BS, FF                              |
/// | `\n` `\r` `\t` | LF, CR, TAB                              |
/// | `\v` `\e`      | VT, ESC                                  |
/// | `\ooo`         | 1 to 3 octal digits                      |
/// | `\xHH`         | Exactly 2 hex digits                     |
/// | `\uHHHH`       | Exactly 4 hex digits                     |
/// | `\UHHHHHHHH`   | Exactly 8 hex digits                     |
/// | anything else  | Kept verbatim, backslash included        |
///
/// The new cursor is the old one plus the change in length contributed by every escape
/// that starts before the old cursor. An escape that straddles the cursor counts in full,
/// so the cursor lands right after the decoded character.
///
/// # Errors
///
/// Returns [`MalformedEscapeSequence`] for a trailing backslash, an escape with too few
/// digits, or a code point that is not a valid `char`.
pub fn try_unescape(
    text: &str,
    cursor: usize,
) -> Result<(String, usize), MalformedEscapeSequence> {
    if !text.contains('\\') {
        return Ok((text.to_owned(), cursor));
    }

    let chars: Vec<char> = text.chars().collect();
    let mut output = String::with_capacity(text.len());
    let mut new_cursor = 0;
    let mut index = 0;

    while let Some(&ch) = chars.get(index) {
        let (emitted, next_index) = if ch == '\\' {
            decode_escape(&chars, index, &mut output)?
        } else {
            output.push(ch);
            (1, index + 1)
        };

        if index < cursor {
            new_cursor += emitted;
        }
        index = next_index;
    }

    Ok((output, new_cursor))
}

/// Decode the escape whose backslash is at `at`. Returns the number of chars written to
/// `output` and the index right after the escape.
fn decode_escape(
    chars: &[char],
    at: usize,
    output: &mut String,
) -> Result<(usize, usize), MalformedEscapeSequence> {
    let Some(&kind) = chars.get(at + 1) else {
        return Err(MalformedEscapeSequence::TrailingBackslash { at });
    };

    if let Some(decoded) = decode_single_char_escape(kind) {
        output.push(decoded);
        return Ok((1, at + 2));
    }

    match kind {
        'x' => decode_hex_escape(chars, at, kind, 2, output),
        'u' => decode_hex_escape(chars, at, kind, 4, output),
        'U' => decode_hex_escape(chars, at, kind, 8, output),
        '0'..='7' => {
            let digits: String = chars[at + 1..]
                .iter()
                .take(3)
                .take_while(|it| matches!(it, '0'..='7'))
                .collect();
            let value = u32::from_str_radix(&digits, 8)
                .map_err(|_| MalformedEscapeSequence::Incomplete { kind, at })?;
            let decoded = char::from_u32(value)
                .ok_or(MalformedEscapeSequence::InvalidCodePoint { value, at })?;
            output.push(decoded);
            Ok((1, at + 1 + digits.len()))
        }
        _ => {
            output.push('\\');
            output.push(kind);
            Ok((2, at + 2))
        }
    }
}

fn decode_single_char_escape(kind: char) -> Option<char> {
    let it = match kind {
        '\\' => '\\',
        '\'' => '\'',
        '"' => '"',
        'a' => '\x07',
        'b' => '\x08',
        'f' => '\x0c',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\x0b',
        'e' => '\x1b',
        _ => return None,
    };
    Some(it)
}

fn decode_hex_escape(
    chars: &[char],
    at: usize,
    kind: char,
    digit_count: usize,
    output: &mut String,
) -> Result<(usize, usize), MalformedEscapeSequence> {
    let start = at + 2;
    let digits = chars
        .get(start..start + digit_count)
        .filter(|it| it.iter().all(char::is_ascii_hexdigit))
        .ok_or(MalformedEscapeSequence::Incomplete { kind, at })?;

    let digits: String = digits.iter().collect();
    let value = u32::from_str_radix(&digits, 16)
        .map_err(|_| MalformedEscapeSequence::Incomplete { kind, at })?;
    let decoded = char::from_u32(value)
        .ok_or(MalformedEscapeSequence::InvalidCodePoint { value, at })?;

    output.push(decoded);
    Ok((1, start + digit_count))
}
