// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::CrosstermEventResult;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

#[must_use]
pub fn key_press(code: KeyCode) -> CrosstermEventResult {
    Ok(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

#[must_use]
pub fn ctrl_key_press(ch: char) -> CrosstermEventResult {
    Ok(Event::Key(KeyEvent::new(
        KeyCode::Char(ch),
        KeyModifiers::CONTROL,
    )))
}

/// One key press per char in `text`.
#[must_use]
pub fn typed(text: &str) -> Vec<CrosstermEventResult> {
    text.chars().map(|ch| key_press(KeyCode::Char(ch))).collect()
}

/// Type `text` then press `Enter`.
#[must_use]
pub fn typed_line(text: &str) -> Vec<CrosstermEventResult> {
    let mut it = typed(text);
    it.push(key_press(KeyCode::Enter));
    it
}
