// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// The only input events the line editor reacts to. Everything crossterm can report that
/// doesn't map to one of these becomes [`RawEvent::Unknown`] and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum RawEvent {
    Printable(char),
    Backspace,
    ArrowLeft,
    ArrowRight,
    Enter,
    /// `Ctrl+C`.
    Interrupt,
    /// `Ctrl+D`.
    EndOfInput,
    Unknown,
}

impl From<Event> for RawEvent {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => from_key_press(code, modifiers),
            _ => RawEvent::Unknown,
        }
    }
}

fn from_key_press(code: KeyCode, modifiers: KeyModifiers) -> RawEvent {
    // Control+Alt is used to reach certain special symbols on a lot of international
    // keyboard layouts, so it is not treated as a control key.
    let is_control_alt = modifiers.contains(KeyModifiers::CONTROL | KeyModifiers::ALT);

    if modifiers.contains(KeyModifiers::CONTROL) && !is_control_alt {
        return match code {
            KeyCode::Char('c') => RawEvent::Interrupt,
            KeyCode::Char('d') => RawEvent::EndOfInput,
            _ => RawEvent::Unknown,
        };
    }

    match code {
        KeyCode::Enter => RawEvent::Enter,
        KeyCode::Backspace => RawEvent::Backspace,
        KeyCode::Left => RawEvent::ArrowLeft,
        KeyCode::Right => RawEvent::ArrowRight,
        KeyCode::Char(ch) if !ch.is_control() && is_text_modifier(modifiers) => {
            RawEvent::Printable(ch)
        }
        _ => RawEvent::Unknown,
    }
}

fn is_text_modifier(modifiers: KeyModifiers) -> bool {
    let it = modifiers.difference(KeyModifiers::SHIFT);
    it.is_empty() || it == KeyModifiers::CONTROL | KeyModifiers::ALT
}
