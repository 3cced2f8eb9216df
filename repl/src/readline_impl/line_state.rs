// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{PASSWORD_MASK_CHAR, RawEvent, highlight, unescape};
use crossterm::{QueueableCommand,
                cursor::MoveToColumn,
                style::Print,
                terminal::{Clear, ClearType}};
use std::io::{self, Write};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Written instead of accepting a line that [`highlight()`] flagged.
pub const BELL: &str = "\x07";

/// Line terminator while the terminal is in raw mode.
pub const CRLF: &str = "\r\n";

/// What `Ctrl+C` does when it doesn't terminate the REPL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum_macros::Display)]
pub enum InterruptBehavior {
    /// Discard the line being edited and show an empty prompt on a fresh line.
    #[default]
    RestartLine,
    /// Stop reading and report [`CancelReason::Interrupted`] to the caller.
    Signal,
}

/// How the line editor reacts to `Ctrl+C` and `Ctrl+D`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSignalPolicy {
    pub exit_on_interrupt: bool,
    pub exit_on_end_of_input: bool,
    pub interrupt_behavior: InterruptBehavior,
}

impl Default for ControlSignalPolicy {
    fn default() -> Self {
        Self {
            exit_on_interrupt: true,
            exit_on_end_of_input: true,
            interrupt_behavior: InterruptBehavior::default(),
        }
    }
}

impl ControlSignalPolicy {
    /// Both signals are handed back to the caller, nothing terminates.
    #[must_use]
    pub fn cancel_only() -> Self {
        Self {
            exit_on_interrupt: false,
            exit_on_end_of_input: false,
            interrupt_behavior: InterruptBehavior::Signal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Decorate the line with [`highlight()`] and decode escapes as they are typed.
    Highlight,
    /// Show one mask char per char in the line. The line is taken literally.
    Masked(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum CancelReason {
    Interrupted,
    EndOfInput,
}

/// Outcome of feeding one [`RawEvent`] to [`LineState::apply_event_and_render()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditResult {
    /// Keep reading. Carries what is shown after the prompt and the cursor (a char index
    /// into the line).
    Continue { rendered: String, cursor: usize },
    /// `Enter` on a valid line. The buffer has been cleared.
    Accepted(String),
    Cancelled(CancelReason),
    /// The caller must run its exit action and stop.
    Terminated,
}

/// The state machine behind a single editable prompt line.
///
/// - `line_cursor` is a char index into `line`, and is always in `0..=line.chars().count()`.
/// - In [`RenderMode::Highlight`] the line is normalized by [`unescape()`] after every
///   edit, so it never holds a complete escape sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineState {
    pub line: String,
    pub line_cursor: usize,
    pub prompt: String,
    pub render_mode: RenderMode,
    pub policy: ControlSignalPolicy,
}

impl LineState {
    pub fn new(prompt: impl Into<String>, policy: ControlSignalPolicy) -> Self {
        Self {
            line: String::new(),
            line_cursor: 0,
            prompt: prompt.into(),
            render_mode: RenderMode::Highlight,
            policy,
        }
    }

    /// A masked prompt for secrets. Both control signals cancel, neither terminates.
    pub fn new_password(prompt: impl Into<String>) -> Self {
        Self {
            render_mode: RenderMode::Masked(PASSWORD_MASK_CHAR),
            ..Self::new(prompt, ControlSignalPolicy::cancel_only())
        }
    }

    pub fn reset(&mut self) {
        self.line.clear();
        self.line_cursor = 0;
    }

    fn char_count(&self) -> usize { self.line.chars().count() }

    /// Byte offset of the char at `char_index`, or the length of the line past the end.
    fn byte_offset(&self, char_index: usize) -> usize {
        self.line
            .char_indices()
            .nth(char_index)
            .map_or(self.line.len(), |(offset, _)| offset)
    }

    /// Move cursor by `change` chars, either left (negative) or right (positive).
    fn move_cursor(&mut self, change: isize) {
        self.line_cursor = if change > 0 {
            usize::min(self.line_cursor + change.unsigned_abs(), self.char_count())
        } else {
            self.line_cursor.saturating_sub(change.unsigned_abs())
        };
    }

    fn insert_char(&mut self, ch: char) {
        let offset = self.byte_offset(self.line_cursor);
        self.line.insert(offset, ch);
        self.line_cursor += 1;
    }

    fn delete_before_cursor(&mut self) {
        if self.line_cursor == 0 {
            return;
        }
        let start = self.byte_offset(self.line_cursor - 1);
        let end = self.byte_offset(self.line_cursor);
        self.line.replace_range(start..end, "");
        self.line_cursor -= 1;
    }

    fn normalize(&mut self) {
        if let RenderMode::Masked(_) = self.render_mode {
            return;
        }
        let (line, line_cursor) = unescape(&self.line, self.line_cursor);
        self.line = line;
        self.line_cursor = line_cursor.min(self.char_count());
    }

    /// What is shown after the prompt.
    #[must_use]
    pub fn rendered_text(&self) -> String {
        match self.render_mode {
            RenderMode::Highlight => highlight(&self.line).decorated_text,
            RenderMode::Masked(mask) => std::iter::repeat_n(mask, self.char_count()).collect(),
        }
    }

    /// Terminal column of the cursor, counting the prompt.
    #[must_use]
    pub fn cursor_column(&self) -> u16 {
        let line_width = match self.render_mode {
            RenderMode::Highlight => {
                let offset = self.byte_offset(self.line_cursor);
                UnicodeWidthStr::width(&self.line[..offset])
            }
            RenderMode::Masked(mask) => {
                UnicodeWidthChar::width(mask).unwrap_or(1) * self.line_cursor
            }
        };
        let column = UnicodeWidthStr::width(self.prompt.as_str()) + line_width;
        u16::try_from(column).unwrap_or(u16::MAX)
    }

    fn continue_result(&self) -> EditResult {
        EditResult::Continue {
            rendered: self.rendered_text(),
            cursor: self.line_cursor,
        }
    }

    /// Clear the current terminal line, then write the prompt, the rendered text, and
    /// place the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to or flushing `term` fails.
    pub fn render_and_flush(&self, term: &mut dyn Write) -> io::Result<()> {
        term.queue(MoveToColumn(0))?
            .queue(Clear(ClearType::CurrentLine))?
            .queue(Print(&self.prompt))?
            .queue(Print(self.rendered_text()))?
            .queue(MoveToColumn(self.cursor_column()))?;
        term.flush()
    }

    /// Clear the buffer and move to a fresh terminal line.
    fn exit(&mut self, term: &mut dyn Write) -> io::Result<()> {
        self.reset();
        term.queue(Print(CRLF))?;
        term.flush()
    }

    /// Apply one event to the line and write the result to `term`.
    ///
    /// Every event that doesn't end the line re-renders the whole line, including the ones
    /// that are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `term` fails.
    pub fn apply_event_and_render(
        &mut self,
        event: RawEvent,
        term: &mut dyn Write,
    ) -> io::Result<EditResult> {
        match event {
            RawEvent::Printable(ch) => {
                self.insert_char(ch);
                self.normalize();
            }
            RawEvent::Backspace => {
                self.delete_before_cursor();
                self.normalize();
            }
            RawEvent::ArrowLeft => self.move_cursor(-1),
            RawEvent::ArrowRight => self.move_cursor(1),
            RawEvent::Enter => return self.handle_enter(term),
            RawEvent::Interrupt => return self.handle_interrupt(term),
            RawEvent::EndOfInput => return self.handle_end_of_input(term),
            RawEvent::Unknown => {}
        }

        self.render_and_flush(term)?;
        Ok(self.continue_result())
    }

    fn handle_enter(&mut self, term: &mut dyn Write) -> io::Result<EditResult> {
        let is_valid = match self.render_mode {
            RenderMode::Highlight => highlight(&self.line).is_valid,
            RenderMode::Masked(_) => true,
        };

        if !is_valid {
            tracing::debug!(message = "Enter -> rejected, line has runs of spaces", line = ?self.line);
            term.queue(Print(BELL))?;
            term.flush()?;
            return Ok(self.continue_result());
        }

        term.queue(Print(CRLF))?;
        term.flush()?;

        let line = std::mem::take(&mut self.line);
        self.line_cursor = 0;
        Ok(EditResult::Accepted(line))
    }

    fn handle_interrupt(&mut self, term: &mut dyn Write) -> io::Result<EditResult> {
        self.exit(term)?;

        if self.policy.exit_on_interrupt {
            return Ok(EditResult::Terminated);
        }

        match self.policy.interrupt_behavior {
            InterruptBehavior::RestartLine => {
                self.render_and_flush(term)?;
                Ok(self.continue_result())
            }
            InterruptBehavior::Signal => Ok(EditResult::Cancelled(CancelReason::Interrupted)),
        }
    }

    fn handle_end_of_input(&mut self, term: &mut dyn Write) -> io::Result<EditResult> {
        self.exit(term)?;

        if self.policy.exit_on_end_of_input {
            Ok(EditResult::Terminated)
        } else {
            Ok(EditResult::Cancelled(CancelReason::EndOfInput))
        }
    }
}
