// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CrosstermEventResult, RawEvent};
use std::io;

pub type InputResource = Box<dyn Iterator<Item = CrosstermEventResult>>;

/// This struct represents an input device that can be used to read from the terminal.
/// Reads block. See [`crate::InputDeviceExt`] for testing features.
#[allow(missing_debug_implementations)]
pub struct InputDevice {
    pub resource: InputResource,
}

impl Default for InputDevice {
    fn default() -> Self { Self::new_event_reader() }
}

impl InputDevice {
    /// Reads from the real terminal with [`crossterm::event::read`]. This never runs out.
    #[must_use]
    pub fn new_event_reader() -> InputDevice {
        InputDevice {
            resource: Box::new(std::iter::repeat_with(crossterm::event::read)),
        }
    }
}

impl InputDevice {
    /// Block until the next event. `Ok(None)` means the source ran out of events, which
    /// only happens for mock devices.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    pub fn next_raw_event(&mut self) -> io::Result<Option<RawEvent>> {
        self.resource
            .next()
            .transpose()
            .map(|maybe_event| maybe_event.map(RawEvent::from))
    }
}
