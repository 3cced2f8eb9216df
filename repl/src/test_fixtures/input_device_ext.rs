// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CrosstermEventResult, InputDevice};

pub trait InputDeviceExt {
    /// Replays `generator_vec` in order, then reports that input ran out.
    fn new_mock(generator_vec: Vec<CrosstermEventResult>) -> InputDevice;
}

impl InputDeviceExt for InputDevice {
    fn new_mock(generator_vec: Vec<CrosstermEventResult>) -> InputDevice {
        InputDevice {
            resource: Box::new(generator_vec.into_iter()),
        }
    }
}
