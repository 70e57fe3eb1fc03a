// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::symbols;
use std::time::{Duration, Instant};

/// Turns `mouse_up` into `mouse_click` or `mouse_doubleclick`.
#[derive(Debug, Clone)]
pub struct DoubleClickState {
    last_mouse_up: Option<Instant>,
    window: Duration,
}

impl DoubleClickState {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            last_mouse_up: None,
            window,
        }
    }

    /// A release strictly closer than the window to the previous release is a double
    /// click. The timestamp is updated either way, so a third quick release is also a
    /// double click.
    pub fn classify_mouse_up(&mut self, now: Instant) -> &'static str {
        let is_double = self
            .last_mouse_up
            .is_some_and(|last| now.saturating_duration_since(last) < self.window);
        self.last_mouse_up = Some(now);
        if is_double {
            symbols::MOUSE_DOUBLECLICK
        } else {
            symbols::MOUSE_CLICK
        }
    }
}
