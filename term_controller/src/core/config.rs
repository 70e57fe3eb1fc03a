// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::CommandName;
use std::time::Duration;

/// Two `mouse_up` events closer together than this resolve to `mouse_doubleclick`.
pub const DEFAULT_DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(500);

/// Size of the buffer used for a single non-blocking read from the terminal.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4096;

pub const DEFAULT_READER_THREAD_NAME: &str = "term-controller-reader";

/// Set to `true` to log every read, decoded symbol, and mode transition at `debug`
/// level. Kept off by default since the reader thread is chatty.
pub const DEBUG_TERM_CONTROLLER: bool = false;

/// Which terminal reporting features are turned on while the controller is in
/// [`crate::Mode::Cooked`] or [`crate::Mode::Raw`], and turned off while
/// [`crate::Mode::Paused`] and at exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingFeatures {
    /// Mouse button and drag reporting (SGR extended coordinates).
    pub mouse: bool,
    /// Bracketed paste markers around pasted text.
    pub bracketed_paste: bool,
    /// Hide the cursor while reporting is on, show it again when off.
    pub hide_cursor: bool,
}

impl Default for ReportingFeatures {
    fn default() -> Self {
        Self {
            mouse: true,
            bracketed_paste: true,
            hide_cursor: true,
        }
    }
}

/// Configuration for [`crate::TermController`].
///
/// ```
/// use r3bl_term_controller::TermControllerConfig;
/// use std::time::Duration;
///
/// let config = TermControllerConfig::default()
///     .with_double_click_interval(Duration::from_millis(300))
///     .with_mouse(false);
/// assert!(!config.reporting.mouse);
/// ```
#[derive(Debug, Clone)]
pub struct TermControllerConfig {
    pub double_click_interval: Duration,
    pub reporting: ReportingFeatures,
    pub read_buffer_size: usize,
    pub reader_thread_name: String,
    /// Name of the command produced for unmapped printable input.
    pub literal_command: CommandName,
}

impl Default for TermControllerConfig {
    fn default() -> Self {
        Self {
            double_click_interval: DEFAULT_DOUBLE_CLICK_INTERVAL,
            reporting: ReportingFeatures::default(),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            reader_thread_name: DEFAULT_READER_THREAD_NAME.to_string(),
            literal_command: CommandName::insert_char(),
        }
    }
}

impl TermControllerConfig {
    #[must_use]
    pub fn with_double_click_interval(mut self, interval: Duration) -> Self {
        self.double_click_interval = interval;
        self
    }

    #[must_use]
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.reporting.mouse = enabled;
        self
    }

    #[must_use]
    pub fn with_bracketed_paste(mut self, enabled: bool) -> Self {
        self.reporting.bracketed_paste = enabled;
        self
    }

    #[must_use]
    pub fn with_hide_cursor(mut self, enabled: bool) -> Self {
        self.reporting.hide_cursor = enabled;
        self
    }

    /// A zero size is bumped to `1` so the reader always makes progress.
    #[must_use]
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    #[must_use]
    pub fn with_reader_thread_name(mut self, name: impl Into<String>) -> Self {
        self.reader_thread_name = name.into();
        self
    }

    #[must_use]
    pub fn with_literal_command(mut self, name: impl Into<CommandName>) -> Self {
        self.literal_command = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = TermControllerConfig::default();
        assert_eq!(config.double_click_interval, Duration::from_millis(500));
        assert_eq!(config.reporting, ReportingFeatures::default());
        assert_eq!(config.read_buffer_size, DEFAULT_READ_BUFFER_SIZE);
        assert_eq!(config.literal_command.as_str(), "insert_char");
    }

    #[test]
    fn test_builder_methods() {
        let config = TermControllerConfig::default()
            .with_bracketed_paste(false)
            .with_hide_cursor(false)
            .with_read_buffer_size(0)
            .with_reader_thread_name("reader")
            .with_literal_command("char");

        assert!(!config.reporting.bracketed_paste);
        assert!(!config.reporting.hide_cursor);
        assert!(config.reporting.mouse);
        assert_eq!(config.read_buffer_size, 1);
        assert_eq!(config.reader_thread_name, "reader");
        assert_eq!(config.literal_command.as_str(), "char");
    }
}
