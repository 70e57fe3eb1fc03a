// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tracing_core::LevelFilter;

/// Default log file used by [`TracingConfig::new_file`] when no path is given.
pub const DEFAULT_LOG_FILE_PATH: &str = "term_controller_log.txt";

/// Configure where tracing output goes and at what level. Pass it to
/// [`crate::init_tracing()`].
///
/// Fields:
/// - `writer_config`: [`WriterConfig`] to choose where to write the logs.
/// - `level`: [`tracing::Level`] - The log level to use for tracing.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub writer_config: WriterConfig,
    pub level: tracing::Level,
}

/// - `String` is the file path to use for the log file. Eg: `/tmp/draw_log.txt`.
/// - [`DisplayPreference`] is the display to use for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterConfig {
    None,
    Display(DisplayPreference),
    File(String),
    DisplayAndFile(DisplayPreference, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
}

impl TracingConfig {
    /// Log to a file only. This is the one to use while a [`crate::TermController`]
    /// owns the terminal.
    #[must_use]
    pub fn new_file(path: Option<String>, level: tracing::Level) -> Self {
        Self {
            writer_config: WriterConfig::File(
                path.unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string()),
            ),
            level,
        }
    }

    #[must_use]
    pub fn new_display(preferred_display: DisplayPreference, level: tracing::Level) -> Self {
        Self {
            writer_config: WriterConfig::Display(preferred_display),
            level,
        }
    }

    #[must_use]
    pub fn new_file_and_display(
        path: Option<String>,
        preferred_display: DisplayPreference,
        level: tracing::Level,
    ) -> Self {
        Self {
            writer_config: WriterConfig::DisplayAndFile(
                preferred_display,
                path.unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string()),
            ),
            level,
        }
    }

    #[must_use]
    pub fn get_writer_config(&self) -> WriterConfig { self.writer_config.clone() }

    #[must_use]
    pub fn get_level_filter(&self) -> LevelFilter { LevelFilter::from_level(self.level) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_file_uses_default_path() {
        let config = TracingConfig::new_file(None, tracing::Level::INFO);
        assert_eq!(
            config.get_writer_config(),
            WriterConfig::File(DEFAULT_LOG_FILE_PATH.to_string())
        );
        assert_eq!(config.get_level_filter(), LevelFilter::INFO);
    }

    #[test]
    fn test_new_file_and_display() {
        let config = TracingConfig::new_file_and_display(
            Some("/tmp/foo.log".into()),
            DisplayPreference::Stderr,
            tracing::Level::DEBUG,
        );
        assert_eq!(
            config.get_writer_config(),
            WriterConfig::DisplayAndFile(DisplayPreference::Stderr, "/tmp/foo.log".into())
        );
    }
}
