// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{DisplayPreference, TracingConfig, WriterConfig};
use std::path::PathBuf;
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, layer::SubscriberExt, registry::LookupSpan,
                         util::SubscriberInitExt};

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer.
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_thread_names(true)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
    };
}

/// Type alias for a boxed layer.
pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// Initialize the global tracing subscriber with the provided [`TracingConfig`].
///
/// # Errors
///
/// Returns an error if the log file can't be created, or if a global subscriber has
/// already been installed.
pub fn init_tracing(tracing_config: TracingConfig) -> miette::Result<()> {
    let layers = try_create_layers(tracing_config)?;
    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| miette::miette!("failed to install tracing subscriber: {e}"))
}

/// Returns the layers. This does not initialize the tracing system.
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn try_create_layers(
    tracing_config: TracingConfig,
) -> miette::Result<Vec<Box<DynLayer<tracing_subscriber::Registry>>>> {
    let level_filter = tracing_config.get_level_filter();
    let writer_config = tracing_config.get_writer_config();

    let mut return_it: Vec<Box<DynLayer<tracing_subscriber::Registry>>> = vec![];

    // Set the level filter from the tracing configuration. This is needed if you add
    // more layers which don't have a level filter.
    return_it.push(Box::new(level_filter));

    if let Some(layer) = try_create_display_layer(level_filter, &writer_config) {
        return_it.push(layer);
    }

    if let Some(layer) = try_create_file_layer(level_filter, &writer_config)? {
        return_it.push(layer);
    }

    Ok(return_it)
}

/// This erases the concrete type of the writer, and returns a boxed layer.
pub fn try_create_display_layer<S>(
    level_filter: LevelFilter,
    writer_config: &WriterConfig,
) -> Option<Box<DynLayer<S>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!();

    match writer_config {
        WriterConfig::DisplayAndFile(display_pref, _)
        | WriterConfig::Display(display_pref) => match display_pref {
            DisplayPreference::Stdout => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stdout)
                    .with_filter(level_filter),
            )),
            DisplayPreference::Stderr => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stderr)
                    .with_filter(level_filter),
            )),
        },
        WriterConfig::None | WriterConfig::File(_) => None,
    }
}

/// This erases the concrete type of the writer, and returns a boxed layer.
///
/// # Errors
///
/// Returns an error if the log file path has no parent folder or file name.
pub fn try_create_file_layer<S>(
    level_filter: LevelFilter,
    writer_config: &WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!().with_ansi(false);

    Ok(match writer_config {
        WriterConfig::DisplayAndFile(_, path) | WriterConfig::File(path) => {
            let file = try_create_file_appender(path)?;
            Some(Box::new(
                fmt_layer.with_writer(file).with_filter(level_filter),
            ))
        }
        WriterConfig::None | WriterConfig::Display(_) => None,
    })
}

/// Note that if you wrap this up in a non blocking writer it doesn't flush before the
/// process exits, and the last lines (usually the interesting ones) are lost.
fn try_create_file_appender(
    path_str: &str,
) -> miette::Result<tracing_appender::rolling::RollingFileAppender> {
    let path = PathBuf::from(path_str);

    let parent = path.parent().ok_or_else(|| {
        miette::miette!(
            "Can't access folder of {}. It might not exist, or you don't have the required permissions.",
            path.display()
        )
    })?;

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!("Can't access file name of {}.", path.display())
    })?;

    Ok(tracing_appender::rolling::never(parent, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn temp_log_file_path(name: &str) -> String {
        let file_name = format!("{name}_{}.log", std::process::id());
        std::env::temp_dir().join(file_name).display().to_string()
    }

    #[test]
    fn test_try_create_display_layer() {
        let layer: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_display_layer(
                LevelFilter::DEBUG,
                &WriterConfig::Display(DisplayPreference::Stderr),
            );
        assert!(layer.is_some());

        let layer: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_display_layer(LevelFilter::DEBUG, &WriterConfig::None);
        assert!(layer.is_none());
    }

    #[test]
    fn test_try_create_file_layer() {
        let file_path = temp_log_file_path("test_try_create_file_layer");
        let layer: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_file_layer(LevelFilter::DEBUG, &WriterConfig::File(file_path.clone()))
                .unwrap();

        assert!(layer.is_some());
        assert!(std::path::Path::new(&file_path).exists());
        std::fs::remove_file(&file_path).ok();
    }

    #[test]
    fn test_try_create_layers_file_and_display() {
        let file_path = temp_log_file_path("test_try_create_layers_file_and_display");
        let config = TracingConfig::new_file_and_display(
            Some(file_path.clone()),
            DisplayPreference::Stdout,
            tracing::Level::DEBUG,
        );
        let layers = try_create_layers(config).unwrap();

        // Level filter, display, and file.
        assert_eq!(layers.len(), 3);
        std::fs::remove_file(&file_path).ok();
    }

    // Installs the process wide subscriber.
    #[test]
    #[serial]
    fn test_init_tracing_only_once() {
        let file_path = temp_log_file_path("test_init_tracing_only_once");
        let config = || TracingConfig::new_file(Some(file_path.clone()), tracing::Level::DEBUG);

        init_tracing(config()).unwrap();
        tracing::debug!(message = "Logged to file.");
        assert!(init_tracing(config()).is_err());
        std::fs::remove_file(&file_path).ok();
    }
}
