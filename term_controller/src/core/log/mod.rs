// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Tracing setup for applications built on this crate.
//!
//! The controlled terminal is in raw mode with mouse reporting on, so writing log
//! lines to stdout would corrupt the display. Prefer [`WriterConfig::File`].

// Attach sources.
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use tracing_config::*;
pub use tracing_init::*;
