// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod input_source;
#[cfg(unix)]
pub mod mio_input_source;
pub mod reader_task;

// Re-export.
pub use input_source::*;
#[cfg(unix)]
pub use mio_input_source::*;
pub use reader_task::*;
