// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Mock collaborators for driving a [`crate::TermController`] without a real terminal.

// Attach.
mod mock_input_source;
mod mock_terminal_device;
mod recording_target;

// Re-export.
pub use mock_input_source::*;
pub use mock_terminal_device::*;
pub use recording_target::*;
