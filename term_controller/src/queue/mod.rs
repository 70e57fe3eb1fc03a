// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod input_queue;
pub mod raw_byte_channel;

// Re-export.
pub use input_queue::*;
pub use raw_byte_channel::*;
