// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod command_resolver;
pub mod decode_buffer;
pub mod diagnostics;
pub mod double_click;

// Re-export.
pub use command_resolver::*;
pub use decode_buffer::*;
pub use diagnostics::*;
pub use double_click::*;
