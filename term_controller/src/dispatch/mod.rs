// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod command_target;
pub mod dispatcher;
pub mod handler_table;

// Re-export.
pub use command_target::*;
pub use dispatcher::*;
pub use handler_table::*;
