// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod binding_table;
pub mod command_struct;
pub mod key_symbol;

// Re-export.
pub use binding_table::*;
pub use command_struct::*;
pub use key_symbol::*;
