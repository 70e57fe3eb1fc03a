// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod mode_controller;
pub mod mode_enum;

// Re-export.
pub use mode_controller::*;
pub use mode_enum::*;
