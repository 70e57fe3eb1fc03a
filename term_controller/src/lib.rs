// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words SIGWINCH SIGCONT doubleclick

//! # r3bl_term_controller
//!
//! A terminal input controller. A dedicated reader thread reads raw bytes from the
//! terminal, turns them into commands, and hands them to the consumer through a
//! queue or by direct dispatch to a target's named capabilities. The controller also
//! owns the terminal mode and restores the terminal on exit, however the process
//! ends.
//!
//! ```text
//! terminal bytes ─▶ KeyDecoder ─▶ CommandResolver ─▶ InputQueue ─▶ Dispatcher ─▶ target
//!                   (symbols)     (chords, clicks,     (FIFO)       (responds_to,
//!                                  literal text)                     invoke)
//! ```
//!
//! ## Resolution
//!
//! - Keys are looked up in a [`BindingTable`]. A [`Binding::Chord`] entry starts a
//!   compound key chord (eg: `ctrl_x ctrl_s`), resolved across several keystrokes.
//! - Printable text with no binding becomes `insert_char [text]`.
//! - Mouse releases become `mouse_click` or `mouse_doubleclick` depending on the time
//!   since the previous release.
//! - Unbound keys are recorded in [`Diagnostics`], never an error.
//! - `SIGWINCH` injects `resize`, `SIGCONT` injects `resume`.
//!
//! ## Modes
//!
//! | [`Mode`]   | Reader                                                     |
//! | :--------- | :--------------------------------------------------------- |
//! | `Cooked`   | resolves input into commands                               |
//! | `Raw`      | forwards bytes verbatim, see [`TermController::with_raw`]  |
//! | `Paused`   | idle, terminal restored, see [`TermController::pause`]     |
//!
//! Mode changes and reads are serialized by one mutex, so once
//! [`TermController::pause`] has switched modes no byte is consumed until the block
//! ends.
//!
//! ## Logging
//!
//! The crate logs with [`tracing`]. Since stdout is the controlled terminal, install a
//! file writer with [`init_tracing`] and [`WriterConfig::File`].

// Enforce strict error handling in production library code only. Tests and examples are
// allowed to use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules (re-exported below to provide clean public API).
pub mod command;
pub mod controller;
pub mod core;
pub mod decoder;
pub mod dispatch;
pub mod mode;
pub mod queue;
pub mod reader;
pub mod resolver;
pub mod terminal;
pub mod test_fixtures;


// Re-export stable public API using glob imports for a flat API surface.
pub use command::*;
pub use controller::*;
pub use core::*;
pub use decoder::*;
pub use dispatch::*;
pub use mode::*;
pub use queue::*;
pub use reader::*;
pub use resolver::*;
pub use terminal::*;
