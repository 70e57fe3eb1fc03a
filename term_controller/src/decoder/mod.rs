// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Byte → key symbol decoding.
//!
//! The controller core only depends on the [`KeyDecoder`] trait. [`Vt100KeyDecoder`]
//! is the implementation used by [`crate::TermController::try_new`]; it understands
//! the sequences a terminal sends once the reporting features in
//! [`crate::ReportingFeatures`] are on:
//!
//! | Input                         | Decoded                                  |
//! | :---------------------------- | :--------------------------------------- |
//! | `0x03`                        | `ctrl_c`                                 |
//! | `ESC [ 1 ; 5 A`               | `ctrl_up`                                |
//! | `ESC [ 15 ~`                  | `f5`                                     |
//! | `ESC [ < 0 ; 10 ; 5 M`        | `mouse_down [0, 10, 5]`                  |
//! | `ESC [ 200 ~`                 | `paste_start`                            |
//! | `x`, `é`, `🙂`                | literal text                             |

// Attach sources.
pub mod keyboard;
pub mod mouse;
pub mod utf8;
pub mod vt_100_key_decoder;

// Re-export.
pub use vt_100_key_decoder::*;

use crate::{CommandArgs, KeySymbol};

/// Output of a [`KeyDecoder`] for one complete unit of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A symbolic key or mouse event. `args` are the default arguments used when the
    /// symbol has no binding, eg: `[button_flags, column, row]` for mouse events.
    Symbol { symbol: KeySymbol, args: CommandArgs },
    /// Printable text. Falls back to the literal command if unbound.
    Literal(String),
}

impl Decoded {
    #[must_use]
    pub fn symbol(name: &str) -> Self {
        Decoded::Symbol {
            symbol: KeySymbol::new(name),
            args: CommandArgs::new(),
        }
    }

    #[must_use]
    pub fn symbol_with_args(name: &str, args: CommandArgs) -> Self {
        Decoded::Symbol {
            symbol: KeySymbol::new(name),
            args,
        }
    }

    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self { Decoded::Literal(text.into()) }

    /// The key used for binding table lookups. Literal text is looked up as is, so
    /// `q` can be bound directly.
    #[must_use]
    pub fn lookup_key(&self) -> &str {
        match self {
            Decoded::Symbol { symbol, .. } => symbol.as_str(),
            Decoded::Literal(text) => text.as_str(),
        }
    }
}

/// Turns raw terminal bytes into [`Decoded`] units.
///
/// Must not block. It is called repeatedly as more bytes arrive.
pub trait KeyDecoder: Send {
    /// Decode one unit from the front of `buffer`.
    ///
    /// - `Some((decoded, consumed))` when a complete unit was found.
    /// - `None` when `buffer` is empty or holds an incomplete sequence (more bytes are
    ///   needed).
    ///
    /// `input_available` is `true` when the last read filled the read buffer, so more
    /// bytes are likely waiting. It disambiguates a lone `ESC` key press from the
    /// start of an escape sequence.
    fn decode(&mut self, buffer: &[u8], input_available: bool) -> Option<(Decoded, usize)>;
}
