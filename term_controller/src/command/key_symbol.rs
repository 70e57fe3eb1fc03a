// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use smallstr::SmallString;
use std::{borrow::Borrow,
          fmt::{Display, Formatter, Result}};

/// Most symbols and command names (`ctrl_c`, `mouse_doubleclick`, `page_down`) fit
/// inline, so they never touch the heap.
pub const INLINE_SYMBOL_SIZE: usize = 24;

pub type InlineSymbolString = SmallString<[u8; INLINE_SYMBOL_SIZE]>;

/// Tag identifying a decoded key or mouse event, eg: `ctrl_c`, `up`, `f5`,
/// `mouse_up`. Produced by a [`crate::KeyDecoder`] and used as the key of a
/// [`crate::BindingTable`].
///
/// Literal text is not a symbol: it is carried by [`crate::Decoded::Literal`]. It can
/// still be bound in a table, eg: `q` → `quit`, in which case the lookup uses
/// [`KeySymbol::new`] with the literal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeySymbol(InlineSymbolString);

/// Name of a capability on a [`crate::CommandTarget`], eg: `quit`, `insert_char`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandName(InlineSymbolString);

macro_rules! impl_symbol_newtype {
    ($type:ident) => {
        impl $type {
            #[must_use]
            pub fn new(name: &str) -> Self { Self(InlineSymbolString::from_str(name)) }

            #[must_use]
            pub fn as_str(&self) -> &str { self.0.as_str() }
        }

        impl Display for $type {
            fn fmt(&self, f: &mut Formatter<'_>) -> Result { f.write_str(self.as_str()) }
        }

        impl From<&str> for $type {
            fn from(name: &str) -> Self { Self::new(name) }
        }

        impl From<String> for $type {
            fn from(name: String) -> Self { Self::new(&name) }
        }

        impl Borrow<str> for $type {
            fn borrow(&self) -> &str { self.as_str() }
        }

        impl PartialEq<&str> for $type {
            fn eq(&self, other: &&str) -> bool { self.as_str() == *other }
        }
    };
}

impl_symbol_newtype!(KeySymbol);
impl_symbol_newtype!(CommandName);

/// An unbound key with default arguments resolves to a command of the same name.
impl From<&KeySymbol> for CommandName {
    fn from(symbol: &KeySymbol) -> Self { Self::new(symbol.as_str()) }
}

impl KeySymbol {
    /// Diagnostics label for one chord step: `ctrl_x` → `ctrl x`.
    #[must_use]
    pub fn label(&self) -> String { self.as_str().replace('_', " ") }
}

/// Well known symbols produced by the mouse decoder and the resolver.
pub mod symbols {
    pub const MOUSE_DOWN: &str = "mouse_down";
    pub const MOUSE_UP: &str = "mouse_up";
    pub const MOUSE_MOVE: &str = "mouse_move";
    pub const MOUSE_CLICK: &str = "mouse_click";
    pub const MOUSE_DOUBLECLICK: &str = "mouse_doubleclick";
    pub const SCROLL_UP: &str = "scroll_up";
    pub const SCROLL_DOWN: &str = "scroll_down";
    pub const PASTE_START: &str = "paste_start";
    pub const PASTE_END: &str = "paste_end";
    pub const FOCUS_IN: &str = "focus_in";
    pub const FOCUS_OUT: &str = "focus_out";
    pub const ESC: &str = "esc";
    pub const UNKNOWN: &str = "unknown";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_symbol_equality_and_display() {
        let symbol = KeySymbol::new("ctrl_c");
        assert_eq!(symbol, "ctrl_c");
        assert_eq!(symbol.to_string(), "ctrl_c");
        assert_eq!(symbol.label(), "ctrl c");
        assert!(!symbol.0.spilled());
    }

    #[test]
    fn test_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(KeySymbol::from("f5"), 5);
        assert_eq!(map.get("f5"), Some(&5));
    }

    #[test]
    fn test_command_name_from_symbol() {
        let symbol = KeySymbol::new(symbols::MOUSE_DOWN);
        assert_eq!(CommandName::from(&symbol), "mouse_down");
    }
}
