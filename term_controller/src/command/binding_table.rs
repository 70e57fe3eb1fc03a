// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Command, CommandName, KeySymbol, StdMutex, lock_or_recover};
use std::{collections::HashMap, sync::Arc};

/// Value stored under a [`KeySymbol`] in a [`BindingTable`].
///
/// - [`Binding::Leaf`] ends chord resolution with a command.
/// - [`Binding::Chord`] means the key is a prefix (eg: `ctrl_x` in `ctrl_x ctrl_s`)
///   and the next key is looked up in the nested table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Leaf(Command),
    Chord(BindingTable),
}

/// Mapping from key symbols to commands or nested tables.
///
/// ```
/// use r3bl_term_controller::{BindingTable, Binding, Command};
///
/// let bindings = BindingTable::new()
///     .bind("ctrl_c", "quit")
///     .bind_chord("ctrl_x", BindingTable::new().bind("ctrl_s", "save"));
///
/// assert_eq!(bindings.get("ctrl_c"), Some(&Binding::Leaf(Command::new("quit"))));
/// assert!(matches!(bindings.get("ctrl_x"), Some(Binding::Chord(_))));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTable {
    entries: HashMap<KeySymbol, Binding>,
}

impl BindingTable {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Bind `symbol` to a command with no arguments.
    #[must_use]
    pub fn bind(self, symbol: impl Into<KeySymbol>, name: impl Into<CommandName>) -> Self {
        self.bind_command(symbol, Command::new(name))
    }

    #[must_use]
    pub fn bind_command(mut self, symbol: impl Into<KeySymbol>, command: Command) -> Self {
        self.entries.insert(symbol.into(), Binding::Leaf(command));
        self
    }

    #[must_use]
    pub fn bind_chord(mut self, symbol: impl Into<KeySymbol>, table: BindingTable) -> Self {
        self.entries.insert(symbol.into(), Binding::Chord(table));
        self
    }

    pub fn insert(&mut self, symbol: impl Into<KeySymbol>, binding: Binding) -> Option<Binding> {
        self.entries.insert(symbol.into(), binding)
    }

    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&Binding> { self.entries.get(symbol) }

    /// Walk the chord prefix from this table. Returns [`None`] if any step is missing or
    /// is a [`Binding::Leaf`], which happens when the table was swapped mid chord.
    #[must_use]
    pub fn chord_table(&self, prefix: &[KeySymbol]) -> Option<&BindingTable> {
        prefix.iter().try_fold(self, |table, symbol| match table.get(symbol.as_str()) {
            Some(Binding::Chord(nested)) => Some(nested),
            Some(Binding::Leaf(_)) | None => None,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

/// Handle to the binding table in effect, shared by the owner (who may swap it at any
/// time) and the reader thread (which snapshots it on every lookup).
#[derive(Debug, Clone, Default)]
pub struct SharedBindings {
    inner: Arc<StdMutex<Arc<BindingTable>>>,
}

impl SharedBindings {
    #[must_use]
    pub fn new(table: BindingTable) -> Self {
        Self {
            inner: Arc::new(StdMutex::new(Arc::new(table))),
        }
    }

    /// The table in effect right now. Never cache this across lookups.
    #[must_use]
    pub fn snapshot(&self) -> Arc<BindingTable> { Arc::clone(&lock_or_recover(&self.inner)) }

    /// Swap in a new table, returning the previous one.
    pub fn replace(&self, table: impl Into<Arc<BindingTable>>) -> Arc<BindingTable> {
        std::mem::replace(&mut *lock_or_recover(&self.inner), table.into())
    }
}
