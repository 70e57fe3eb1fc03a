// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{DoubleClickState, SafeDiagnostics, SymbolSource};
use crate::{Binding, Command, CommandName, DEBUG_TERM_CONTROLLER, Decoded, KeySymbol,
            SharedBindings, TermControllerConfig, lock_or_recover, symbols};
use std::time::Instant;

/// Outcome of feeding one decoded unit to the [`CommandResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Command(Command),
    /// The unit named a nested table. The next unit continues the chord.
    ChordPending,
    /// A symbol with no binding and no default arguments. Recorded in diagnostics.
    Unbound(KeySymbol),
}

/// Resolves decoded keys and mouse events into [`Command`]s.
///
/// Lookup order for each unit:
/// 1. `mouse_up` becomes `mouse_click` or `mouse_doubleclick`.
/// 2. The chord prefix (symbols already consumed) is walked from the root of the table
///    in effect right now. If the table was swapped and the prefix no longer names a
///    chord, the prefix is dropped.
/// 3. [`Binding::Leaf`] resolves, [`Binding::Chord`] extends the prefix, and a missing
///    entry falls back to the literal command, the symbol's default arguments, or
///    unbound, in that order.
#[derive(Debug)]
pub struct CommandResolver {
    bindings: SharedBindings,
    chord_prefix: Vec<KeySymbol>,
    double_click: DoubleClickState,
    literal_command: CommandName,
    diagnostics: SafeDiagnostics,
}

impl CommandResolver {
    #[must_use]
    pub fn new(
        bindings: SharedBindings,
        config: &TermControllerConfig,
        diagnostics: SafeDiagnostics,
    ) -> Self {
        Self {
            bindings,
            chord_prefix: Vec::new(),
            double_click: DoubleClickState::new(config.double_click_interval),
            literal_command: config.literal_command.clone(),
            diagnostics,
        }
    }

    /// Pull units from `source` until one command resolves. Returns [`None`] when the
    /// source runs dry (a partial chord is kept for the next call) or a key is unbound.
    pub fn resolve(&mut self, source: &mut impl SymbolSource) -> Option<Command> {
        loop {
            let decoded = source.next_decoded()?;
            match self.feed(decoded, Instant::now()) {
                Resolution::Command(command) => return Some(command),
                Resolution::ChordPending => {}
                Resolution::Unbound(_) => return None,
            }
        }
    }

    /// Resolve a single unit received at `now`.
    pub fn feed(&mut self, decoded: Decoded, now: Instant) -> Resolution {
        let decoded = match decoded {
            Decoded::Symbol { symbol, args } if symbol == symbols::MOUSE_UP => {
                Decoded::symbol_with_args(self.double_click.classify_mouse_up(now), args)
            }
            other => other,
        };

        let table = self.bindings.snapshot();
        let current = match table.chord_table(&self.chord_prefix) {
            Some(current) => current,
            None => {
                self.chord_prefix.clear();
                &table
            }
        };

        let key = decoded.lookup_key();
        let resolution = match current.get(key) {
            Some(Binding::Leaf(command)) => Resolution::Command(command.clone()),
            Some(Binding::Chord(_)) => {
                self.chord_prefix.push(KeySymbol::new(key));
                return Resolution::ChordPending;
            }
            None => match &decoded {
                Decoded::Literal(text) => {
                    let command = Command::insert_char(&self.literal_command, text.as_str());
                    Resolution::Command(command)
                }
                Decoded::Symbol { symbol, args } if !args.is_empty() => {
                    Resolution::Command(Command::from_symbol(symbol, args.clone()))
                }
                Decoded::Symbol { symbol, .. } => Resolution::Unbound(symbol.clone()),
            },
        };

        let label = self.chord_label(key);
        self.chord_prefix.clear();

        match &resolution {
            Resolution::Command(command) => {
                DEBUG_TERM_CONTROLLER.then(|| {
                    // % is Display, ? is Debug.
                    tracing::debug!(
                        message = "Resolved command.",
                        keys = %label,
                        command = %command
                    );
                });
                lock_or_recover(&self.diagnostics)
                    .record_command(format!("{label} ({})", command.name()));
            }
            Resolution::Unbound(_) => {
                DEBUG_TERM_CONTROLLER.then(|| {
                    tracing::debug!(message = "Unbound key.", keys = %label);
                });
                lock_or_recover(&self.diagnostics).record_unbound(&label);
            }
            Resolution::ChordPending => {}
        }

        resolution
    }

    /// Symbols consumed so far in the current chord.
    #[must_use]
    pub fn chord_prefix(&self) -> &[KeySymbol] { &self.chord_prefix }

    /// Eg: `ctrl x + ctrl s`.
    fn chord_label(&self, last_key: &str) -> String {
        self.chord_prefix
            .iter()
            .map(KeySymbol::label)
            .chain(std::iter::once(KeySymbol::new(last_key).label()))
            .collect::<Vec<_>>()
            .join(" + ")
    }
}
