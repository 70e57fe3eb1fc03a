// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{StdMutex, lock_or_recover};
use std::sync::Arc;

/// Human readable record of recent input, eg: for a status line. Nothing in the
/// controller depends on these strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Chord steps plus the resolved command, eg: `ctrl x + ctrl s (save)`.
    last_command: Option<String>,
    /// Eg: `Unbound: f5`.
    last_unbound: Option<String>,
    unbound_count: u64,
}

pub type SafeDiagnostics = Arc<StdMutex<Diagnostics>>;

impl Diagnostics {
    #[must_use]
    pub fn new_safe() -> SafeDiagnostics { Arc::new(StdMutex::new(Diagnostics::default())) }

    pub fn record_command(&mut self, label: String) { self.last_command = Some(label); }

    /// Records an unbound key or command. It also becomes the last command label, so
    /// a status line shows it right away.
    pub fn record_unbound(&mut self, name: &str) {
        let label = format!("Unbound: {name}");
        self.last_command = Some(label.clone());
        self.last_unbound = Some(label);
        self.unbound_count += 1;
    }

    #[must_use]
    pub fn last_command(&self) -> Option<&str> { self.last_command.as_deref() }

    #[must_use]
    pub fn last_unbound(&self) -> Option<&str> { self.last_unbound.as_deref() }

    #[must_use]
    pub fn unbound_count(&self) -> u64 { self.unbound_count }
}

/// Copy of the current diagnostics, so the lock isn't held by the caller.
#[must_use]
pub fn snapshot_diagnostics(diagnostics: &SafeDiagnostics) -> Diagnostics {
    lock_or_recover(diagnostics).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_unbound() {
        let safe = Diagnostics::new_safe();
        lock_or_recover(&safe).record_command("ctrl c (quit)".to_string());
        lock_or_recover(&safe).record_unbound("f5");

        let it = snapshot_diagnostics(&safe);
        assert_eq!(it.last_unbound(), Some("Unbound: f5"));
        assert_eq!(it.last_command(), Some("Unbound: f5"));
        assert_eq!(it.unbound_count(), 1);
    }
}
