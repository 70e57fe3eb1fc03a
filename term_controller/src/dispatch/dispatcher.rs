// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::BoxedTarget;
use crate::{Command, DEBUG_TERM_CONTROLLER, SafeDiagnostics, lock_or_recover};

/// What happened to a dispatched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Invoked,
    /// The active target doesn't respond to the command. Recorded in diagnostics.
    Unbound,
    NoTarget,
}

/// Sends commands to the active target. Lives on the consumer side only.
///
/// Targets form a stack: [`Dispatcher::push_target`] makes a new target active (eg: a
/// modal prompt), and [`Dispatcher::pop_target`] brings the previous one back. A
/// stack entry may be [`None`], which swallows every command.
pub struct Dispatcher {
    active: Option<BoxedTarget>,
    stack: Vec<Option<BoxedTarget>>,
    diagnostics: SafeDiagnostics,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("has_active_target", &self.active.is_some())
            .field("stack_depth", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new(target: Option<BoxedTarget>, diagnostics: SafeDiagnostics) -> Self {
        Self {
            active: target,
            stack: Vec::new(),
            diagnostics,
        }
    }

    pub fn dispatch(&mut self, command: &Command) -> DispatchOutcome {
        let Some(target) = self.active.as_mut() else {
            return DispatchOutcome::NoTarget;
        };
        if target.responds_to(command.name()) {
            target.invoke(command);
            DispatchOutcome::Invoked
        } else {
            DEBUG_TERM_CONTROLLER.then(|| {
                // % is Display, ? is Debug.
                tracing::debug!(message = "Target doesn't handle command.", command = %command);
            });
            lock_or_recover(&self.diagnostics).record_unbound(command.name().as_str());
            DispatchOutcome::Unbound
        }
    }

    /// Make `target` active, saving the current one.
    pub fn push_target(&mut self, target: Option<BoxedTarget>) {
        let previous = std::mem::replace(&mut self.active, target);
        self.stack.push(previous);
    }

    /// Restore the previously active target, returning the one that was active. With an
    /// empty stack this is a no-op that returns [`None`]: the base target given to
    /// [`Dispatcher::new`] stays active, it is never cleared by an unbalanced pop.
    pub fn pop_target(&mut self) -> Option<BoxedTarget> {
        let previous = self.stack.pop()?;
        std::mem::replace(&mut self.active, previous)
    }

    #[must_use]
    pub fn has_target(&self) -> bool { self.active.is_some() }

    #[must_use]
    pub fn stack_depth(&self) -> usize { self.stack.len() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Diagnostics, snapshot_diagnostics, test_fixtures::RecordingTarget};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dispatch_to_target() {
        let (target, log) = RecordingTarget::new(["quit"]);
        let mut dispatcher = Dispatcher::new(Some(Box::new(target)), Diagnostics::new_safe());
        assert_eq!(dispatcher.dispatch(&Command::new("quit")), DispatchOutcome::Invoked);
        assert_eq!(log.names(), vec!["quit"]);
    }

    #[test]
    fn test_unbound_is_recorded_not_invoked() {
        let (target, log) = RecordingTarget::new(["quit"]);
        let diagnostics = Diagnostics::new_safe();
        let mut dispatcher = Dispatcher::new(Some(Box::new(target)), diagnostics.clone());

        assert_eq!(dispatcher.dispatch(&Command::new("f5")), DispatchOutcome::Unbound);
        assert!(log.names().is_empty());
        assert_eq!(snapshot_diagnostics(&diagnostics).last_unbound(), Some("Unbound: f5"));
    }

    #[test]
    fn test_no_target_is_noop() {
        let mut dispatcher = Dispatcher::new(None, Diagnostics::new_safe());
        assert_eq!(dispatcher.dispatch(&Command::new("quit")), DispatchOutcome::NoTarget);
    }

    #[test]
    fn test_push_and_pop_target() {
        let (first, first_log) = RecordingTarget::new(["quit"]);
        let (second, second_log) = RecordingTarget::new(["quit"]);
        let mut dispatcher = Dispatcher::new(Some(Box::new(first)), Diagnostics::new_safe());

        dispatcher.push_target(Some(Box::new(second)));
        dispatcher.dispatch(&Command::new("quit"));
        assert_eq!(second_log.names(), vec!["quit"]);
        assert!(first_log.names().is_empty());

        let popped = dispatcher.pop_target();
        assert!(popped.is_some());
        dispatcher.dispatch(&Command::new("quit"));
        assert_eq!(first_log.names(), vec!["quit"]);
        assert_eq!(second_log.names().len(), 1);
        assert_eq!(dispatcher.stack_depth(), 0);
    }

    #[test]
    fn test_empty_target_swallows_commands() {
        let (target, log) = RecordingTarget::new(["quit"]);
        let mut dispatcher = Dispatcher::new(Some(Box::new(target)), Diagnostics::new_safe());
        dispatcher.push_target(None);
        assert_eq!(dispatcher.dispatch(&Command::new("quit")), DispatchOutcome::NoTarget);
        assert!(dispatcher.pop_target().is_none());
        assert!(dispatcher.has_target());
        assert!(log.names().is_empty());
    }

    #[test]
    fn test_pop_with_empty_stack_keeps_base_target() {
        let (target, _) = RecordingTarget::new(["quit"]);
        let mut dispatcher = Dispatcher::new(Some(Box::new(target)), Diagnostics::new_safe());
        assert!(dispatcher.pop_target().is_none());
        assert!(dispatcher.has_target());
    }
}
