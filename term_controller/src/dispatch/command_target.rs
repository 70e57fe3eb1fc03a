// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Command, CommandName};

/// Object whose named capabilities resolved commands are dispatched to.
///
/// ```
/// use r3bl_term_controller::{Command, CommandName, CommandTarget};
///
/// #[derive(Default)]
/// struct Counter { count: i64 }
///
/// impl CommandTarget for Counter {
///     fn responds_to(&self, name: &CommandName) -> bool { name.as_str() == "increment" }
///     fn invoke(&mut self, _command: &Command) { self.count += 1; }
/// }
///
/// let mut counter = Counter::default();
/// assert!(counter.responds_to(&CommandName::new("increment")));
/// counter.invoke(&Command::new("increment"));
/// assert_eq!(counter.count, 1);
/// ```
pub trait CommandTarget {
    /// Capability check. Must not have side effects.
    fn responds_to(&self, name: &CommandName) -> bool;

    /// Only called after [`CommandTarget::responds_to`] returned `true` for
    /// `command.name()`.
    fn invoke(&mut self, command: &Command);
}

pub type BoxedTarget = Box<dyn CommandTarget + Send>;
