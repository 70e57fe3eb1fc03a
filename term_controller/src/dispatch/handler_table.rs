// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::CommandTarget;
use crate::{Command, CommandArg, CommandName};
use std::collections::HashMap;

pub type CommandHandler<S> = fn(&mut S, &[CommandArg]);

/// A [`CommandTarget`] built from an explicit `name → fn` table over some state `S`.
///
/// ```
/// use r3bl_term_controller::{Command, CommandArg, CommandTarget, HandlerTable};
///
/// #[derive(Default)]
/// struct Editor { text: String, quit: bool }
///
/// let mut target = HandlerTable::new(Editor::default())
///     .on("insert_char", |editor, args| {
///         if let Some(text) = args.first().and_then(CommandArg::as_text) {
///             editor.text.push_str(text);
///         }
///     })
///     .on("quit", |editor, _| editor.quit = true);
///
/// target.invoke(&Command::with_args("insert_char", [CommandArg::from("x")]));
/// assert_eq!(target.state().text, "x");
/// ```
pub struct HandlerTable<S> {
    state: S,
    handlers: HashMap<CommandName, CommandHandler<S>>,
}

impl<S: std::fmt::Debug> std::fmt::Debug for HandlerTable<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().map(CommandName::as_str).collect();
        names.sort_unstable();
        f.debug_struct("HandlerTable")
            .field("state", &self.state)
            .field("handlers", &names)
            .finish()
    }
}

impl<S> HandlerTable<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            handlers: HashMap::new(),
        }
    }

    #[must_use]
    pub fn on(mut self, name: impl Into<CommandName>, handler: CommandHandler<S>) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    pub fn state(&self) -> &S { &self.state }

    pub fn state_mut(&mut self) -> &mut S { &mut self.state }

    pub fn into_state(self) -> S { self.state }
}

impl<S> CommandTarget for HandlerTable<S> {
    fn responds_to(&self, name: &CommandName) -> bool { self.handlers.contains_key(name) }

    fn invoke(&mut self, command: &Command) {
        if let Some(handler) = self.handlers.get(command.name()) {
            handler(&mut self.state, command.args());
        }
    }
}
