// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CommandName, KeySymbol};
use smallvec::SmallVec;
use std::fmt::{Display, Formatter};

/// Argument passed along with a [`Command`] to the target capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandArg {
    Int(i64),
    Text(String),
}

impl CommandArg {
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CommandArg::Int(it) => Some(*it),
            CommandArg::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CommandArg::Text(it) => Some(it.as_str()),
            CommandArg::Int(_) => None,
        }
    }
}

impl From<i64> for CommandArg {
    fn from(it: i64) -> Self { CommandArg::Int(it) }
}

impl From<u16> for CommandArg {
    fn from(it: u16) -> Self { CommandArg::Int(i64::from(it)) }
}

impl From<&str> for CommandArg {
    fn from(it: &str) -> Self { CommandArg::Text(it.to_string()) }
}

impl From<String> for CommandArg {
    fn from(it: String) -> Self { CommandArg::Text(it) }
}

impl Display for CommandArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandArg::Int(it) => write!(f, "{it}"),
            CommandArg::Text(it) => write!(f, "{it:?}"),
        }
    }
}

/// Mouse events carry `[button_flags, column, row]`, so 4 covers every decoded command.
pub type CommandArgs = SmallVec<[CommandArg; 4]>;

/// A resolved command: a capability name plus its arguments. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command {
    name: CommandName,
    args: CommandArgs,
}

/// Names of the commands this crate produces on its own.
pub mod command_names {
    /// Injected on terminal resize (`SIGWINCH`).
    pub const RESIZE: &str = "resize";
    /// Injected when the process continues after a job control stop (`SIGCONT`).
    pub const RESUME: &str = "resume";
    /// Default name of the literal text fallback.
    pub const INSERT_CHAR: &str = "insert_char";
}

impl Command {
    #[must_use]
    pub fn new(name: impl Into<CommandName>) -> Self {
        Self {
            name: name.into(),
            args: CommandArgs::new(),
        }
    }

    #[must_use]
    pub fn with_args(
        name: impl Into<CommandName>,
        args: impl IntoIterator<Item = CommandArg>,
    ) -> Self {
        Self {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn resize() -> Self { Self::new(command_names::RESIZE) }

    #[must_use]
    pub fn resume() -> Self { Self::new(command_names::RESUME) }

    /// Literal text fallback, eg: typing `x` with no binding for `x`.
    #[must_use]
    pub fn insert_char(name: &CommandName, text: impl Into<String>) -> Self {
        Self::with_args(name.clone(), [CommandArg::Text(text.into())])
    }

    /// Unbound key with default arguments, eg: `mouse_down [0, 10, 5]`.
    #[must_use]
    pub fn from_symbol(symbol: &KeySymbol, args: CommandArgs) -> Self {
        Self {
            name: CommandName::from(symbol),
            args,
        }
    }

    #[must_use]
    pub fn name(&self) -> &CommandName { &self.name }

    #[must_use]
    pub fn args(&self) -> &[CommandArg] { &self.args }

    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&CommandArg> { self.args.get(index) }
}

impl CommandName {
    #[must_use]
    pub fn insert_char() -> Self { Self::new(command_names::INSERT_CHAR) }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_command_accessors() {
        let command = Command::with_args("mouse_down", [0i64.into(), 10i64.into(), 5i64.into()]);
        assert_eq!(command.name(), &CommandName::new("mouse_down"));
        assert_eq!(command.args().len(), 3);
        assert_eq!(command.arg(1).and_then(CommandArg::as_int), Some(10));
        assert_eq!(command.arg(3), None);
        assert_eq!(command.to_string(), "mouse_down 0 10 5");
    }

    #[test]
    fn test_insert_char() {
        let command = Command::insert_char(&CommandName::insert_char(), "x");
        assert_eq!(command.name().as_str(), "insert_char");
        assert_eq!(command.arg(0).and_then(CommandArg::as_text), Some("x"));
        assert_eq!(command.to_string(), "insert_char \"x\"");
    }

    #[test]
    fn test_well_known_commands() {
        assert_eq!(Command::resize().name().as_str(), "resize");
        assert!(Command::resume().args().is_empty());
    }
}
