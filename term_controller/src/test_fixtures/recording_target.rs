// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Command, CommandName, CommandTarget, StdMutex, lock_or_recover};
use std::{collections::HashSet, sync::Arc};

/// Commands a [`RecordingTarget`] was invoked with, readable after the target has been
/// moved into a controller.
#[derive(Debug, Clone, Default)]
pub struct InvocationLog {
    inner: Arc<StdMutex<Vec<Command>>>,
}

impl InvocationLog {
    #[must_use]
    pub fn commands(&self) -> Vec<Command> { lock_or_recover(&self.inner).clone() }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        lock_or_recover(&self.inner)
            .iter()
            .map(|it| it.name().to_string())
            .collect()
    }
}

/// [`CommandTarget`] responding to a fixed set of names and logging every invocation.
#[derive(Debug)]
pub struct RecordingTarget {
    responds: HashSet<CommandName>,
    log: InvocationLog,
}

impl RecordingTarget {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> (Self, InvocationLog) {
        let log = InvocationLog::default();
        let target = Self {
            responds: names.into_iter().map(CommandName::new).collect(),
            log: log.clone(),
        };
        (target, log)
    }
}

impl CommandTarget for RecordingTarget {
    fn responds_to(&self, name: &CommandName) -> bool { self.responds.contains(name) }

    fn invoke(&mut self, command: &Command) {
        lock_or_recover(&self.log.inner).push(command.clone());
    }
}
