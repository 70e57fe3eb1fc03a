// Copyright (c) 2023-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Control flow signal for loops and threads.
///
/// Used by the [`ReaderTask`] loop and its signal handlers to indicate whether the
/// dedicated reader thread should keep running.
///
/// [`ReaderTask`]: crate::ReaderTask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Continuation {
    /// Continue to the next iteration.
    #[default]
    Continue,

    /// Stop processing and exit the loop/thread.
    Stop,
}

impl Continuation {
    #[must_use]
    pub fn is_stop(self) -> bool { self == Continuation::Stop }
}
