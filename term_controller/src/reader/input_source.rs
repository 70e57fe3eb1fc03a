// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::Debug, io, sync::Arc};

/// OS signals the reader thread reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TerminalSignal {
    /// `SIGWINCH`.
    Resize,
    /// `SIGCONT`, after a job control stop.
    Continue,
    /// `SIGINT`.
    Interrupt,
    /// `SIGTERM`.
    Terminate,
    /// `SIGHUP`.
    Hangup,
    /// `SIGQUIT`.
    Quit,
}

#[cfg(unix)]
impl TerminalSignal {
    pub const ALL_RAW: [i32; 6] = [
        signal_hook::consts::SIGWINCH,
        signal_hook::consts::SIGCONT,
        signal_hook::consts::SIGINT,
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGHUP,
        signal_hook::consts::SIGQUIT,
    ];

    /// The subset whose default action ends the process.
    pub const TERMINATION_RAW: [i32; 4] = [
        signal_hook::consts::SIGINT,
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGHUP,
        signal_hook::consts::SIGQUIT,
    ];

    #[must_use]
    pub fn from_raw(signal: i32) -> Option<Self> {
        use signal_hook::consts::{SIGCONT, SIGHUP, SIGINT, SIGQUIT, SIGTERM, SIGWINCH};
        match signal {
            SIGWINCH => Some(Self::Resize),
            SIGCONT => Some(Self::Continue),
            SIGINT => Some(Self::Interrupt),
            SIGTERM => Some(Self::Terminate),
            SIGHUP => Some(Self::Hangup),
            SIGQUIT => Some(Self::Quit),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_raw(self) -> i32 {
        use signal_hook::consts::{SIGCONT, SIGHUP, SIGINT, SIGQUIT, SIGTERM, SIGWINCH};
        match self {
            Self::Resize => SIGWINCH,
            Self::Continue => SIGCONT,
            Self::Interrupt => SIGINT,
            Self::Terminate => SIGTERM,
            Self::Hangup => SIGHUP,
            Self::Quit => SIGQUIT,
        }
    }
}

/// Why [`InputSource::wait_ready`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The terminal has bytes to read.
    Input,
    Signal(TerminalSignal),
    /// [`InputWaker::wake`] was called, eg: on a mode transition or shutdown.
    Woken,
}

/// Result of one non-blocking read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// This many bytes were written to the front of the buffer.
    Data(usize),
    /// Nothing more to read right now.
    WouldBlock,
    Eof,
    /// `EINTR`. Retried by the caller.
    Interrupted,
    Error(io::ErrorKind),
}

/// Unblocks a thread waiting in [`InputSource::wait_ready`]. Callable from any thread.
pub trait InputWaker: Send + Sync + Debug {
    fn wake(&self);
}

/// Raw byte source for the reader thread.
pub trait InputSource: Send {
    /// Block until input is readable, a signal arrives, or the waker fires. Returns an
    /// empty list when the wait was interrupted (`EINTR`).
    ///
    /// # Errors
    ///
    /// Any other failure of the underlying poll. The reader thread exits.
    fn wait_ready(&mut self) -> io::Result<Vec<Readiness>>;

    /// Read whatever is available without blocking.
    fn read_available(&mut self, buffer: &mut [u8]) -> ReadOutcome;

    fn waker(&self) -> Arc<dyn InputWaker>;
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_raw_signal_round_trip() {
        for raw in TerminalSignal::ALL_RAW {
            let signal = TerminalSignal::from_raw(raw).unwrap();
            assert_eq!(signal.to_raw(), raw);
        }
        assert_eq!(TerminalSignal::from_raw(signal_hook::consts::SIGUSR1), None);
        assert_eq!(TerminalSignal::Resize.to_string(), "resize");
    }
}
