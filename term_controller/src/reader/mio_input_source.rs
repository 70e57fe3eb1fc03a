// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words EINTR kqueue epoll

//! [`InputSource`] backed by [`mio::Poll`], watching three sources at once:
//!
//! | Token | Source                              | Becomes                          |
//! | :---- | :---------------------------------- | :------------------------------- |
//! | `0`   | terminal fd                         | [`Readiness::Input`]             |
//! | `1`   | `signal_hook_mio` [`Signals`]       | [`Readiness::Signal`] per signal |
//! | `2`   | [`mio::Waker`]                      | [`Readiness::Woken`]             |
//!
//! mio registrations are edge triggered, so the reader must drain the terminal until
//! [`ReadOutcome::WouldBlock`] each time it reads.
//!
//! signal-hook never uninstalls its low level handlers. So that `SIGINT`, `SIGTERM`,
//! `SIGHUP` and `SIGQUIT` end the process again once every source is dropped, each of
//! them also carries a conditional default action that is armed while no source is
//! alive.

use crate::{DEBUG_TERM_CONTROLLER, InputSource, InputWaker, ReadOutcome, Readiness,
            StdMutex, TermControllerError, TerminalSignal, lock_or_recover};
use mio::{Events, Interest, Poll, Token, Waker, unix::SourceFd};
use signal_hook_mio::v1_0::Signals;
use std::{fs::File,
          io::{self, ErrorKind, Read as _},
          os::fd::AsRawFd as _,
          sync::{Arc,
                 atomic::{AtomicBool, Ordering}}};

const EVENTS_CAPACITY: usize = 8;

/// Process wide count of live [`MioInputSource`]s.
struct LiveSources {
    count: usize,
    /// `true` while `count` is zero. [`None`] until the first source registers the
    /// conditional default actions.
    idle: Option<Arc<AtomicBool>>,
}

static LIVE_SOURCES: StdMutex<LiveSources> = StdMutex::new(LiveSources {
    count: 0,
    idle: None,
});

/// Disarm the default action of the termination signals for a new source.
fn acquire_termination_signals() -> Result<(), TermControllerError> {
    let mut live = lock_or_recover(&LIVE_SOURCES);
    let idle = match &live.idle {
        Some(idle) => Arc::clone(idle),
        None => {
            let idle = Arc::new(AtomicBool::new(true));
            for raw in TerminalSignal::TERMINATION_RAW {
                signal_hook::flag::register_conditional_default(raw, Arc::clone(&idle))
                    .map_err(TermControllerError::SignalRegistration)?;
            }
            live.idle = Some(Arc::clone(&idle));
            idle
        }
    };
    live.count += 1;
    idle.store(false, Ordering::SeqCst);
    Ok(())
}

/// Re-arm the default action once the last source is gone.
fn release_termination_signals() {
    let mut live = lock_or_recover(&LIVE_SOURCES);
    live.count = live.count.saturating_sub(1);
    if live.count == 0
        && let Some(idle) = &live.idle
    {
        idle.store(true, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKindReady {
    Terminal,
    Signals,
    Waker,
    Unknown,
}

impl SourceKindReady {
    #[must_use]
    pub const fn to_token(self) -> Token {
        match self {
            Self::Terminal => Token(0),
            Self::Signals => Token(1),
            Self::Waker => Token(2),
            Self::Unknown => Token(usize::MAX),
        }
    }

    #[must_use]
    pub const fn from_token(token: Token) -> Self {
        match token.0 {
            0 => Self::Terminal,
            1 => Self::Signals,
            2 => Self::Waker,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug)]
pub struct MioPollWaker(Waker);

impl InputWaker for MioPollWaker {
    fn wake(&self) {
        if let Err(err) = self.0.wake() {
            tracing::warn!(message = "Failed to wake the reader thread.", error = ?err);
        }
    }
}

#[allow(missing_debug_implementations)]
pub struct MioInputSource {
    poll_handle: Poll,
    ready_events_buffer: Events,
    terminal: File,
    signals: Signals,
    waker: Arc<MioPollWaker>,
}

impl MioInputSource {
    /// Register `terminal` (a handle to the controlling tty), the signals in
    /// [`TerminalSignal::ALL_RAW`], and a waker with a new [`Poll`].
    ///
    /// # Errors
    ///
    /// If the poller can't be created or the signal handlers can't be installed.
    pub fn try_new(terminal: &File) -> Result<Self, TermControllerError> {
        let poll_handle = Poll::new().map_err(TermControllerError::PollerCreation)?;
        let mio_registry = poll_handle.registry();

        let terminal = terminal.try_clone().map_err(TermControllerError::TerminalUnavailable)?;
        mio_registry
            .register(
                &mut SourceFd(&terminal.as_raw_fd()),
                SourceKindReady::Terminal.to_token(),
                Interest::READABLE,
            )
            .map_err(TermControllerError::PollerCreation)?;

        let waker = Waker::new(mio_registry, SourceKindReady::Waker.to_token())
            .map_err(TermControllerError::PollerCreation)?;

        let mut signals = Signals::new(TerminalSignal::ALL_RAW)
            .map_err(TermControllerError::SignalRegistration)?;
        let registered = mio_registry
            .register(
                &mut signals,
                SourceKindReady::Signals.to_token(),
                Interest::READABLE,
            )
            .map_err(TermControllerError::SignalRegistration)
            .and_then(|()| acquire_termination_signals());
        if let Err(err) = registered {
            return Err(err);
        }

        DEBUG_TERM_CONTROLLER.then(|| {
            tracing::debug!(message = "Input poller registered.");
        });

        Ok(Self {
            poll_handle,
            ready_events_buffer: Events::with_capacity(EVENTS_CAPACITY),
            terminal,
            signals,
            waker: Arc::new(MioPollWaker(waker)),
        })
    }
}

impl Drop for MioInputSource {
    fn drop(&mut self) {
        release_termination_signals();
        DEBUG_TERM_CONTROLLER.then(|| {
            tracing::debug!(message = "Input poller dropped, signal defaults re-armed.");
        });
    }
}

impl InputSource for MioInputSource {
    fn wait_ready(&mut self) -> io::Result<Vec<Readiness>> {
        if let Err(err) = self.poll_handle.poll(&mut self.ready_events_buffer, None) {
            return match err.kind() {
                ErrorKind::Interrupted => Ok(vec![]),
                _ => Err(err),
            };
        }

        let mut ready = Vec::new();
        let tokens: Vec<Token> =
            self.ready_events_buffer.iter().map(mio::event::Event::token).collect();
        for token in tokens {
            match SourceKindReady::from_token(token) {
                SourceKindReady::Terminal => ready.push(Readiness::Input),
                SourceKindReady::Signals => ready.extend(
                    self.signals
                        .pending()
                        .filter_map(TerminalSignal::from_raw)
                        .map(Readiness::Signal),
                ),
                SourceKindReady::Waker => ready.push(Readiness::Woken),
                SourceKindReady::Unknown => {
                    DEBUG_TERM_CONTROLLER.then(|| {
                        tracing::warn!(message = "Unknown poll token.", token = ?token);
                    });
                }
            }
        }
        Ok(ready)
    }

    fn read_available(&mut self, buffer: &mut [u8]) -> ReadOutcome {
        match self.terminal.read(buffer) {
            Ok(0) => ReadOutcome::Eof,
            Ok(n) => ReadOutcome::Data(n),
            Err(err) => match err.kind() {
                ErrorKind::WouldBlock => ReadOutcome::WouldBlock,
                ErrorKind::Interrupted => ReadOutcome::Interrupted,
                kind => ReadOutcome::Error(kind),
            },
        }
    }

    fn waker(&self) -> Arc<dyn InputWaker> { self.waker.clone() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use std::{io::Write as _,
              os::{fd::OwnedFd,
                   unix::{net::UnixStream, process::ExitStatusExt as _}},
              process::Command};

    const CHILD_ENV_VAR: &str = "R3BL_TERM_CONTROLLER_SIGNAL_CHILD";

    /// A socket pair standing in for the terminal: write to the stream, read from
    /// the file.
    fn fake_terminal() -> (File, UnixStream) {
        let (reader, writer) = UnixStream::pair().unwrap();
        reader.set_nonblocking(true).unwrap();
        (File::from(OwnedFd::from(reader)), writer)
    }

    /// Blocks until `predicate` matches something returned by `wait_ready`.
    fn wait_for(source: &mut MioInputSource, predicate: impl Fn(&Readiness) -> bool) {
        for _ in 0..16 {
            if source.wait_ready().unwrap().iter().any(&predicate) {
                return;
            }
        }
        panic!("readiness never arrived");
    }

    #[test]
    fn test_token_mapping() {
        for kind in [
            SourceKindReady::Terminal,
            SourceKindReady::Signals,
            SourceKindReady::Waker,
        ] {
            assert_eq!(SourceKindReady::from_token(kind.to_token()), kind);
        }
        assert_eq!(SourceKindReady::from_token(Token(42)), SourceKindReady::Unknown);
    }

    // Signal handlers are process wide.
    #[test]
    #[serial]
    fn test_input_is_readable_until_would_block() {
        let (terminal, mut writer) = fake_terminal();
        let mut source = MioInputSource::try_new(&terminal).unwrap();

        writer.write_all(b"ab").unwrap();
        wait_for(&mut source, |it| *it == Readiness::Input);

        let mut buffer = [0u8; 8];
        assert_eq!(source.read_available(&mut buffer), ReadOutcome::Data(2));
        assert_eq!(&buffer[..2], b"ab");
        assert_eq!(source.read_available(&mut buffer), ReadOutcome::WouldBlock);

        drop(writer);
        assert_eq!(source.read_available(&mut buffer), ReadOutcome::Eof);
    }

    #[test]
    #[serial]
    fn test_waker_and_signals_wake_the_poll() {
        let (terminal, _writer) = fake_terminal();
        let mut source = MioInputSource::try_new(&terminal).unwrap();

        source.waker().wake();
        wait_for(&mut source, |it| *it == Readiness::Woken);

        signal_hook::low_level::raise(signal_hook::consts::SIGWINCH).unwrap();
        wait_for(&mut source, |it| {
            *it == Readiness::Signal(TerminalSignal::Resize)
        });
    }

    /// Runs twice: as the test, it re-runs itself in a child process with
    /// [`CHILD_ENV_VAR`] set. The child creates and drops a source, then raises
    /// `SIGHUP`, which must kill it.
    #[test]
    #[serial]
    fn test_termination_signal_default_returns_after_drop() {
        if std::env::var(CHILD_ENV_VAR).is_ok() {
            let (terminal, _writer) = fake_terminal();
            drop(MioInputSource::try_new(&terminal).unwrap());
            signal_hook::low_level::raise(signal_hook::consts::SIGHUP).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(500));
            // Only reached if SIGHUP was swallowed.
            std::process::exit(0);
        }

        let status = Command::new(std::env::current_exe().unwrap())
            .args([
                "--exact",
                "reader::mio_input_source::tests::test_termination_signal_default_returns_after_drop",
                "--nocapture",
                "--test-threads=1",
            ])
            .env(CHILD_ENV_VAR, "1")
            .status()
            .unwrap();

        assert_eq!(status.signal(), Some(signal_hook::consts::SIGHUP));
    }

    #[test]
    #[serial]
    fn test_termination_signal_is_caught_while_alive() {
        let (terminal, _writer) = fake_terminal();
        let mut source = MioInputSource::try_new(&terminal).unwrap();

        signal_hook::low_level::raise(signal_hook::consts::SIGHUP).unwrap();
        wait_for(&mut source, |it| {
            *it == Readiness::Signal(TerminalSignal::Hangup)
        });
    }
}
