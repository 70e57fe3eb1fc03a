// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words EINTR

use crate::{Command, CommandResolver, Continuation, DEBUG_TERM_CONTROLLER, DecodeBuffer,
            InputQueueSender, InputSource, Mode, RawBytesSender, ReadOutcome, Readiness,
            SafeModeController, TermControllerConfig, TermControllerError, TerminalSignal};
use std::{sync::Arc, thread::JoinHandle};

/// Called for a termination signal after the terminal has been restored. The default
/// re-raises the signal with its default action, which ends the process.
pub type TerminationHandler = Box<dyn FnMut(TerminalSignal) + Send>;

#[must_use]
pub fn default_termination_handler() -> TerminationHandler {
    Box::new(|signal| {
        #[cfg(unix)]
        if let Err(err) = signal_hook::low_level::emulate_default_handler(signal.to_raw()) {
            tracing::warn!(
                message = "Failed to re-raise termination signal.",
                signal = %signal,
                error = ?err
            );
        }
        #[cfg(not(unix))]
        {
            tracing::warn!(message = "Terminating.", signal = %signal);
            std::process::exit(1);
        }
    })
}

/// Where the reader thread delivers its output.
#[derive(Debug, Clone)]
pub struct ReaderSinks {
    pub commands: InputQueueSender,
    pub raw_bytes: RawBytesSender,
}

/// The body of the dedicated reader thread.
///
/// Each cycle blocks in [`InputSource::wait_ready`] without holding any lock, handles
/// signals, then takes the mode mutex and, unless paused, drains the terminal:
/// - [`Mode::Cooked`]: decode, resolve, and enqueue each command.
/// - [`Mode::Raw`]: forward the bytes verbatim to the raw byte channel.
///
/// Since the mutex is held from the mode check until the last command is enqueued, a
/// [`crate::ModeController::pause`] on another thread waits for the cycle to finish,
/// and no byte is consumed after the pause starts.
#[allow(missing_debug_implementations)]
pub struct ReaderTask {
    mode_controller: SafeModeController,
    source: Box<dyn InputSource>,
    decode_buffer: DecodeBuffer,
    resolver: CommandResolver,
    sinks: ReaderSinks,
    read_buffer: Vec<u8>,
    termination_handler: TerminationHandler,
    /// `SIGCONT` received inside a pause block, delivered once reading resumes.
    resume_deferred: bool,
    /// `SIGWINCH` received while paused, delivered once reading resumes.
    resize_deferred: bool,
    eof_logged: bool,
}

impl ReaderTask {
    #[must_use]
    pub fn new(
        mode_controller: SafeModeController,
        source: Box<dyn InputSource>,
        decode_buffer: DecodeBuffer,
        resolver: CommandResolver,
        sinks: ReaderSinks,
        config: &TermControllerConfig,
    ) -> Self {
        Self {
            mode_controller,
            source,
            decode_buffer,
            resolver,
            sinks,
            read_buffer: vec![0; config.read_buffer_size.max(1)],
            termination_handler: default_termination_handler(),
            resume_deferred: false,
            resize_deferred: false,
            eof_logged: false,
        }
    }

    #[must_use]
    pub fn with_termination_handler(mut self, handler: TerminationHandler) -> Self {
        self.termination_handler = handler;
        self
    }

    /// # Errors
    ///
    /// [`TermControllerError::ReaderThreadSpawn`] if the OS refuses a new thread.
    pub fn spawn(self, thread_name: &str) -> Result<JoinHandle<()>, TermControllerError> {
        std::thread::Builder::new()
            .name(thread_name.to_string())
            .spawn(move || self.run())
            .map_err(TermControllerError::ReaderThreadSpawn)
    }

    /// Loop until shutdown is requested or the poll fails.
    pub fn run(mut self) {
        DEBUG_TERM_CONTROLLER.then(|| {
            tracing::debug!(message = "Reader thread started.");
        });
        while !self.run_once().is_stop() {}
        DEBUG_TERM_CONTROLLER.then(|| {
            tracing::debug!(message = "Reader thread exiting.");
        });
    }

    /// One wait + handle cycle.
    pub fn run_once(&mut self) -> Continuation {
        let ready = match self.source.wait_ready() {
            Ok(ready) => ready,
            Err(err) => {
                tracing::warn!(message = "Input poll failed, reader thread exiting.", error = ?err);
                return Continuation::Stop;
            }
        };

        for readiness in ready {
            if let Readiness::Signal(signal) = readiness
                && self.handle_signal(signal).is_stop()
            {
                return Continuation::Stop;
            }
        }

        // Input and wake ups both lead here. Draining on every wake up also picks up
        // bytes that arrived while paused, whose edge has already been consumed.
        self.consume_input()
    }

    fn handle_signal(&mut self, signal: TerminalSignal) -> Continuation {
        DEBUG_TERM_CONTROLLER.then(|| {
            // % is Display, ? is Debug.
            tracing::debug!(message = "Signal received.", signal = %signal);
        });
        match signal {
            TerminalSignal::Resize => {
                if self.mode_controller.mode() == Mode::Paused {
                    self.resize_deferred = true;
                    Continuation::Continue
                } else {
                    self.push(Command::resize())
                }
            }
            TerminalSignal::Continue => {
                if self.mode_controller.resume() {
                    self.push(Command::resume())
                } else {
                    self.resume_deferred = true;
                    Continuation::Continue
                }
            }
            TerminalSignal::Interrupt if self.mode_controller.note_interrupt() => {
                Continuation::Continue
            }
            TerminalSignal::Interrupt
            | TerminalSignal::Terminate
            | TerminalSignal::Hangup
            | TerminalSignal::Quit => {
                self.mode_controller.cleanup();
                (self.termination_handler)(signal);
                Continuation::Continue
            }
        }
    }

    fn consume_input(&mut self) -> Continuation {
        let mode_controller = Arc::clone(&self.mode_controller);
        let state = mode_controller.lock();

        if state.is_shutdown_requested() {
            return Continuation::Stop;
        }
        let mode = state.mode();
        let forward_verbatim = match mode {
            Mode::Paused => return Continuation::Continue,
            Mode::Raw => true,
            Mode::Cooked => false,
        };
        for (deferred, command) in [
            (std::mem::take(&mut self.resume_deferred), Command::resume()),
            (std::mem::take(&mut self.resize_deferred), Command::resize()),
        ] {
            if deferred && self.push(command).is_stop() {
                return Continuation::Stop;
            }
        }

        loop {
            match self.source.read_available(&mut self.read_buffer) {
                ReadOutcome::Data(count) => {
                    DEBUG_TERM_CONTROLLER.then(|| {
                        tracing::debug!(message = "Read bytes.", count = count, mode = %mode);
                    });
                    let more_expected = count == self.read_buffer.len();
                    let continuation = if forward_verbatim {
                        self.forward_raw(count)
                    } else {
                        self.decode_buffer
                            .append(&self.read_buffer[..count], more_expected);
                        self.resolve_pending()
                    };
                    if continuation.is_stop() {
                        return Continuation::Stop;
                    }
                }
                ReadOutcome::WouldBlock => {
                    if !forward_verbatim {
                        self.decode_buffer.mark_input_drained();
                        return self.resolve_pending();
                    }
                    return Continuation::Continue;
                }
                ReadOutcome::Interrupted => {}
                ReadOutcome::Eof => {
                    if !std::mem::replace(&mut self.eof_logged, true) {
                        tracing::warn!(message = "Terminal input reached end of file.");
                    }
                    return Continuation::Continue;
                }
                ReadOutcome::Error(kind) => {
                    tracing::warn!(message = "Failed to read terminal input.", error = ?kind);
                    return Continuation::Continue;
                }
            }
        }
    }

    fn resolve_pending(&mut self) -> Continuation {
        while self.decode_buffer.has_decodable_input() {
            if let Some(command) = self.resolver.resolve(&mut self.decode_buffer)
                && self.push(command).is_stop()
            {
                return Continuation::Stop;
            }
        }
        Continuation::Continue
    }

    fn forward_raw(&mut self, count: usize) -> Continuation {
        // Nobody reading raw bytes right now is fine, they are simply dropped.
        drop(self.sinks.raw_bytes.send(self.read_buffer[..count].to_vec()));
        Continuation::Continue
    }

    fn push(&self, command: Command) -> Continuation {
        if self.sinks.commands.push(command) {
            Continuation::Continue
        } else {
            Continuation::Stop
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BindingTable, Diagnostics, InputQueue, ModeController, SharedBindings,
                Vt100KeyDecoder, raw_byte_channel,
                test_fixtures::{MockInputHandle, MockInputSource, MockTerminalDevice}};
    use pretty_assertions::assert_eq;

    struct Fixture {
        reader: ReaderTask,
        mode_controller: SafeModeController,
        input: MockInputHandle,
        queue: InputQueue,
    }

    fn fixture() -> Fixture {
        let config = TermControllerConfig::default();
        let (device, _ops) = MockTerminalDevice::new();
        let (source, input) = MockInputSource::new();
        let mode_controller =
            Arc::new(ModeController::new(Box::new(device), config.reporting, source.waker()));
        mode_controller.set_up(Mode::Cooked).unwrap();

        let bindings = SharedBindings::new(BindingTable::new().bind("ctrl_c", "quit"));
        let resolver = CommandResolver::new(bindings, &config, Diagnostics::new_safe());
        let queue = InputQueue::new();
        let (raw_bytes, _raw_receiver) = raw_byte_channel();
        let reader = ReaderTask::new(
            mode_controller.clone(),
            Box::new(source),
            DecodeBuffer::new(Box::new(Vt100KeyDecoder)),
            resolver,
            ReaderSinks {
                commands: queue.sender(),
                raw_bytes,
            },
            &config,
        );

        Fixture {
            reader,
            mode_controller,
            input,
            queue,
        }
    }

    fn drain_names(queue: &mut InputQueue) -> Vec<String> {
        std::iter::from_fn(|| queue.try_pop())
            .map(|it| it.name().to_string())
            .collect()
    }

    #[test]
    fn test_cooked_cycle_resolves_everything_read() {
        let mut it = fixture();
        it.input.send_bytes(b"\x03a".to_vec());

        assert_eq!(it.reader.run_once(), Continuation::Continue);
        assert_eq!(drain_names(&mut it.queue), vec!["quit", "insert_char"]);
    }

    #[test]
    fn test_paused_cycle_leaves_bytes_unread() {
        let mut it = fixture();
        it.mode_controller.transition(Mode::Paused);
        it.input.send_bytes(b"a".to_vec());
        it.input.send_signal(TerminalSignal::Resize);

        assert_eq!(it.reader.run_once(), Continuation::Continue);
        assert!(it.queue.is_empty());

        // Continuing forces cooked mode. The deferred resize follows, then the byte.
        it.input.send_signal(TerminalSignal::Continue);
        assert_eq!(it.reader.run_once(), Continuation::Continue);
        assert_eq!(drain_names(&mut it.queue), vec!["resume", "resize", "insert_char"]);
    }

    #[test]
    fn test_continue_inside_pause_holds_resume_until_reading_restarts() {
        let mut it = fixture();
        let mode_controller = it.mode_controller.clone();

        let (mode_in_block, queued_in_block) = mode_controller.pause(|| {
            it.input.send_signal(TerminalSignal::Continue);
            it.input.send_bytes(b"a".to_vec());
            assert_eq!(it.reader.run_once(), Continuation::Continue);
            (it.mode_controller.mode(), it.queue.len())
        });

        assert_eq!(mode_in_block, Mode::Paused);
        assert_eq!(queued_in_block, 0);
        assert_eq!(it.mode_controller.mode(), Mode::Cooked);

        assert_eq!(it.reader.run_once(), Continuation::Continue);
        assert_eq!(drain_names(&mut it.queue), vec!["resume", "insert_char"]);
    }

    #[test]
    fn test_shutdown_stops_the_loop() {
        let mut it = fixture();
        it.mode_controller.request_shutdown();
        assert_eq!(it.reader.run_once(), Continuation::Stop);
    }
}
