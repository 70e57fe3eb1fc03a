// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{BindingTable, BoxedTarget, Command, CommandResolver, DEBUG_TERM_CONTROLLER,
            DecodeBuffer, Diagnostics, DispatchOutcome, Dispatcher, InputQueue,
            InputQueueSender, InputSource, KeyDecoder, Mode, ModeController,
            PauseInterrupt, RawBytesReceiver, ReaderSinks, ReaderTask, SafeDiagnostics,
            SafeModeController, SharedBindings, TermControllerConfig, TerminalDevice,
            TerminationHandler, Vt100KeyDecoder, default_termination_handler,
            raw_byte_channel, snapshot_diagnostics};
use std::{sync::Arc, thread::JoinHandle};

/// The collaborators a [`TermController`] talks to the outside world through.
/// [`TermController::try_new`] builds the real ones; tests pass mocks to
/// [`TermController::try_new_with`].
#[allow(missing_debug_implementations)]
pub struct TermControllerIo {
    pub device: Box<dyn TerminalDevice>,
    pub source: Box<dyn InputSource>,
    pub decoder: Box<dyn KeyDecoder>,
    pub termination_handler: TerminationHandler,
}

impl TermControllerIo {
    /// Uses [`Vt100KeyDecoder`] and [`default_termination_handler`].
    #[must_use]
    pub fn new(device: Box<dyn TerminalDevice>, source: Box<dyn InputSource>) -> Self {
        Self {
            device,
            source,
            decoder: Box::new(Vt100KeyDecoder),
            termination_handler: default_termination_handler(),
        }
    }

    #[must_use]
    pub fn with_decoder(mut self, decoder: Box<dyn KeyDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    #[must_use]
    pub fn with_termination_handler(mut self, handler: TerminationHandler) -> Self {
        self.termination_handler = handler;
        self
    }
}

/// Owning context of the terminal input controller.
///
/// Creating one puts the terminal in [`Mode::Cooked`] and starts the reader thread.
/// Dropping it stops the thread and restores the terminal. Termination signals
/// restore the terminal too, exactly once across all of these paths.
///
/// ```no_run
/// use r3bl_term_controller::{BindingTable, HandlerTable, TermController,
///                            TermControllerConfig};
///
/// # fn main() -> miette::Result<()> {
/// let target = HandlerTable::new(false).on("quit", |quit, _| *quit = true);
/// let bindings = BindingTable::new().bind("ctrl_c", "quit");
/// let mut controller = TermController::try_new(
///     TermControllerConfig::default(),
///     bindings,
///     Some(Box::new(target)),
/// )?;
///
/// while let Some(command) = controller.handle_input() {
///     if command.name().as_str() == "quit" {
///         break;
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[allow(missing_debug_implementations)]
pub struct TermController {
    mode_controller: SafeModeController,
    bindings: SharedBindings,
    queue: InputQueue,
    dispatcher: Dispatcher,
    diagnostics: SafeDiagnostics,
    raw_bytes: RawBytesReceiver,
    reader_thread: Option<JoinHandle<()>>,
}

impl TermController {
    /// Take over the controlling terminal.
    ///
    /// # Errors
    ///
    /// [`crate::TermControllerError::TerminalUnavailable`] if there is no terminal, or
    /// any error setting it up or starting the reader thread.
    #[cfg(unix)]
    pub fn try_new(
        config: TermControllerConfig,
        bindings: BindingTable,
        target: Option<BoxedTarget>,
    ) -> miette::Result<Self> {
        let terminal = crate::open_terminal()?;
        let device = crate::TtyTerminal::try_new(&terminal)?;
        let source = crate::MioInputSource::try_new(&terminal)?;
        let io = TermControllerIo::new(Box::new(device), Box::new(source));
        Self::try_new_with(config, bindings, target, io)
    }

    /// Like [`TermController::try_new`] with explicit collaborators.
    ///
    /// # Errors
    ///
    /// If the initial terminal flags can't be applied (the terminal is restored
    /// before returning) or the reader thread can't be spawned.
    pub fn try_new_with(
        config: TermControllerConfig,
        bindings: BindingTable,
        target: Option<BoxedTarget>,
        io: TermControllerIo,
    ) -> miette::Result<Self> {
        let TermControllerIo {
            device,
            source,
            decoder,
            termination_handler,
        } = io;

        let mode_controller: SafeModeController =
            Arc::new(ModeController::new(device, config.reporting, source.waker()));
        if let Err(err) = mode_controller.set_up(Mode::Cooked) {
            mode_controller.cleanup();
            return Err(err.into());
        }

        let bindings = SharedBindings::new(bindings);
        let diagnostics = Diagnostics::new_safe();
        let queue = InputQueue::new();
        let (raw_bytes_sender, raw_bytes) = raw_byte_channel();

        let resolver = CommandResolver::new(bindings.clone(), &config, diagnostics.clone());
        let reader = ReaderTask::new(
            mode_controller.clone(),
            source,
            DecodeBuffer::new(decoder),
            resolver,
            ReaderSinks {
                commands: queue.sender(),
                raw_bytes: raw_bytes_sender,
            },
            &config,
        )
        .with_termination_handler(termination_handler);

        let reader_thread = match reader.spawn(&config.reader_thread_name) {
            Ok(handle) => handle,
            Err(err) => {
                mode_controller.cleanup();
                return Err(err.into());
            }
        };

        DEBUG_TERM_CONTROLLER.then(|| {
            tracing::debug!(message = "Term controller started.", config = ?config);
        });

        Ok(Self {
            mode_controller,
            bindings,
            queue,
            dispatcher: Dispatcher::new(target, diagnostics.clone()),
            diagnostics,
            raw_bytes,
            reader_thread: Some(reader_thread),
        })
    }

    /// Block until the next command, dispatch it to the active target, and return it
    /// so the caller can act on commands the target doesn't handle.
    ///
    /// # Panics
    ///
    /// If called from inside an async runtime, use
    /// [`TermController::handle_input_async`] there.
    pub fn handle_input(&mut self) -> Option<Command> {
        let command = self.queue.pop()?;
        self.dispatcher.dispatch(&command);
        Some(command)
    }

    pub async fn handle_input_async(&mut self) -> Option<Command> {
        let command = self.queue.pop_async().await?;
        self.dispatcher.dispatch(&command);
        Some(command)
    }

    /// Non-blocking [`TermController::handle_input`].
    pub fn try_handle_input(&mut self) -> Option<Command> {
        let command = self.queue.try_pop()?;
        self.dispatcher.dispatch(&command);
        Some(command)
    }

    pub fn dispatch(&mut self, command: &Command) -> DispatchOutcome {
        self.dispatcher.dispatch(command)
    }

    /// Direct access to the queue, eg: to pop without dispatching.
    pub fn queue(&mut self) -> &mut InputQueue { &mut self.queue }

    /// Handle for pushing commands from anywhere, eg: a timer thread.
    #[must_use]
    pub fn command_sender(&self) -> InputQueueSender { self.queue.sender() }

    pub fn push_command(&self, command: Command) { self.queue.push(command); }

    /// Number of commands waiting in the queue.
    #[must_use]
    pub fn pending_commands(&self) -> usize { self.queue.len() }

    /// Swap the binding table. Takes effect on the next key, including mid chord.
    pub fn set_bindings(&self, table: BindingTable) -> Arc<BindingTable> {
        self.bindings.replace(table)
    }

    #[must_use]
    pub fn bindings(&self) -> Arc<BindingTable> { self.bindings.snapshot() }

    pub fn push_target(&mut self, target: Option<BoxedTarget>) {
        self.dispatcher.push_target(target);
    }

    pub fn pop_target(&mut self) -> Option<BoxedTarget> { self.dispatcher.pop_target() }

    #[must_use]
    pub fn mode(&self) -> Mode { self.mode_controller.mode() }

    pub fn enter_raw(&self) -> Mode { self.mode_controller.enter_raw() }

    pub fn enter_cooked(&self) -> Mode { self.mode_controller.enter_cooked() }

    /// See [`ModeController::pause`]. Use [`TermController::pause_interrupted`]
    /// afterwards to find out if `SIGINT` arrived during the block.
    pub fn pause<R>(&self, block: impl FnOnce() -> R) -> R {
        self.mode_controller.pause(block)
    }

    /// See [`ModeController::pause_interruptible`].
    pub fn pause_interruptible<R>(&self, block: impl FnOnce(&PauseInterrupt<'_>) -> R) -> R {
        self.mode_controller.pause_interruptible(block)
    }

    pub fn pause_interrupted(&self) -> bool { self.mode_controller.take_pause_interrupted() }

    /// Run `block` in [`Mode::Raw`] with no bindings and no target, reading bytes
    /// directly from the given receiver. Bindings, target, and mode are restored
    /// afterwards, even if `block` panics.
    pub fn with_raw<R>(&mut self, block: impl FnOnce(&mut RawBytesReceiver) -> R) -> R {
        // Bytes from an earlier raw block must not leak into this one.
        self.raw_bytes.clear();
        let saved_bindings = self.bindings.replace(BindingTable::new());
        self.dispatcher.push_target(None);
        let previous_mode = self.mode_controller.enter_raw();

        let _guard = RawBlockGuard {
            mode_controller: &self.mode_controller,
            bindings: &self.bindings,
            dispatcher: &mut self.dispatcher,
            saved_bindings: Some(saved_bindings),
            previous_mode,
        };
        block(&mut self.raw_bytes)
    }

    /// See [`ModeController::suspend`].
    #[cfg(unix)]
    pub fn suspend<R>(&self, block: impl FnOnce() -> R) -> R {
        self.mode_controller.suspend(block)
    }

    pub fn show_cursor(&self) { self.mode_controller.set_cursor_visible(true); }

    pub fn hide_cursor(&self) { self.mode_controller.set_cursor_visible(false); }

    #[must_use]
    pub fn diagnostics(&self) -> Diagnostics { snapshot_diagnostics(&self.diagnostics) }

    /// Restore the terminal now. Later calls, including the one on drop, do nothing.
    pub fn cleanup(&self) { self.mode_controller.cleanup(); }

    #[must_use]
    pub fn is_restored(&self) -> bool { self.mode_controller.is_restored() }
}

impl Drop for TermController {
    fn drop(&mut self) {
        self.mode_controller.request_shutdown();
        if let Some(handle) = self.reader_thread.take()
            && handle.join().is_err()
        {
            tracing::warn!(message = "Reader thread panicked.");
        }
        self.mode_controller.cleanup();
    }
}

/// Undoes [`TermController::with_raw`] in reverse order.
struct RawBlockGuard<'a> {
    mode_controller: &'a ModeController,
    bindings: &'a SharedBindings,
    dispatcher: &'a mut Dispatcher,
    saved_bindings: Option<Arc<BindingTable>>,
    previous_mode: Mode,
}

impl Drop for RawBlockGuard<'_> {
    fn drop(&mut self) {
        self.mode_controller.transition(self.previous_mode);
        drop(self.dispatcher.pop_target());
        if let Some(saved) = self.saved_bindings.take() {
            self.bindings.replace(saved);
        }
    }
}
