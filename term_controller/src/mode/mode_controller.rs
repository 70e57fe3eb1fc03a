// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::Mode;
use crate::{DEBUG_TERM_CONTROLLER, InputWaker, ReportingFeatures, StdMutex,
            TermControllerError, TerminalDevice, TerminalFlags, apply_terminal_flags,
            lock_or_recover};
use std::sync::{Arc, MutexGuard, Once};

pub type SafeModeController = Arc<ModeController>;

/// Everything guarded by the mode mutex. The reader thread holds this lock while it
/// reads and resolves, so a transition made by another thread is never interleaved
/// with a read.
#[allow(missing_debug_implementations)]
pub struct ModeState {
    mode: Mode,
    /// Last flags applied to the device. [`None`] until set up.
    applied: Option<TerminalFlags>,
    device: Box<dyn TerminalDevice>,
    shutdown_requested: bool,
    /// Number of [`ModeController::pause`] blocks running, nested ones included.
    pause_depth: usize,
    /// A job control resume happened inside the outermost pause block, so it ends in
    /// [`Mode::Cooked`] instead of the mode it started from.
    resumed_in_pause: bool,
    pause_interrupted: bool,
    /// Set by [`ModeController::cleanup`]. No device calls are made after this.
    restored: bool,
}

impl ModeState {
    #[must_use]
    pub fn mode(&self) -> Mode { self.mode }

    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool { self.shutdown_requested }

    #[must_use]
    pub fn is_pause_active(&self) -> bool { self.pause_depth > 0 }

    #[must_use]
    pub fn applied_flags(&self) -> Option<TerminalFlags> { self.applied }
}

/// Owns the current [`Mode`] and the [`TerminalDevice`], and keeps the terminal in the
/// state the mode implies.
///
/// - Every transition takes the mode mutex, applies only the flags that changed, then
///   wakes the reader thread so it re-checks the mode.
/// - [`ModeController::pause`] restores the previous mode when the block ends, even if
///   it panics.
/// - [`ModeController::cleanup`] restores the terminal exactly once, no matter how
///   many paths (drop, unwinding, termination signal) call it.
#[allow(missing_debug_implementations)]
pub struct ModeController {
    state: StdMutex<ModeState>,
    reporting: ReportingFeatures,
    waker: Arc<dyn InputWaker>,
    cleanup_once: Once,
}

impl ModeController {
    /// Nothing is applied to the device until [`ModeController::set_up`].
    #[must_use]
    pub fn new(
        device: Box<dyn TerminalDevice>,
        reporting: ReportingFeatures,
        waker: Arc<dyn InputWaker>,
    ) -> Self {
        Self {
            state: StdMutex::new(ModeState {
                mode: Mode::Cooked,
                applied: None,
                device,
                shutdown_requested: false,
                pause_depth: 0,
                resumed_in_pause: false,
                pause_interrupted: false,
                restored: false,
            }),
            reporting,
            waker,
            cleanup_once: Once::new(),
        }
    }

    /// Apply every flag for `mode`.
    ///
    /// # Errors
    ///
    /// Unlike later transitions, a failure here is returned, since the terminal is
    /// unusable.
    pub fn set_up(&self, mode: Mode) -> Result<(), TermControllerError> {
        let mut state = lock_or_recover(&self.state);
        let flags = TerminalFlags::for_mode(mode, &self.reporting);
        state.mode = mode;
        apply_terminal_flags(state.device.as_mut(), &self.reporting, None, flags)?;
        state.applied = Some(flags);
        Ok(())
    }

    /// Take the mode mutex. Used by the reader thread around each read.
    pub fn lock(&self) -> MutexGuard<'_, ModeState> { lock_or_recover(&self.state) }

    #[must_use]
    pub fn mode(&self) -> Mode { self.lock().mode }

    /// Switch to `mode`, returning the mode that was active.
    pub fn transition(&self, mode: Mode) -> Mode {
        let previous = {
            let mut state = self.lock();
            let previous = state.mode;
            state.mode = mode;
            self.apply_current_mode(&mut state, false);
            previous
        };
        DEBUG_TERM_CONTROLLER.then(|| {
            // % is Display, ? is Debug.
            tracing::debug!(message = "Mode transition.", from = %previous, to = %mode);
        });
        self.waker.wake();
        previous
    }

    pub fn enter_raw(&self) -> Mode { self.transition(Mode::Raw) }

    pub fn enter_cooked(&self) -> Mode { self.transition(Mode::Cooked) }

    /// Run `block` with the terminal restored to its original state and the reader
    /// idle. Bytes typed during the block stay unread (available to `block`).
    pub fn pause<R>(&self, block: impl FnOnce() -> R) -> R {
        self.pause_interruptible(|_| block())
    }

    /// Like [`ModeController::pause`], and `block` can poll the [`PauseInterrupt`] to
    /// find out if `SIGINT` arrived, eg: between lines of a prompt.
    pub fn pause_interruptible<R>(&self, block: impl FnOnce(&PauseInterrupt<'_>) -> R) -> R {
        let previous = {
            let mut state = self.lock();
            if state.pause_depth == 0 {
                state.pause_interrupted = false;
                state.resumed_in_pause = false;
            }
            state.pause_depth += 1;
            let previous = state.mode;
            state.mode = Mode::Paused;
            self.apply_current_mode(&mut state, false);
            previous
        };
        self.waker.wake();
        let _guard = RestoreModeGuard {
            controller: self,
            previous,
        };
        block(&PauseInterrupt { controller: self })
    }

    fn end_pause(&self, previous: Mode) {
        let mode = {
            let mut state = self.lock();
            state.pause_depth = state.pause_depth.saturating_sub(1);
            if state.pause_depth == 0 && std::mem::take(&mut state.resumed_in_pause) {
                Mode::Cooked
            } else {
                previous
            }
        };
        self.transition(mode);
    }

    /// Called for `SIGINT`. Returns `true` if a pause block was active, in which case
    /// the interrupt is recorded for [`ModeController::take_pause_interrupted`]
    /// instead of terminating the process.
    pub fn note_interrupt(&self) -> bool {
        let mut state = self.lock();
        if state.pause_depth > 0 {
            state.pause_interrupted = true;
            true
        } else {
            false
        }
    }

    /// Whether `SIGINT` arrived during the most recent pause block. Clears the flag.
    pub fn take_pause_interrupted(&self) -> bool {
        std::mem::take(&mut self.lock().pause_interrupted)
    }

    /// After a job control stop the tty may have been reset behind our back, so every
    /// flag is re-applied, not just the changed ones. Lands in [`Mode::Cooked`].
    ///
    /// Inside a pause block the terminal is put back in the paused state instead, and
    /// the block ends in [`Mode::Cooked`]. Returns `false` in that case, so the
    /// caller can hold the `resume` command until reading restarts.
    pub fn resume(&self) -> bool {
        let resumed_now = {
            let mut state = self.lock();
            let resumed_now = state.pause_depth == 0;
            if resumed_now {
                state.mode = Mode::Cooked;
            } else {
                state.resumed_in_pause = true;
            }
            self.apply_current_mode(&mut state, true);
            resumed_now
        };
        DEBUG_TERM_CONTROLLER.then(|| {
            tracing::debug!(
                message = "Resumed after job control stop.",
                in_pause = !resumed_now
            );
        });
        self.waker.wake();
        resumed_now
    }

    /// Pause, run `block`, then call `stop_process`, which is expected to return once
    /// the process continues.
    pub fn suspend_with<R>(
        &self,
        block: impl FnOnce() -> R,
        stop_process: impl FnOnce() -> std::io::Result<()>,
    ) -> R {
        self.pause(|| {
            let result = block();
            if let Err(err) = stop_process() {
                tracing::warn!(message = "Failed to stop the process.", error = ?err);
            }
            result
        })
    }

    /// Pause, run `block`, then stop the process with `SIGSTOP`, like a shell's
    /// `ctrl_z`. On `SIGCONT` the reader thread calls [`ModeController::resume`].
    #[cfg(unix)]
    pub fn suspend<R>(&self, block: impl FnOnce() -> R) -> R {
        self.suspend_with(block, || {
            signal_hook::low_level::raise(signal_hook::consts::SIGSTOP)
        })
    }

    pub fn set_cursor_visible(&self, visible: bool) {
        let mut state = self.lock();
        if state.restored {
            return;
        }
        if let Err(err) = state.device.set_cursor_visible(visible) {
            tracing::warn!(message = "Failed to change cursor visibility.", error = ?err);
        }
        if let Some(applied) = state.applied.as_mut() {
            applied.cursor_visible = visible;
        }
    }

    /// Ask the reader thread to exit, and wake it.
    pub fn request_shutdown(&self) {
        self.lock().shutdown_requested = true;
        self.waker.wake();
    }

    /// Restore the terminal: original attributes, reporting off, cursor shown,
    /// blocking input. Only the first call does anything.
    pub fn cleanup(&self) {
        self.cleanup_once.call_once(|| {
            let mut state = self.lock();
            let state = &mut *state;
            if let Err(err) = apply_terminal_flags(
                state.device.as_mut(),
                &self.reporting,
                None,
                TerminalFlags::RESTORED,
            ) {
                tracing::warn!(message = "Failed to restore the terminal.", error = ?err);
            }
            state.applied = Some(TerminalFlags::RESTORED);
            state.restored = true;
            DEBUG_TERM_CONTROLLER.then(|| {
                tracing::debug!(message = "Terminal restored.");
            });
        });
    }

    #[must_use]
    pub fn is_restored(&self) -> bool { self.cleanup_once.is_completed() }

    fn apply_current_mode(&self, state: &mut ModeState, force: bool) {
        if state.restored {
            return;
        }
        let target = TerminalFlags::for_mode(state.mode, &self.reporting);
        let from = if force { None } else { state.applied };
        if let Err(err) =
            apply_terminal_flags(state.device.as_mut(), &self.reporting, from, target)
        {
            tracing::warn!(
                message = "Failed to apply terminal flags.",
                mode = %state.mode,
                error = ?err
            );
        }
        state.applied = Some(target);
    }
}

/// Handed to [`ModeController::pause_interruptible`] blocks.
#[derive(Clone, Copy)]
#[allow(missing_debug_implementations)]
pub struct PauseInterrupt<'a> {
    controller: &'a ModeController,
}

impl PauseInterrupt<'_> {
    /// Whether `SIGINT` arrived since the outermost pause block started. Does not
    /// clear the flag.
    #[must_use]
    pub fn is_interrupted(&self) -> bool { self.controller.lock().pause_interrupted }
}

/// Puts the previous mode back when a pause block ends, including by unwinding.
struct RestoreModeGuard<'a> {
    controller: &'a ModeController,
    previous: Mode,
}

impl Drop for RestoreModeGuard<'_> {
    fn drop(&mut self) { self.controller.end_pause(self.previous); }
}
