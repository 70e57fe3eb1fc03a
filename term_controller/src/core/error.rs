// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::Diagnostic;

/// Errors that can surface from this crate.
///
/// Only construction is fatal. Once a [`crate::TermController`] exists, failures to
/// apply terminal flags are logged and absorbed, read interrupts are retried, and
/// unbound keys are recorded in [`crate::Diagnostics`].
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum TermControllerError {
    #[error("No terminal device is available")]
    #[diagnostic(
        code(r3bl_term_controller::terminal_unavailable),
        help("stdin is not a tty and /dev/tty could not be opened")
    )]
    TerminalUnavailable(#[source] std::io::Error),

    #[error("Failed to {operation} terminal attributes")]
    #[diagnostic(code(r3bl_term_controller::termios))]
    Termios {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write terminal control sequences")]
    #[diagnostic(code(r3bl_term_controller::control_sequence))]
    ControlSequence(#[source] std::io::Error),

    #[error("Failed to change blocking mode of the input stream")]
    #[diagnostic(code(r3bl_term_controller::input_blocking))]
    InputBlocking(#[source] std::io::Error),

    #[error("Failed to create the input poller")]
    #[diagnostic(
        code(r3bl_term_controller::poller_creation),
        help("This usually means the system ran out of file descriptors")
    )]
    PollerCreation(#[source] std::io::Error),

    #[error("Failed to register signal handlers")]
    #[diagnostic(
        code(r3bl_term_controller::signal_registration),
        help("Signal handler creation failed - check system signal limits")
    )]
    SignalRegistration(#[source] std::io::Error),

    #[error("Failed to spawn the reader thread")]
    #[diagnostic(code(r3bl_term_controller::reader_thread_spawn))]
    ReaderThreadSpawn(#[source] std::io::Error),
}
