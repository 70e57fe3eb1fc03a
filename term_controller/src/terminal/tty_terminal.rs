// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`TerminalDevice`] for a real tty, using `rustix` termios for the line discipline
//! and `O_NONBLOCK`, and `crossterm` commands for the reporting features.

use crate::{DEBUG_TERM_CONTROLLER, LineDiscipline, ReportingFeatures, TerminalDevice,
            TermControllerError};
use crossterm::{cursor::{Hide, Show},
                event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste,
                        EnableMouseCapture},
                queue};
use rustix::{fs::{OFlags, fcntl_getfl, fcntl_setfl},
             termios::{self, OptionalActions, Termios}};
use std::{fs::File,
          io::{self, Write}};

/// Open the controlling terminal: a duplicate of stdin when stdin is a tty, otherwise
/// `/dev/tty` (eg: when input is piped into the process).
///
/// # Errors
///
/// [`TermControllerError::TerminalUnavailable`] if neither is usable.
pub fn open_terminal() -> Result<File, TermControllerError> {
    let stdin = io::stdin();
    if termios::isatty(&stdin) {
        let owned = rustix::io::dup(&stdin)
            .map_err(|err| TermControllerError::TerminalUnavailable(err.into()))?;
        Ok(File::from(owned))
    } else {
        File::options()
            .read(true)
            .write(true)
            .open("/dev/tty")
            .map_err(TermControllerError::TerminalUnavailable)
    }
}

/// Where control sequences are written.
#[derive(Debug)]
enum TerminalOutput {
    Stdout(io::Stdout),
    Tty(File),
}

impl Write for TerminalOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            TerminalOutput::Stdout(it) => it.write(buf),
            TerminalOutput::Tty(it) => it.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            TerminalOutput::Stdout(it) => it.flush(),
            TerminalOutput::Tty(it) => it.flush(),
        }
    }
}

#[derive(Debug)]
pub struct TtyTerminal {
    input: File,
    output: TerminalOutput,
    /// Attributes before the first switch to raw, restored by
    /// [`LineDiscipline::Cooked`].
    original_termios: Option<Termios>,
}

impl TtyTerminal {
    /// # Errors
    ///
    /// [`TermControllerError::TerminalUnavailable`] if the terminal handle can't be
    /// cloned or its attributes can't be read.
    pub fn try_new(terminal: &File) -> Result<Self, TermControllerError> {
        let input = terminal.try_clone().map_err(TermControllerError::TerminalUnavailable)?;
        // Fail early if this isn't a terminal after all.
        termios::tcgetattr(&input)
            .map_err(|err| TermControllerError::TerminalUnavailable(err.into()))?;

        let stdout = io::stdout();
        let output = if termios::isatty(&stdout) {
            TerminalOutput::Stdout(stdout)
        } else {
            let file = terminal.try_clone().map_err(TermControllerError::TerminalUnavailable)?;
            TerminalOutput::Tty(file)
        };

        Ok(Self {
            input,
            output,
            original_termios: None,
        })
    }

    fn write_sequences(
        &mut self,
        write: impl FnOnce(&mut TerminalOutput) -> io::Result<()>,
    ) -> Result<(), TermControllerError> {
        write(&mut self.output)
            .and_then(|()| self.output.flush())
            .map_err(TermControllerError::ControlSequence)
    }
}

impl TerminalDevice for TtyTerminal {
    fn set_line_discipline(
        &mut self,
        discipline: LineDiscipline,
    ) -> Result<(), TermControllerError> {
        DEBUG_TERM_CONTROLLER.then(|| {
            tracing::debug!(message = "Set line discipline.", discipline = %discipline);
        });
        let result = match discipline {
            LineDiscipline::Raw => {
                let mut attrs = termios::tcgetattr(&self.input).map_err(|err| {
                    TermControllerError::Termios {
                        operation: "read",
                        source: err.into(),
                    }
                })?;
                if self.original_termios.is_none() {
                    self.original_termios = Some(attrs.clone());
                }
                attrs.make_raw();
                termios::tcsetattr(&self.input, OptionalActions::Now, &attrs)
            }
            LineDiscipline::Cooked => match &self.original_termios {
                Some(original) => {
                    termios::tcsetattr(&self.input, OptionalActions::Now, original)
                }
                // Never made raw.
                None => Ok(()),
            },
        };
        result.map_err(|err| TermControllerError::Termios {
            operation: "set",
            source: err.into(),
        })
    }

    fn enable_reporting_features(
        &mut self,
        features: &ReportingFeatures,
    ) -> Result<(), TermControllerError> {
        let features = *features;
        self.write_sequences(|out| {
            if features.mouse {
                queue!(out, EnableMouseCapture)?;
            }
            if features.bracketed_paste {
                queue!(out, EnableBracketedPaste)?;
            }
            Ok(())
        })
    }

    fn disable_reporting_features(
        &mut self,
        features: &ReportingFeatures,
    ) -> Result<(), TermControllerError> {
        let features = *features;
        self.write_sequences(|out| {
            if features.bracketed_paste {
                queue!(out, DisableBracketedPaste)?;
            }
            if features.mouse {
                queue!(out, DisableMouseCapture)?;
            }
            Ok(())
        })
    }

    fn set_input_blocking(&mut self, blocking: bool) -> Result<(), TermControllerError> {
        let flags = fcntl_getfl(&self.input)
            .map_err(|err| TermControllerError::InputBlocking(err.into()))?;
        let flags = if blocking {
            flags - OFlags::NONBLOCK
        } else {
            flags | OFlags::NONBLOCK
        };
        fcntl_setfl(&self.input, flags)
            .map_err(|err| TermControllerError::InputBlocking(err.into()))
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<(), TermControllerError> {
        self.write_sequences(|out| {
            if visible {
                queue!(out, Show)
            } else {
                queue!(out, Hide)
            }
        })
    }
}
