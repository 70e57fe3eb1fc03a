// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{InputWaker, LineDiscipline, ReportingFeatures, StdMutex, TermControllerError,
            TerminalDevice, lock_or_recover};
use std::sync::{Arc,
                atomic::{AtomicUsize, Ordering}};

/// One call made on a [`MockTerminalDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceOp {
    LineDiscipline(LineDiscipline),
    EnableReporting,
    DisableReporting,
    /// `true` means blocking.
    InputBlocking(bool),
    CursorVisible(bool),
}

/// Shared log of [`DeviceOp`]s, readable while the device is owned by a controller.
#[derive(Debug, Clone, Default)]
pub struct DeviceOpLog {
    inner: Arc<StdMutex<Vec<DeviceOp>>>,
}

impl DeviceOpLog {
    fn push(&self, op: DeviceOp) { lock_or_recover(&self.inner).push(op); }

    /// Return and clear the recorded ops.
    #[must_use]
    pub fn take(&self) -> Vec<DeviceOp> { std::mem::take(&mut *lock_or_recover(&self.inner)) }

    #[must_use]
    pub fn snapshot(&self) -> Vec<DeviceOp> { lock_or_recover(&self.inner).clone() }
}

#[derive(Debug)]
pub struct MockTerminalDevice {
    ops: DeviceOpLog,
    fail_line_discipline: bool,
}

impl MockTerminalDevice {
    #[must_use]
    pub fn new() -> (Self, DeviceOpLog) {
        let ops = DeviceOpLog::default();
        let device = Self {
            ops: ops.clone(),
            fail_line_discipline: false,
        };
        (device, ops)
    }

    /// Make [`TerminalDevice::set_line_discipline`] fail (the op is still recorded).
    pub fn fail_line_discipline(&mut self, fail: bool) { self.fail_line_discipline = fail; }
}

impl TerminalDevice for MockTerminalDevice {
    fn set_line_discipline(
        &mut self,
        discipline: LineDiscipline,
    ) -> Result<(), TermControllerError> {
        self.ops.push(DeviceOp::LineDiscipline(discipline));
        if self.fail_line_discipline {
            return Err(TermControllerError::Termios {
                operation: "set",
                source: std::io::Error::other("mock failure"),
            });
        }
        Ok(())
    }

    fn enable_reporting_features(
        &mut self,
        _features: &ReportingFeatures,
    ) -> Result<(), TermControllerError> {
        self.ops.push(DeviceOp::EnableReporting);
        Ok(())
    }

    fn disable_reporting_features(
        &mut self,
        _features: &ReportingFeatures,
    ) -> Result<(), TermControllerError> {
        self.ops.push(DeviceOp::DisableReporting);
        Ok(())
    }

    fn set_input_blocking(&mut self, blocking: bool) -> Result<(), TermControllerError> {
        self.ops.push(DeviceOp::InputBlocking(blocking));
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<(), TermControllerError> {
        self.ops.push(DeviceOp::CursorVisible(visible));
        Ok(())
    }
}

/// [`InputWaker`] that only counts calls.
#[derive(Debug, Default)]
pub struct RecordingWaker {
    count: AtomicUsize,
}

impl RecordingWaker {
    #[must_use]
    pub fn count(&self) -> usize { self.count.load(Ordering::SeqCst) }
}

impl InputWaker for RecordingWaker {
    fn wake(&self) { self.count.fetch_add(1, Ordering::SeqCst); }
}
