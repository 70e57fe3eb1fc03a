// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Mode, ReportingFeatures, TermControllerError};

/// How the terminal driver processes input bytes before the reader sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum LineDiscipline {
    /// No echo, no line buffering, no signal keys. Every byte is delivered as typed.
    Raw,
    /// The attributes the terminal had before the controller touched it.
    Cooked,
}

/// The terminal state a [`Mode`] implies. The [`crate::ModeController`] remembers the
/// last applied flags and only calls the [`TerminalDevice`] for fields that change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalFlags {
    pub line_discipline: LineDiscipline,
    pub reporting_enabled: bool,
    pub input_nonblocking: bool,
    pub cursor_visible: bool,
}

impl TerminalFlags {
    /// What the terminal looks like while paused and after exit.
    pub const RESTORED: Self = Self {
        line_discipline: LineDiscipline::Cooked,
        reporting_enabled: false,
        input_nonblocking: false,
        cursor_visible: true,
    };

    #[must_use]
    pub fn for_mode(mode: Mode, reporting: &ReportingFeatures) -> Self {
        match mode {
            Mode::Cooked | Mode::Raw => Self {
                line_discipline: LineDiscipline::Raw,
                reporting_enabled: true,
                input_nonblocking: true,
                cursor_visible: !reporting.hide_cursor,
            },
            Mode::Paused => Self::RESTORED,
        }
    }
}

/// Terminal feature procedures. The only way the controller changes the terminal.
///
/// Implementations don't need to be idempotent, the caller only invokes a procedure
/// when the corresponding [`TerminalFlags`] field changes.
pub trait TerminalDevice: Send {
    fn set_line_discipline(
        &mut self,
        discipline: LineDiscipline,
    ) -> Result<(), TermControllerError>;

    /// Turn on mouse reporting and bracketed paste, as selected in `features`.
    fn enable_reporting_features(
        &mut self,
        features: &ReportingFeatures,
    ) -> Result<(), TermControllerError>;

    fn disable_reporting_features(
        &mut self,
        features: &ReportingFeatures,
    ) -> Result<(), TermControllerError>;

    /// `false` sets `O_NONBLOCK` on the input stream.
    fn set_input_blocking(&mut self, blocking: bool) -> Result<(), TermControllerError>;

    fn set_cursor_visible(&mut self, visible: bool) -> Result<(), TermControllerError>;
}

/// Apply `to`, calling `device` only for fields that differ from `from` (every field
/// when `from` is [`None`]). All fields are attempted even if one fails; the first
/// error is returned.
pub fn apply_terminal_flags(
    device: &mut dyn TerminalDevice,
    reporting: &ReportingFeatures,
    from: Option<TerminalFlags>,
    to: TerminalFlags,
) -> Result<(), TermControllerError> {
    let changed = |field: fn(&TerminalFlags) -> bool| {
        from.is_none_or(|from| field(&from) != field(&to))
    };
    let mut first_error: Option<TermControllerError> = None;
    let mut record = |result: Result<(), TermControllerError>| {
        if let Err(err) = result {
            first_error.get_or_insert(err);
        }
    };

    // Reporting goes off before the line discipline is restored, and comes on after
    // raw mode is set, so no report is ever echoed by a cooked terminal.
    let reporting_changed = changed(|it| it.reporting_enabled);
    if reporting_changed && !to.reporting_enabled {
        record(device.disable_reporting_features(reporting));
    }
    if from.is_none_or(|from| from.line_discipline != to.line_discipline) {
        record(device.set_line_discipline(to.line_discipline));
    }
    if changed(|it| it.input_nonblocking) {
        record(device.set_input_blocking(!to.input_nonblocking));
    }
    if reporting_changed && to.reporting_enabled {
        record(device.enable_reporting_features(reporting));
    }
    if changed(|it| it.cursor_visible) {
        record(device.set_cursor_visible(to.cursor_visible));
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{DeviceOp, MockTerminalDevice};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flags_for_mode() {
        let reporting = ReportingFeatures::default();
        let cooked = TerminalFlags::for_mode(Mode::Cooked, &reporting);
        assert_eq!(cooked, TerminalFlags::for_mode(Mode::Raw, &reporting));
        assert_eq!(cooked.line_discipline, LineDiscipline::Raw);
        assert!(cooked.reporting_enabled && cooked.input_nonblocking);
        assert!(!cooked.cursor_visible);
        assert_eq!(
            TerminalFlags::for_mode(Mode::Paused, &reporting),
            TerminalFlags::RESTORED
        );
    }

    #[test]
    fn test_apply_from_nothing_sets_everything() {
        let (mut device, ops) = MockTerminalDevice::new();
        let reporting = ReportingFeatures::default();
        apply_terminal_flags(
            &mut device,
            &reporting,
            None,
            TerminalFlags::for_mode(Mode::Cooked, &reporting),
        )
        .unwrap();
        assert_eq!(
            ops.take(),
            vec![
                DeviceOp::LineDiscipline(LineDiscipline::Raw),
                DeviceOp::InputBlocking(false),
                DeviceOp::EnableReporting,
                DeviceOp::CursorVisible(false),
            ]
        );
    }

    #[test]
    fn test_apply_only_changed_fields() {
        let (mut device, ops) = MockTerminalDevice::new();
        let reporting = ReportingFeatures::default();
        let active = TerminalFlags::for_mode(Mode::Cooked, &reporting);

        apply_terminal_flags(&mut device, &reporting, Some(active), active).unwrap();
        assert_eq!(ops.take(), vec![]);

        apply_terminal_flags(&mut device, &reporting, Some(active), TerminalFlags::RESTORED)
            .unwrap();
        assert_eq!(
            ops.take(),
            vec![
                DeviceOp::DisableReporting,
                DeviceOp::LineDiscipline(LineDiscipline::Cooked),
                DeviceOp::InputBlocking(true),
                DeviceOp::CursorVisible(true),
            ]
        );
    }

    #[test]
    fn test_apply_reports_first_error_but_keeps_going() {
        let (mut device, ops) = MockTerminalDevice::new();
        device.fail_line_discipline(true);
        let reporting = ReportingFeatures::default();
        let result = apply_terminal_flags(
            &mut device,
            &reporting,
            None,
            TerminalFlags::RESTORED,
        );
        assert!(matches!(result, Err(TermControllerError::Termios { .. })));
        assert_eq!(ops.take().len(), 4);
    }
}
