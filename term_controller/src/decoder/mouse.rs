// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Mouse reports.
//!
//! - SGR (`ESC [ < Cb ; Cx ; Cy M` press, `... m` release): the format the controller
//!   asks for when mouse reporting is on.
//! - X10 (`ESC [ M cb cx cy`, each byte offset by 32): sent by terminals that don't
//!   support SGR.
//!
//! Both decode to a symbol with `[button_flags, column, row]` as default arguments.
//! Coordinates are 1-based, as reported by the terminal.

use super::{Decoded, keyboard::CsiSequence};
use crate::{CommandArg, CommandArgs, symbols};

const SGR_MARKER: u8 = b'<';
const X10_PAYLOAD_LEN: usize = 3;
const X10_OFFSET: u8 = 32;

/// Button flag bits shared by SGR and X10.
const FLAG_MOTION: u16 = 32;
const FLAG_WHEEL: u16 = 64;
const BUTTON_MASK: u16 = 0b11;
const X10_RELEASE: u16 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MouseDecode {
    /// Not a mouse report, try the keyboard decoder.
    NotMouse,
    /// X10 report whose payload bytes haven't arrived yet.
    Incomplete,
    Complete(Decoded, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MouseAction {
    Press,
    Release,
}

#[must_use]
pub fn decode_mouse(buffer: &[u8], csi: &CsiSequence) -> MouseDecode {
    match (csi.private_marker, csi.final_byte, csi.params.as_slice()) {
        (Some(SGR_MARKER), b'M', &[flags, column, row]) => MouseDecode::Complete(
            classify(flags, column, row, MouseAction::Press),
            csi.len,
        ),
        (Some(SGR_MARKER), b'm', &[flags, column, row]) => MouseDecode::Complete(
            classify(flags, column, row, MouseAction::Release),
            csi.len,
        ),
        (None, b'M', &[]) => decode_x10(buffer, csi.len),
        _ => MouseDecode::NotMouse,
    }
}

fn decode_x10(buffer: &[u8], header_len: usize) -> MouseDecode {
    let Some(payload) = buffer.get(header_len..header_len + X10_PAYLOAD_LEN) else {
        return MouseDecode::Incomplete;
    };
    let [flags, column, row] = [payload[0], payload[1], payload[2]]
        .map(|byte| u16::from(byte.saturating_sub(X10_OFFSET)));
    let is_button_event = flags & (FLAG_MOTION | FLAG_WHEEL) == 0;
    let action = if is_button_event && flags & BUTTON_MASK == X10_RELEASE {
        MouseAction::Release
    } else {
        MouseAction::Press
    };
    MouseDecode::Complete(
        classify(flags, column, row, action),
        header_len + X10_PAYLOAD_LEN,
    )
}

fn classify(flags: u16, column: u16, row: u16, action: MouseAction) -> Decoded {
    let name = if flags & FLAG_WHEEL != 0 {
        match flags & BUTTON_MASK {
            0 => symbols::SCROLL_UP,
            1 => symbols::SCROLL_DOWN,
            2 => "scroll_left",
            _ => "scroll_right",
        }
    } else if flags & FLAG_MOTION != 0 {
        symbols::MOUSE_MOVE
    } else if action == MouseAction::Release {
        symbols::MOUSE_UP
    } else {
        symbols::MOUSE_DOWN
    };
    let args: CommandArgs = [flags, column, row].into_iter().map(CommandArg::from).collect();
    Decoded::symbol_with_args(name, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::keyboard::{CsiScan, scan_csi};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn decode(buffer: &[u8]) -> MouseDecode {
        match scan_csi(buffer) {
            CsiScan::Complete(csi) => decode_mouse(buffer, &csi),
            other => panic!("expected complete CSI, got {other:?}"),
        }
    }

    fn name_of(buffer: &[u8]) -> String {
        match decode(buffer) {
            MouseDecode::Complete(decoded, _) => decoded.lookup_key().to_string(),
            other => panic!("expected mouse event, got {other:?}"),
        }
    }

    #[test_case(b"\x1b[<0;10;5M", "mouse_down" ; "left press")]
    #[test_case(b"\x1b[<0;10;5m", "mouse_up" ; "left release")]
    #[test_case(b"\x1b[<2;1;1M", "mouse_down" ; "right press")]
    #[test_case(b"\x1b[<32;11;5M", "mouse_move" ; "drag")]
    #[test_case(b"\x1b[<35;11;5M", "mouse_move" ; "motion no button")]
    #[test_case(b"\x1b[<64;3;4M", "scroll_up" ; "wheel up")]
    #[test_case(b"\x1b[<65;3;4M", "scroll_down" ; "wheel down")]
    #[test_case(b"\x1b[<16;3;4M", "mouse_down" ; "ctrl press")]
    fn test_sgr(buffer: &[u8], expected: &str) {
        assert_eq!(name_of(buffer), expected);
    }

    #[test]
    fn test_sgr_args_and_len() {
        assert_eq!(
            decode(b"\x1b[<0;120;40mrest"),
            MouseDecode::Complete(
                Decoded::symbol_with_args(
                    "mouse_up",
                    [0u16, 120, 40].into_iter().map(CommandArg::from).collect()
                ),
                12
            )
        );
    }

    #[test]
    fn test_x10() {
        // Left press at (1, 1): each byte is offset by 32.
        assert_eq!(name_of(&[0x1B, b'[', b'M', 32, 33, 33]), "mouse_down");
        assert_eq!(name_of(&[0x1B, b'[', b'M', 35, 33, 33]), "mouse_up");
        assert_eq!(name_of(&[0x1B, b'[', b'M', 96, 33, 33]), "scroll_up");
        assert_eq!(decode(&[0x1B, b'[', b'M', 32]), MouseDecode::Incomplete);
    }

    #[test]
    fn test_not_mouse() {
        assert_eq!(decode(b"\x1b[A"), MouseDecode::NotMouse);
        assert_eq!(decode(b"\x1b[<0;1M"), MouseDecode::NotMouse);
    }
}
