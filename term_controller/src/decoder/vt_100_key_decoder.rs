// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{Decoded, KeyDecoder, keyboard, mouse, utf8};
use crate::symbols;

pub const ANSI_ESC: u8 = 0x1B;
pub const ANSI_CSI_BRACKET: u8 = b'[';
pub const ANSI_SS3_O: u8 = b'O';

/// Stateless VT-100 / xterm input decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vt100KeyDecoder;

impl KeyDecoder for Vt100KeyDecoder {
    fn decode(&mut self, buffer: &[u8], input_available: bool) -> Option<(Decoded, usize)> {
        try_decode(buffer, input_available)
    }
}

/// Route the front of `buffer` to the keyboard, mouse, or UTF-8 decoder.
///
/// | Input pattern            | `input_available` | Routing                             |
/// | :----------------------- | :---------------- | :---------------------------------- |
/// | `[ ESC ]` alone          | `true`            | `None` (wait for more bytes)        |
/// | `[ ESC ]` alone          | `false`           | `esc` immediately                   |
/// | `[ ESC, '[', .. ]`       | (ignored)         | CSI → mouse, then keyboard          |
/// | `[ ESC, 'O', .. ]`       | (ignored)         | SS3 → F1-F4, arrows, Home, End      |
/// | `[ ESC, printable, .. ]` | (ignored)         | `meta_<char>`                       |
/// | `[ ESC, other, .. ]`     | (ignored)         | `esc`, other byte left for next run |
/// | Other bytes              | (ignored)         | control character → UTF-8 text      |
#[must_use]
pub fn try_decode(buffer: &[u8], input_available: bool) -> Option<(Decoded, usize)> {
    match buffer {
        [] => None,

        [ANSI_ESC] if input_available => None,
        [ANSI_ESC] => Some((Decoded::symbol(symbols::ESC), 1)),

        [ANSI_ESC, ANSI_CSI_BRACKET, ..] => match keyboard::scan_csi(buffer) {
            keyboard::CsiScan::Incomplete => None,
            keyboard::CsiScan::Malformed => Some((Decoded::symbol(symbols::ESC), 1)),
            keyboard::CsiScan::Complete(csi) => match mouse::decode_mouse(buffer, &csi) {
                mouse::MouseDecode::Complete(decoded, consumed) => Some((decoded, consumed)),
                mouse::MouseDecode::Incomplete => None,
                mouse::MouseDecode::NotMouse => {
                    Some((keyboard::decode_csi_key(&csi), csi.len))
                }
            },
        },

        [ANSI_ESC, ANSI_SS3_O] if input_available => None,
        [ANSI_ESC, ANSI_SS3_O, ..] => keyboard::decode_ss3(buffer),

        [ANSI_ESC, _, ..] => keyboard::decode_meta_char(buffer)
            .or_else(|| Some((Decoded::symbol(symbols::ESC), 1))),

        _ => keyboard::decode_control_char(buffer[0])
            .map(|decoded| (decoded, 1))
            .or_else(|| utf8::decode_utf8_text(buffer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CommandArg;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn symbol_of(buffer: &[u8]) -> (String, usize) {
        match try_decode(buffer, false) {
            Some((Decoded::Symbol { symbol, .. }, consumed)) => {
                (symbol.as_str().to_string(), consumed)
            }
            other => panic!("expected a symbol for {buffer:?}, got {other:?}"),
        }
    }

    #[test_case(&[0x03], "ctrl_c", 1 ; "ctrl c")]
    #[test_case(&[0x0D], "enter", 1 ; "enter")]
    #[test_case(&[0x09], "tab", 1 ; "tab")]
    #[test_case(&[0x7F], "backspace", 1 ; "backspace")]
    #[test_case(&[0x00], "ctrl_space", 1 ; "ctrl space")]
    #[test_case(&[0x1B], "esc", 1 ; "lone esc")]
    #[test_case(b"\x1b[A", "up", 3 ; "up arrow")]
    #[test_case(b"\x1b[1;5C", "ctrl_right", 6 ; "ctrl right")]
    #[test_case(b"\x1b[1;2D", "shift_left", 6 ; "shift left")]
    #[test_case(b"\x1b[15~", "f5", 5 ; "f5")]
    #[test_case(b"\x1b[24;3~", "meta_f12", 7 ; "meta f12")]
    #[test_case(b"\x1b[3~", "delete", 4 ; "delete")]
    #[test_case(b"\x1b[5~", "page_up", 4 ; "page up")]
    #[test_case(b"\x1b[Z", "shift_tab", 3 ; "shift tab")]
    #[test_case(b"\x1bOP", "f1", 3 ; "ss3 f1")]
    #[test_case(b"\x1bOH", "home", 3 ; "ss3 home")]
    #[test_case(b"\x1bx", "meta_x", 2 ; "meta x")]
    #[test_case(b"\x1b[200~", "paste_start", 6 ; "paste start")]
    #[test_case(b"\x1b[201~", "paste_end", 6 ; "paste end")]
    #[test_case(b"\x1b[I", "focus_in", 3 ; "focus in")]
    #[test_case(b"\x1b[99~", "unknown", 5 ; "unknown tilde key")]
    fn test_symbols(buffer: &[u8], expected: &str, expected_consumed: usize) {
        assert_eq!(symbol_of(buffer), (expected.to_string(), expected_consumed));
    }

    #[test]
    fn test_lone_esc_waits_when_more_input_available() {
        assert_eq!(try_decode(&[ANSI_ESC], true), None);
    }

    #[test]
    fn test_incomplete_sequences_wait() {
        assert_eq!(try_decode(b"\x1b[", false), None);
        assert_eq!(try_decode(b"\x1b[1;5", false), None);
        assert_eq!(try_decode(b"\x1b[<0;10", false), None);
        assert_eq!(try_decode(&[0xC3], false), None);
    }

    #[test]
    fn test_malformed_csi_emits_esc_and_leaves_rest() {
        // 0x07 can't appear inside a CSI sequence.
        assert_eq!(symbol_of(b"\x1b[\x07"), ("esc".to_string(), 1));
    }

    #[test]
    fn test_literal_text() {
        assert_eq!(try_decode(b"xyz", false), Some((Decoded::literal("x"), 1)));
        assert_eq!(try_decode(" ".as_bytes(), false), Some((Decoded::literal(" "), 1)));
        assert_eq!(
            try_decode("é!".as_bytes(), false),
            Some((Decoded::literal("é"), 2))
        );
    }

    #[test]
    fn test_sgr_mouse_down_carries_args() {
        let (decoded, consumed) = try_decode(b"\x1b[<0;10;5M", false).unwrap();
        assert_eq!(consumed, 10);
        assert_eq!(
            decoded,
            Decoded::symbol_with_args(
                "mouse_down",
                [CommandArg::Int(0), CommandArg::Int(10), CommandArg::Int(5)]
                    .into_iter()
                    .collect()
            )
        );
    }

    #[test]
    fn test_decodes_sequence_by_sequence() {
        let input = b"\x1b[A\x03q";
        let mut offset = 0;
        let mut decoded = vec![];
        while let Some((it, consumed)) = try_decode(&input[offset..], false) {
            decoded.push(it.lookup_key().to_string());
            offset += consumed;
        }
        assert_eq!(decoded, vec!["up", "ctrl_c", "q"]);
        assert_eq!(offset, input.len());
    }
}
