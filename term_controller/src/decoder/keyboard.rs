// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Keyboard sequences: control characters, CSI and SS3 keys, `ESC` + char.
//!
//! Modified keys follow the xterm `CSI 1 ; m X` / `CSI n ; m ~` form, where `m - 1` is
//! a bitmask: `1` shift, `2` meta (alt), `4` ctrl. The decoded symbol gets the matching
//! prefixes in `ctrl_meta_shift_` order, eg: `CSI 1 ; 6 A` → `ctrl_shift_up`.

use super::{Decoded, vt_100_key_decoder::ANSI_ESC};
use crate::symbols;
use smallvec::SmallVec;

/// CSI parameters, eg: `[1, 5]` for `ESC [ 1 ; 5 A`. Empty parameters are `0`.
pub type CsiParams = SmallVec<[u16; 4]>;

/// A complete, syntactically valid CSI sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsiSequence {
    /// Private marker right after `[`, eg: `<` for SGR mouse.
    pub private_marker: Option<u8>,
    pub params: CsiParams,
    pub final_byte: u8,
    /// Total bytes including `ESC [`.
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsiScan {
    Incomplete,
    Malformed,
    Complete(CsiSequence),
}

/// Scan a CSI sequence at the front of `buffer`, which must start with `ESC [`.
///
/// Layout per ECMA-48: optional private marker (`0x3C..=0x3F`), parameter bytes
/// (`0x30..=0x3F`), intermediate bytes (`0x20..=0x2F`), final byte (`0x40..=0x7E`).
#[must_use]
pub fn scan_csi(buffer: &[u8]) -> CsiScan {
    let mut index = 2;

    let private_marker = match buffer.get(index) {
        None => return CsiScan::Incomplete,
        Some(&byte @ b'<'..=b'?') => {
            index += 1;
            Some(byte)
        }
        Some(_) => None,
    };

    let mut params = CsiParams::new();
    let mut current: Option<u16> = None;

    loop {
        let Some(&byte) = buffer.get(index) else {
            return CsiScan::Incomplete;
        };
        index += 1;
        match byte {
            b'0'..=b'9' => {
                let digit = u16::from(byte - b'0');
                current =
                    Some(current.unwrap_or(0).saturating_mul(10).saturating_add(digit));
            }
            b';' | b':' => params.push(current.take().unwrap_or(0)),
            // Intermediate bytes carry no meaning for input sequences.
            0x20..=0x2F => {}
            0x40..=0x7E => {
                if let Some(last) = current {
                    params.push(last);
                } else if !params.is_empty() {
                    params.push(0);
                }
                return CsiScan::Complete(CsiSequence {
                    private_marker,
                    params,
                    final_byte: byte,
                    len: index,
                });
            }
            _ => return CsiScan::Malformed,
        }
    }
}

/// Modifier prefix from an xterm modifier parameter, eg: `5` → `ctrl_`.
#[must_use]
pub fn modifier_prefix(param: u16) -> &'static str {
    let mask = param.saturating_sub(1);
    let shift = mask & 1 != 0;
    let meta = mask & 2 != 0;
    let ctrl = mask & 4 != 0;
    match (ctrl, meta, shift) {
        (false, false, false) => "",
        (false, false, true) => "shift_",
        (false, true, false) => "meta_",
        (false, true, true) => "meta_shift_",
        (true, false, false) => "ctrl_",
        (true, false, true) => "ctrl_shift_",
        (true, true, false) => "ctrl_meta_",
        (true, true, true) => "ctrl_meta_shift_",
    }
}

fn with_modifiers(base: &str, modifier_param: Option<u16>) -> Decoded {
    let prefix = modifier_param.map_or("", modifier_prefix);
    if prefix.is_empty() {
        Decoded::symbol(base)
    } else {
        Decoded::symbol(&format!("{prefix}{base}"))
    }
}

/// Final byte of `CSI X` / `CSI 1 ; m X` / `SS3 X` → key name.
fn letter_key(final_byte: u8) -> Option<&'static str> {
    match final_byte {
        b'A' => Some("up"),
        b'B' => Some("down"),
        b'C' => Some("right"),
        b'D' => Some("left"),
        b'H' => Some("home"),
        b'F' => Some("end"),
        b'P' => Some("f1"),
        b'Q' => Some("f2"),
        b'R' => Some("f3"),
        b'S' => Some("f4"),
        _ => None,
    }
}

/// Code of `CSI n ~` → key name.
fn tilde_key(code: u16) -> Option<&'static str> {
    match code {
        1 | 7 => Some("home"),
        2 => Some("insert"),
        3 => Some("delete"),
        4 | 8 => Some("end"),
        5 => Some("page_up"),
        6 => Some("page_down"),
        11 => Some("f1"),
        12 => Some("f2"),
        13 => Some("f3"),
        14 => Some("f4"),
        15 => Some("f5"),
        17 => Some("f6"),
        18 => Some("f7"),
        19 => Some("f8"),
        20 => Some("f9"),
        21 => Some("f10"),
        23 => Some("f11"),
        24 => Some("f12"),
        _ => None,
    }
}

/// Decode a complete non-mouse CSI sequence. Anything not recognized is `unknown` so
/// the whole sequence is still consumed.
#[must_use]
pub fn decode_csi_key(csi: &CsiSequence) -> Decoded {
    if csi.private_marker.is_some() {
        return Decoded::symbol(symbols::UNKNOWN);
    }
    let modifier_param = csi.params.get(1).copied();
    match (csi.final_byte, csi.params.first().copied()) {
        (b'~', Some(200)) => Decoded::symbol(symbols::PASTE_START),
        (b'~', Some(201)) => Decoded::symbol(symbols::PASTE_END),
        (b'~', Some(code)) => tilde_key(code).map_or_else(
            || Decoded::symbol(symbols::UNKNOWN),
            |key| with_modifiers(key, modifier_param),
        ),
        (b'I', None) => Decoded::symbol(symbols::FOCUS_IN),
        (b'O', None) => Decoded::symbol(symbols::FOCUS_OUT),
        (b'Z', _) => Decoded::symbol("shift_tab"),
        (final_byte, _) => letter_key(final_byte).map_or_else(
            || Decoded::symbol(symbols::UNKNOWN),
            |key| with_modifiers(key, modifier_param),
        ),
    }
}

/// `ESC O X`: F1-F4, arrows, Home and End in application cursor mode.
#[must_use]
pub fn decode_ss3(buffer: &[u8]) -> Option<(Decoded, usize)> {
    match buffer.get(2) {
        // `ESC O` with nothing after it and no more input is `meta_O`.
        None => Some((Decoded::symbol("meta_O"), 2)),
        Some(&byte) => match letter_key(byte) {
            Some(key) => Some((Decoded::symbol(key), 3)),
            None => Some((Decoded::symbol(symbols::UNKNOWN), 3)),
        },
    }
}

/// `ESC` followed by a printable ASCII character → `meta_<char>`.
#[must_use]
pub fn decode_meta_char(buffer: &[u8]) -> Option<(Decoded, usize)> {
    match buffer {
        [ANSI_ESC, byte @ 0x21..=0x7E, ..] => {
            Some((Decoded::symbol(&format!("meta_{}", char::from(*byte))), 2))
        }
        _ => None,
    }
}

/// Single byte control characters. Returns [`None`] for printable and non ASCII bytes.
#[must_use]
pub fn decode_control_char(byte: u8) -> Option<Decoded> {
    let name = match byte {
        0x00 => "ctrl_space",
        0x09 => "tab",
        0x0D => "enter",
        0x01..=0x1A => {
            let letter = char::from(b'a' + byte - 1);
            return Some(Decoded::symbol(&format!("ctrl_{letter}")));
        }
        0x1C => "ctrl_backslash",
        0x1D => "ctrl_right_bracket",
        0x1E => "ctrl_caret",
        0x1F => "ctrl_underscore",
        0x7F => "backspace",
        _ => return None,
    };
    Some(Decoded::symbol(name))
}
