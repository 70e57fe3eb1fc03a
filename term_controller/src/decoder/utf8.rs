// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Printable text. One character is decoded per call, so each character becomes its
//! own literal command.

use super::Decoded;

/// Expected length of a UTF-8 sequence from its first byte. [`None`] for continuation
/// bytes and bytes that can never start a sequence.
#[must_use]
pub fn utf8_sequence_len(first_byte: u8) -> Option<usize> {
    match first_byte {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

/// Decode one character from the front of `buffer`.
///
/// - Returns [`None`] if `buffer` holds only part of a multi-byte character.
/// - Invalid bytes decode to `U+FFFD` and consume a single byte, so the rest of the
///   buffer can still be decoded.
#[must_use]
pub fn decode_utf8_text(buffer: &[u8]) -> Option<(Decoded, usize)> {
    let first_byte = *buffer.first()?;
    let Some(len) = utf8_sequence_len(first_byte) else {
        return Some(replacement());
    };
    let bytes = buffer.get(..len)?;
    match std::str::from_utf8(bytes) {
        Ok(text) => Some((Decoded::literal(text), len)),
        Err(_) => Some(replacement()),
    }
}

fn replacement() -> (Decoded, usize) {
    (Decoded::literal(char::REPLACEMENT_CHARACTER.to_string()), 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ascii_and_multi_byte() {
        assert_eq!(decode_utf8_text(b"ab"), Some((Decoded::literal("a"), 1)));
        assert_eq!(decode_utf8_text("日本".as_bytes()), Some((Decoded::literal("日"), 3)));
        assert_eq!(decode_utf8_text("🙂".as_bytes()), Some((Decoded::literal("🙂"), 4)));
    }

    #[test]
    fn test_partial_character_waits() {
        let bytes = "🙂".as_bytes();
        assert_eq!(decode_utf8_text(&bytes[..2]), None);
        assert_eq!(decode_utf8_text(&[]), None);
    }

    #[test]
    fn test_invalid_bytes_are_replaced() {
        let replacement = Decoded::literal("\u{FFFD}");
        // Stray continuation byte.
        assert_eq!(decode_utf8_text(&[0x80, b'a']), Some((replacement.clone(), 1)));
        // Lead byte followed by a non continuation byte.
        assert_eq!(decode_utf8_text(&[0xC3, b'a']), Some((replacement.clone(), 1)));
        assert_eq!(decode_utf8_text(&[0xFF]), Some((replacement, 1)));
    }
}
