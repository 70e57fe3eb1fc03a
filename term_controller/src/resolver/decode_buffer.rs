// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Decoded, KeyDecoder};

/// Source of decoded units for [`crate::CommandResolver::resolve`].
pub trait SymbolSource {
    /// Next complete unit, or [`None`] if no complete unit is available yet.
    fn next_decoded(&mut self) -> Option<Decoded>;
}

/// Bytes read from the terminal that haven't been decoded yet, plus the decoder.
///
/// A partial escape sequence stays buffered until the rest arrives. Once the decoder
/// has asked for more bytes the buffer is "stalled" and
/// [`DecodeBuffer::has_decodable_input`] is `false` until more bytes are appended or
/// the input is known to be drained.
pub struct DecodeBuffer {
    pending: Vec<u8>,
    decoder: Box<dyn KeyDecoder>,
    input_available: bool,
    stalled: bool,
}

impl std::fmt::Debug for DecodeBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeBuffer")
            .field("pending", &self.pending)
            .field("input_available", &self.input_available)
            .field("stalled", &self.stalled)
            .finish_non_exhaustive()
    }
}

impl DecodeBuffer {
    #[must_use]
    pub fn new(decoder: Box<dyn KeyDecoder>) -> Self {
        Self {
            pending: Vec::new(),
            decoder,
            input_available: false,
            stalled: false,
        }
    }

    /// `more_expected` is `true` when the read that produced `bytes` filled the read
    /// buffer.
    pub fn append(&mut self, bytes: &[u8], more_expected: bool) {
        if bytes.is_empty() {
            return;
        }
        self.pending.extend_from_slice(bytes);
        self.input_available = more_expected;
        self.stalled = false;
    }

    /// The terminal has nothing more to read right now. Lets the decoder settle
    /// ambiguous input, eg: a lone `ESC`.
    pub fn mark_input_drained(&mut self) {
        if self.input_available {
            self.input_available = false;
            self.stalled = false;
        }
    }

    #[must_use]
    pub fn has_decodable_input(&self) -> bool { !self.pending.is_empty() && !self.stalled }

    #[must_use]
    pub fn pending(&self) -> &[u8] { &self.pending }
}

impl SymbolSource for DecodeBuffer {
    fn next_decoded(&mut self) -> Option<Decoded> {
        if !self.has_decodable_input() {
            return None;
        }
        match self.decoder.decode(&self.pending, self.input_available) {
            Some((decoded, consumed)) => {
                // Always make progress, even if a decoder reports zero bytes.
                let consumed = consumed.clamp(1, self.pending.len());
                self.pending.drain(..consumed);
                Some(decoded)
            }
            None => {
                self.stalled = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vt100KeyDecoder;
    use pretty_assertions::assert_eq;

    fn new_buffer() -> DecodeBuffer { DecodeBuffer::new(Box::new(Vt100KeyDecoder)) }

    #[test]
    fn test_partial_sequence_waits_for_rest() {
        let mut buffer = new_buffer();
        buffer.append(b"\x1b[1;", false);
        assert_eq!(buffer.next_decoded(), None);
        assert!(!buffer.has_decodable_input());

        buffer.append(b"5A", false);
        assert!(buffer.has_decodable_input());
        assert_eq!(buffer.next_decoded(), Some(Decoded::symbol("ctrl_up")));
        assert!(buffer.pending().is_empty());
    }

    #[test]
    fn test_lone_esc_settles_when_drained() {
        let mut buffer = new_buffer();
        buffer.append(b"\x1b", true);
        assert_eq!(buffer.next_decoded(), None);

        buffer.mark_input_drained();
        assert_eq!(buffer.next_decoded(), Some(Decoded::symbol("esc")));
    }

    #[test]
    fn test_decodes_in_order() {
        let mut buffer = new_buffer();
        buffer.append(b"ab\x03", false);
        let mut decoded = vec![];
        while let Some(it) = buffer.next_decoded() {
            decoded.push(it.lookup_key().to_string());
        }
        assert_eq!(decoded, vec!["a", "b", "ctrl_c"]);
    }
}
