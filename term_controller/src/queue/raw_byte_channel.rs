// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, error::TryRecvError,
                        unbounded_channel};

/// Bytes read while the controller is in [`crate::Mode::Raw`], forwarded verbatim
/// (no decoding, no binding lookup).
pub type RawBytesSender = UnboundedSender<Vec<u8>>;

/// Consumer side of the raw byte channel, used inside a
/// [`crate::TermController::with_raw`] block.
#[derive(Debug)]
pub struct RawBytesReceiver {
    inner: UnboundedReceiver<Vec<u8>>,
}

#[must_use]
pub fn raw_byte_channel() -> (RawBytesSender, RawBytesReceiver) {
    let (sender, inner) = unbounded_channel();
    (sender, RawBytesReceiver { inner })
}

impl RawBytesReceiver {
    /// Block until the next chunk arrives.
    pub fn read_blocking(&mut self) -> Option<Vec<u8>> { self.inner.blocking_recv() }

    pub async fn read(&mut self) -> Option<Vec<u8>> { self.inner.recv().await }

    pub fn try_read(&mut self) -> Option<Vec<u8>> {
        match self.inner.try_recv() {
            Ok(bytes) => Some(bytes),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Discard bytes left over from an earlier raw block.
    pub fn clear(&mut self) { while self.try_read().is_some() {} }
}
