// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{InputQueue, InputSource, InputWaker, ReadOutcome, Readiness, TerminalSignal,
            Command};
use std::{collections::VecDeque,
          io,
          sync::Arc,
          time::{Duration, Instant}};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

#[derive(Debug, Clone, PartialEq, Eq)]
enum MockInputEvent {
    Bytes(Vec<u8>),
    Signal(TerminalSignal),
    Eof,
    Wake,
}

/// Test side handle of a [`MockInputSource`]: "type" bytes and deliver signals.
#[derive(Debug, Clone)]
pub struct MockInputHandle {
    sender: UnboundedSender<MockInputEvent>,
}

impl MockInputHandle {
    pub fn send_bytes(&self, bytes: impl Into<Vec<u8>>) {
        drop(self.sender.send(MockInputEvent::Bytes(bytes.into())));
    }

    pub fn send_signal(&self, signal: TerminalSignal) {
        drop(self.sender.send(MockInputEvent::Signal(signal)));
    }

    pub fn send_eof(&self) { drop(self.sender.send(MockInputEvent::Eof)); }
}

#[derive(Debug)]
struct MockWaker {
    sender: UnboundedSender<MockInputEvent>,
}

impl InputWaker for MockWaker {
    fn wake(&self) { drop(self.sender.send(MockInputEvent::Wake)); }
}

/// [`InputSource`] fed from a channel. Bytes sent through the [`MockInputHandle`]
/// become readable and stay buffered until read, like a tty.
#[derive(Debug)]
pub struct MockInputSource {
    receiver: UnboundedReceiver<MockInputEvent>,
    unread: VecDeque<u8>,
    eof: bool,
    waker: Arc<MockWaker>,
}

impl MockInputSource {
    #[must_use]
    pub fn new() -> (Self, MockInputHandle) {
        let (sender, receiver) = unbounded_channel();
        let source = Self {
            receiver,
            unread: VecDeque::new(),
            eof: false,
            waker: Arc::new(MockWaker {
                sender: sender.clone(),
            }),
        };
        (source, MockInputHandle { sender })
    }

    fn accept(&mut self, event: MockInputEvent) -> Readiness {
        match event {
            MockInputEvent::Bytes(bytes) => {
                self.unread.extend(bytes);
                Readiness::Input
            }
            MockInputEvent::Signal(signal) => Readiness::Signal(signal),
            MockInputEvent::Eof => {
                self.eof = true;
                Readiness::Input
            }
            MockInputEvent::Wake => Readiness::Woken,
        }
    }
}

impl InputSource for MockInputSource {
    fn wait_ready(&mut self) -> io::Result<Vec<Readiness>> {
        // The source holds a sender (via the waker) so this never sees a closed channel.
        let Some(first) = self.receiver.blocking_recv() else {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        };
        let mut ready = vec![self.accept(first)];
        while let Ok(event) = self.receiver.try_recv() {
            ready.push(self.accept(event));
        }
        Ok(ready)
    }

    fn read_available(&mut self, buffer: &mut [u8]) -> ReadOutcome {
        if self.unread.is_empty() {
            return if self.eof {
                ReadOutcome::Eof
            } else {
                ReadOutcome::WouldBlock
            };
        }
        let count = buffer.len().min(self.unread.len());
        for (slot, byte) in buffer.iter_mut().zip(self.unread.drain(..count)) {
            *slot = byte;
        }
        ReadOutcome::Data(count)
    }

    fn waker(&self) -> Arc<dyn InputWaker> { self.waker.clone() }
}

/// Poll `queue` until a command arrives or `timeout` passes.
pub fn pop_with_timeout(queue: &mut InputQueue, timeout: Duration) -> Option<Command> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(command) = queue.try_pop() {
            return Some(command);
        }
        if Instant::now() >= deadline {
            return None;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bytes_are_buffered_until_read() {
        let (mut source, handle) = MockInputSource::new();
        handle.send_bytes(b"abc".to_vec());
        handle.send_signal(TerminalSignal::Resize);
        assert_eq!(
            source.wait_ready().unwrap(),
            vec![Readiness::Input, Readiness::Signal(TerminalSignal::Resize)]
        );

        let mut buffer = [0u8; 2];
        assert_eq!(source.read_available(&mut buffer), ReadOutcome::Data(2));
        assert_eq!(&buffer, b"ab");
        assert_eq!(source.read_available(&mut buffer), ReadOutcome::Data(1));
        assert_eq!(source.read_available(&mut buffer), ReadOutcome::WouldBlock);
    }

    #[test]
    fn test_waker_and_eof() {
        let (mut source, handle) = MockInputSource::new();
        source.waker().wake();
        assert_eq!(source.wait_ready().unwrap(), vec![Readiness::Woken]);

        handle.send_eof();
        source.wait_ready().unwrap();
        assert_eq!(source.read_available(&mut [0u8; 4]), ReadOutcome::Eof);
    }
}
