// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Command, DEBUG_TERM_CONTROLLER};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, error::TryRecvError,
                        unbounded_channel};

/// Cloneable producer side of the [`InputQueue`]. The reader thread holds one, and
/// any code can hold another to inject commands (eg: a timer pushing `tick`).
#[derive(Debug, Clone)]
pub struct InputQueueSender {
    inner: UnboundedSender<Command>,
}

impl InputQueueSender {
    /// Returns `false` if the queue has been dropped.
    pub fn push(&self, command: Command) -> bool {
        match self.inner.send(command) {
            Ok(()) => true,
            Err(err) => {
                DEBUG_TERM_CONTROLLER.then(|| {
                    // % is Display, ? is Debug.
                    tracing::debug!(
                        message = "Input queue dropped, command discarded.",
                        command = %err.0
                    );
                });
                false
            }
        }
    }
}

/// Unbounded FIFO of resolved commands. Order is preserved and nothing is coalesced.
///
/// Consume it from a plain thread with [`InputQueue::pop`] or from async code with
/// [`InputQueue::pop_async`].
#[derive(Debug)]
pub struct InputQueue {
    sender: InputQueueSender,
    receiver: UnboundedReceiver<Command>,
}

impl Default for InputQueue {
    fn default() -> Self { Self::new() }
}

impl InputQueue {
    #[must_use]
    pub fn new() -> Self {
        let (inner, receiver) = unbounded_channel();
        Self {
            sender: InputQueueSender { inner },
            receiver,
        }
    }

    #[must_use]
    pub fn sender(&self) -> InputQueueSender { self.sender.clone() }

    pub fn push(&self, command: Command) { self.sender.push(command); }

    /// Block the current thread until a command is available.
    ///
    /// # Panics
    ///
    /// If called from inside an async runtime, use [`InputQueue::pop_async`] there.
    pub fn pop(&mut self) -> Option<Command> { self.receiver.blocking_recv() }

    pub async fn pop_async(&mut self) -> Option<Command> { self.receiver.recv().await }

    /// Next command if one is queued right now.
    pub fn try_pop(&mut self) -> Option<Command> {
        match self.receiver.try_recv() {
            Ok(command) => Some(command),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize { self.receiver.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.receiver.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fifo_order() {
        let mut queue = InputQueue::new();
        let sender = queue.sender();
        sender.push(Command::new("a"));
        queue.push(Command::new("b"));
        sender.push(Command::new("c"));

        assert_eq!(queue.len(), 3);
        let popped: Vec<_> = std::iter::from_fn(|| queue.try_pop())
            .map(|it| it.name().to_string())
            .collect();
        assert_eq!(popped, vec!["a", "b", "c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pop_blocks_until_pushed_from_other_thread() {
        let mut queue = InputQueue::new();
        let sender = queue.sender();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            sender.push(Command::new("quit"));
        });
        assert_eq!(queue.pop(), Some(Command::new("quit")));
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn test_pop_async() {
        let mut queue = InputQueue::new();
        queue.sender().push(Command::resize());
        assert_eq!(queue.pop_async().await, Some(Command::resize()));
    }

    #[test]
    fn test_push_after_drop_returns_false() {
        let queue = InputQueue::new();
        let sender = queue.sender();
        drop(queue);
        assert!(!sender.push(Command::new("lost")));
    }
}
