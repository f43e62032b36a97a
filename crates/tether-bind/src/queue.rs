#![forbid(unsafe_code)]

//! Single-consumer task queue for control-thread dispatch.
//!
//! # Design
//!
//! Every interactive control is owned by one thread. Cross-thread updates
//! — and, just as importantly, same-thread updates that must not re-enter
//! the call stack that produced them — are posted to that thread's
//! [`UiQueue`] as boxed tasks and executed when the owner drains the
//! queue. This is the mechanism behind the anti-echo guarantee: a change
//! notification never runs synchronously inside the notification that
//! caused it.
//!
//! [`UiHandle`] is the cloneable, `Send` posting side. Posting after the
//! queue has been dropped is a silent no-op, which makes binding teardown
//! order irrelevant.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};

type Task = Box<dyn FnOnce() + Send>;

/// The consuming side of a control thread's task queue.
///
/// Not `Sync` by construction — exactly one thread owns and drains it.
pub struct UiQueue {
    sender: Sender<Task>,
    receiver: Receiver<Task>,
}

impl Default for UiQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl UiQueue {
    /// Create an empty queue owned by the calling thread.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// A posting handle for any thread.
    #[must_use]
    pub fn handle(&self) -> UiHandle {
        UiHandle {
            sender: self.sender.clone(),
        }
    }

    /// Run every task currently queued, including tasks posted by the
    /// tasks themselves, until the queue is empty. Returns the number of
    /// tasks executed.
    pub fn drain(&self) -> usize {
        let mut executed = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(task) => {
                    task();
                    executed += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return executed,
            }
        }
    }
}

/// Cloneable, `Send` posting handle onto a [`UiQueue`].
#[derive(Clone)]
pub struct UiHandle {
    sender: Sender<Task>,
}

impl UiHandle {
    /// Enqueue `task` for the owning thread's next drain. A no-op when
    /// the queue no longer exists.
    pub fn post(&self, task: impl FnOnce() + Send + 'static) {
        let _ = self.sender.send(Box::new(task));
    }
}

impl std::fmt::Debug for UiHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiHandle").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
