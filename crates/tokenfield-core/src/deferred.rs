//! Single-threaded deferred work.
//!
//! A [`DeferredQueue`] holds actions scheduled during one event-loop
//! iteration and hands them back, in FIFO order, on the next. It never
//! spawns threads and has no timers: the owner drains it when the host's
//! loop comes back around.
//!
//! ```
//! use tokenfield_core::DeferredQueue;
//!
//! let mut queue = DeferredQueue::new();
//! queue.schedule("a");
//! queue.schedule("b");
//! assert_eq!(queue.drain(), vec!["a", "b"]);
//! assert!(queue.is_empty());
//! ```

use std::collections::VecDeque;

/// FIFO queue of actions to run on the next loop iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredQueue<T> {
    pending: VecDeque<T>,
}

impl<T> DeferredQueue<T> {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    /// Schedule `action` for the next iteration.
    pub fn schedule(&mut self, action: T) {
        self.pending.push_back(action);
    }

    /// Take every action scheduled so far.
    ///
    /// Actions scheduled while the returned batch is being processed land
    /// in the queue for the iteration after.
    pub fn drain(&mut self) -> Vec<T> {
        self.pending.drain(..).collect()
    }

    /// Number of pending actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending action.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
