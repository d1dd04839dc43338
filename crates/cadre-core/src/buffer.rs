//! Ordered buffer with an optional capacity
//!
//! Backs agent inboxes, task history, and the registry's task log. With no
//! capacity the buffer grows without limit; with a capacity the oldest entry
//! is evicted once it is full.

use std::collections::VecDeque;

use serde::{Serialize, Serializer};

/// FIFO buffer with optional ring-buffer eviction
#[derive(Debug, Clone)]
pub struct BoundedBuffer<T> {
    items: VecDeque<T>,
    capacity: Option<usize>,
    evicted: u64,
}

impl<T> BoundedBuffer<T> {
    /// Create an unbounded buffer
    pub fn unbounded() -> Self {
        Self::with_capacity(None)
    }

    /// Create a buffer holding at most `capacity` items (None = unbounded)
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            items: VecDeque::new(),
            capacity,
            evicted: 0,
        }
    }

    /// Append an item, evicting the oldest one if the buffer is full.
    ///
    /// Returns the evicted item, if any.
    pub fn push(&mut self, item: T) -> Option<T> {
        let mut dropped = None;
        if let Some(cap) = self.capacity {
            if cap == 0 {
                self.evicted += 1;
                return Some(item);
            }
            if self.items.len() >= cap {
                dropped = self.items.pop_front();
                self.evicted += 1;
            }
        }
        self.items.push_back(item);
        dropped
    }

    /// Remove and return the oldest item
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Peek at the oldest item
    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    /// Number of items currently held
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of items evicted so far
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<T: Clone> BoundedBuffer<T> {
    /// Copy the contents out, oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl<T> Default for BoundedBuffer<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T: Serialize> Serialize for BoundedBuffer<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.items.iter())
    }
}
