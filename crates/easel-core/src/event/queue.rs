// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::Event;

/// Errors reported by the consumer side of an [`EventQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// `drain_one` was called with nothing pending.
    #[error("event queue is empty")]
    Empty,
}

/// A thread-safe FIFO of normalized input events.
///
/// Producers on the input context push through an [`EventProducer`]; the
/// scheduler owns the queue itself and drains it one event at a time. The
/// underlying channel is unbounded, so enqueueing never blocks and never
/// drops an event.
#[derive(Debug)]
pub struct EventQueue {
    sender: flume::Sender<Event>,
    receiver: flume::Receiver<Event>,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::debug!("Event queue initialized.");
        Self { sender, receiver }
    }

    /// Appends an event at the back of the queue.
    pub fn enqueue(&self, event: Event) {
        // The queue holds its own receiver, so the channel cannot be disconnected here.
        if let Err(e) = self.sender.send(event) {
            log::error!("Failed to enqueue event: {e}.");
        }
    }

    /// Returns a cloneable producer handle for another thread.
    pub fn producer(&self) -> EventProducer {
        EventProducer {
            sender: self.sender.clone(),
        }
    }

    /// Returns `true` if at least one event is waiting.
    pub fn has_pending(&self) -> bool {
        !self.receiver.is_empty()
    }

    /// Number of events waiting.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Returns `true` if nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Removes the oldest event.
    ///
    /// Never blocks: fails with [`QueueError::Empty`] if nothing is pending.
    pub fn drain_one(&self) -> Result<Event, QueueError> {
        self.receiver.try_recv().map_err(|_| QueueError::Empty)
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// The producer end of an [`EventQueue`], handed to the input context.
#[derive(Debug, Clone)]
pub struct EventProducer {
    sender: flume::Sender<Event>,
}

impl EventProducer {
    /// Appends an event at the back of the queue, logging an error if the
    /// queue has been dropped.
    pub fn enqueue(&self, event: Event) {
        log::trace!("Enqueueing {} event.", event.kind());

        if let Err(e) = self.sender.send(event) {
            log::error!("Failed to enqueue event: {e}. Scheduler likely torn down.");
        }
    }
}
