// Copyright 2025 Fernando Borretti
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

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
#[cfg(test)]
use tokio::sync::broadcast::error::TryRecvError;

use crate::types::problem::ProblemId;

/// Events buffered per subscriber before it is considered lagging.
const CAPACITY: usize = 64;

/// Something changed in the store.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ChangeEvent {
    Inserted(ProblemId),
    Updated(ProblemId),
    Deleted(ProblemId),
    Cleared,
    /// The data changed in a way this process didn't observe directly (e.g.
    /// another process wrote to the database). Subscribers should reload.
    External,
}

pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, event: ChangeEvent) {
        log::debug!("Change: {event:?}");
        // Sending only fails when nobody is listening.
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// A handle on the change feed. Dropping it (or calling `unsubscribe`)
/// detaches it from the feed.
pub struct Subscription {
    rx: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    /// Wait for the next event. Returns `None` once the store is gone.
    ///
    /// A subscriber that fell behind receives a single `External` event in
    /// place of the events it missed.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        match self.rx.recv().await {
            Ok(event) => Some(event),
            Err(RecvError::Lagged(missed)) => {
                log::debug!("Subscriber missed {missed} events, forcing reload.");
                Some(ChangeEvent::External)
            }
            Err(RecvError::Closed) => None,
        }
    }

    /// Non-blocking version of `next`. Returns `None` if no event is pending.
    #[cfg(test)]
    pub fn try_next(&mut self) -> Option<ChangeEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Lagged(_)) => Some(ChangeEvent::External),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => None,
        }
    }

    pub fn unsubscribe(self) {
        drop(self.rx);
    }
}
