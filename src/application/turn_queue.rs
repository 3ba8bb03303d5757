//! Per-conversation turn ordering.
//!
//! Slots are reserved synchronously, in arrival order, by the dispatch loop.
//! Each slot waits for the previous slot of the same key to be dropped, so
//! turns of one conversation run one at a time and in the order received,
//! while different keys run concurrently.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::domain::foundation::ConversationKey;

/// Chain of pending turns per conversation key.
#[derive(Debug, Default)]
pub struct TurnQueue {
    tails: Mutex<HashMap<ConversationKey, oneshot::Receiver<()>>>,
}

impl TurnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the next slot for `key`. Call in arrival order.
    ///
    /// Keys whose last slot is already released are pruned here.
    pub fn reserve(&self, key: &ConversationKey) -> TurnSlot {
        let mut tails = self.tails.lock().unwrap_or_else(|p| p.into_inner());
        tails.retain(|_, tail| matches!(tail.try_recv(), Err(TryRecvError::Empty)));

        let (done, tail) = oneshot::channel();
        let previous = tails.insert(key.clone(), tail);
        TurnSlot { previous, _done: done }
    }

    /// Number of keys with an unreleased slot.
    pub fn len(&self) -> usize {
        let mut tails = self.tails.lock().unwrap_or_else(|p| p.into_inner());
        tails.retain(|_, tail| matches!(tail.try_recv(), Err(TryRecvError::Empty)));
        tails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A reserved place in a conversation's turn order.
///
/// Dropping the slot releases the next one.
#[derive(Debug)]
pub struct TurnSlot {
    previous: Option<oneshot::Receiver<()>>,
    _done: oneshot::Sender<()>,
}

impl TurnSlot {
    /// Waits until every earlier slot of the same key is released.
    pub async fn ready(&mut self) {
        if let Some(previous) = self.previous.take() {
            // Nothing is ever sent; the sender dropping is the signal.
            let _ = previous.await;
        }
    }
}
