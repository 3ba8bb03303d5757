//! In-Memory Conversation Store Adapter
//!
//! Keeps history and flow state for every conversation in one map behind a
//! single lock, so a turn's commit is observed all-or-nothing. Nothing
//! survives a restart.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::Turn;
use crate::domain::dialogue::FlowState;
use crate::domain::foundation::{ConversationKey, Timestamp};
use crate::ports::{ConversationStore, StateUpdate, StoreError, TurnCommit};

/// Default number of turns retained per conversation.
pub const DEFAULT_HISTORY_LIMIT: usize = 16;

/// Default idle time after which a conversation is forgotten.
pub const DEFAULT_IDLE_TTL_SECS: u64 = 1800;

type Clock = Arc<dyn Fn() -> Timestamp + Send + Sync>;

#[derive(Debug, Clone)]
struct ConversationEntry {
    history: VecDeque<Turn>,
    state: Option<FlowState>,
    touched_at: Timestamp,
}

impl ConversationEntry {
    fn new(now: Timestamp) -> Self {
        Self {
            history: VecDeque::new(),
            state: None,
            touched_at: now,
        }
    }

    fn push(&mut self, turn: Turn, limit: usize) {
        self.history.push_back(turn);
        while self.history.len() > limit {
            self.history.pop_front();
        }
    }
}

/// In-memory storage for conversation history and flow state
#[derive(Clone)]
pub struct InMemoryConversationStore {
    entries: Arc<RwLock<HashMap<ConversationKey, ConversationEntry>>>,
    history_limit: usize,
    idle_ttl_secs: u64,
    clock: Clock,
}

impl std::fmt::Debug for InMemoryConversationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryConversationStore")
            .field("history_limit", &self.history_limit)
            .field("idle_ttl_secs", &self.idle_ttl_secs)
            .finish_non_exhaustive()
    }
}

impl InMemoryConversationStore {
    /// Create a store with default limits
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_HISTORY_LIMIT, DEFAULT_IDLE_TTL_SECS)
    }

    /// Create a store with explicit history cap and idle TTL
    pub fn with_limits(history_limit: usize, idle_ttl_secs: u64) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            history_limit: history_limit.max(1),
            idle_ttl_secs,
            clock: Arc::new(Timestamp::now),
        }
    }

    /// Replace the time source (tests)
    pub fn with_clock(mut self, clock: impl Fn() -> Timestamp + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Number of live conversations
    pub async fn conversation_count(&self) -> usize {
        self.entries.read().await.len()
    }

    fn is_expired(&self, entry: &ConversationEntry, now: &Timestamp) -> bool {
        entry.touched_at.is_older_than(self.idle_ttl_secs, now)
    }

    /// Drops idle conversations. Runs on every write.
    fn evict_idle(&self, entries: &mut HashMap<ConversationKey, ConversationEntry>, now: &Timestamp) {
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry, now));
        let evicted = before - entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted idle conversations");
        }
    }

    async fn read_entry<T>(
        &self,
        key: &ConversationKey,
        f: impl FnOnce(&ConversationEntry) -> T,
    ) -> Option<T> {
        let now = (self.clock)();
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !self.is_expired(entry, &now))
            .map(f)
    }

    async fn write_entry(&self, key: &ConversationKey, f: impl FnOnce(&mut ConversationEntry)) {
        let now = (self.clock)();
        let mut entries = self.entries.write().await;
        self.evict_idle(&mut entries, &now);
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| ConversationEntry::new(now));
        f(entry);
        entry.touched_at = now;
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append_turn(&self, key: &ConversationKey, turn: Turn) -> Result<(), StoreError> {
        let limit = self.history_limit;
        self.write_entry(key, |entry| entry.push(turn, limit)).await;
        Ok(())
    }

    async fn get_history(&self, key: &ConversationKey) -> Result<Vec<Turn>, StoreError> {
        Ok(self
            .read_entry(key, |entry| entry.history.iter().cloned().collect())
            .await
            .unwrap_or_default())
    }

    async fn get_state(&self, key: &ConversationKey) -> Result<Option<FlowState>, StoreError> {
        Ok(self.read_entry(key, |entry| entry.state.clone()).await.flatten())
    }

    async fn set_state(&self, key: &ConversationKey, state: FlowState) -> Result<(), StoreError> {
        self.write_entry(key, |entry| entry.state = Some(state)).await;
        Ok(())
    }

    async fn clear(&self, key: &ConversationKey) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn commit(&self, key: &ConversationKey, commit: TurnCommit) -> Result<(), StoreError> {
        if commit.state == StateUpdate::Clear {
            return self.clear(key).await;
        }

        let limit = self.history_limit;
        self.write_entry(key, |entry| {
            for turn in commit.turns {
                entry.push(turn, limit);
            }
            if let StateUpdate::Replace(state) = commit.state {
                entry.state = Some(state);
            }
        })
        .await;
        Ok(())
    }
}
