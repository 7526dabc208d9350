//! Flash messages parked between requests, keyed by session id.
//!
//! Entries expire after a fixed time and the store holds a bounded number
//! of sessions; when full, expired entries are pruned first and then the
//! oldest entry is evicted.

use std::time::{Duration, Instant};

use board_protocol::FlashMessage;
use dashmap::DashMap;

/// How long parked messages wait for their session to come back.
pub const DEFAULT_FLASH_TTL: Duration = Duration::from_secs(10 * 60);
/// Most sessions with parked messages at any one time.
pub const DEFAULT_FLASH_CAPACITY: usize = 10_000;

#[derive(Debug)]
struct Parked {
    messages: Vec<FlashMessage>,
    parked_at: Instant,
}

#[derive(Debug)]
pub struct FlashStore {
    pending: DashMap<String, Parked>,
    ttl: Duration,
    capacity: usize,
}

impl Default for FlashStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_FLASH_TTL, DEFAULT_FLASH_CAPACITY)
    }
}

impl FlashStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            pending: DashMap::new(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Remove and return everything pending for `session`.
    pub fn take(&self, session: &str) -> Vec<FlashMessage> {
        match self.pending.remove(session) {
            Some((_, parked)) if parked.parked_at.elapsed() < self.ttl => parked.messages,
            _ => Vec::new(),
        }
    }

    /// Queue messages for the next page `session` renders.
    pub fn push(&self, session: &str, messages: Vec<FlashMessage>) {
        if messages.is_empty() {
            return;
        }
        if !self.pending.contains_key(session) && self.pending.len() >= self.capacity {
            self.make_room();
        }

        let mut entry = self
            .pending
            .entry(session.to_string())
            .or_insert_with(|| Parked {
                messages: Vec::new(),
                parked_at: Instant::now(),
            });
        entry.messages.extend(messages);
        entry.parked_at = Instant::now();
    }

    /// Messages waiting for `session`.
    pub fn pending(&self, session: &str) -> usize {
        self.pending
            .get(session)
            .filter(|parked| parked.parked_at.elapsed() < self.ttl)
            .map(|parked| parked.messages.len())
            .unwrap_or(0)
    }

    /// Sessions with parked messages, expired or not.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn make_room(&self) {
        let ttl = self.ttl;
        self.pending.retain(|_, parked| parked.parked_at.elapsed() < ttl);
        if self.pending.len() < self.capacity {
            return;
        }

        let oldest = self
            .pending
            .iter()
            .min_by_key(|entry| entry.value().parked_at)
            .map(|entry| entry.key().clone());
        if let Some(session) = oldest {
            self.pending.remove(&session);
        }
    }
}
