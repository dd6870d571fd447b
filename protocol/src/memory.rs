use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::*;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MemoryStoreError {
    #[error("Store unavailable")]
    Unavailable,
}

/// [`ScoreStore`] kept in memory, every call completes immediately.
///
/// Fetches and writes can be made to fail on demand to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, LeaderboardEntry>>,
    writes: Cell<usize>,
    fail_fetches: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: impl IntoIterator<Item = LeaderboardEntry>) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().extend(
            entries
                .into_iter()
                .map(|entry| (entry.uid.clone(), entry)),
        );
        store
    }

    pub fn get(&self, uid: &str) -> Option<LeaderboardEntry> {
        self.entries.borrow().get(uid).cloned()
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetches.set(fail);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl ScoreStore for MemoryStore {
    type Error = MemoryStoreError;

    async fn fetch(&self, uid: &str) -> Result<Option<LeaderboardEntry>, Self::Error> {
        if self.fail_fetches.get() {
            return Err(MemoryStoreError::Unavailable);
        }
        Ok(self.get(uid))
    }

    async fn store(&self, entry: &LeaderboardEntry) -> Result<(), Self::Error> {
        if self.fail_writes.get() {
            return Err(MemoryStoreError::Unavailable);
        }
        self.entries
            .borrow_mut()
            .insert(entry.uid.clone(), entry.clone());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    async fn top(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, Self::Error> {
        if self.fail_fetches.get() {
            return Err(MemoryStoreError::Unavailable);
        }
        let mut entries: Vec<_> = self.entries.borrow().values().cloned().collect();
        rank(&mut entries);
        entries.truncate(limit as usize);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;

    fn entry(uid: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            uid: uid.to_string(),
            name: uid.to_uppercase(),
            score,
        }
    }

    #[test]
    fn top_returns_highest_scores_first() {
        let store = MemoryStore::with_entries((0..15).map(|i| entry(&format!("u{i:02}"), i * 3 % 17)));

        let top = store
            .top(LEADERBOARD_SIZE)
            .now_or_never()
            .unwrap()
            .unwrap();

        assert_eq!(top.len(), 10);
        assert!(top.windows(2).all(|pair| pair[0].score >= pair[1].score));
        assert_eq!(top[0].score, 16);
    }
}
