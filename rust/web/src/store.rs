use async_trait::async_trait;
use noughts_engine::game::{Match, MatchId};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Predicate used by [`RecordStore::list_where`].
pub type RecordFilter<'a> = &'a (dyn Fn(&Match) -> bool + Send + Sync);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("record store storage poisoned")]
    StoragePoisoned,
}

/// Persistence port for match records.
///
/// The directory is the only writer. Errors are surfaced unchanged to the
/// caller; the store never retries.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Loads one record, `None` when the id is unknown
    async fn get(&self, id: &MatchId) -> Result<Option<Match>, StoreError>;

    /// Inserts or replaces the record with the same id
    async fn put(&self, record: Match) -> Result<(), StoreError>;

    /// Records matching `filter`, in store order, at most `limit` of them
    async fn list_where(
        &self,
        filter: RecordFilter<'_>,
        limit: usize,
    ) -> Result<Vec<Match>, StoreError>;
}

#[derive(Debug, Default)]
struct Records {
    by_id: HashMap<MatchId, Match>,
    order: Vec<MatchId>,
}

/// Record store kept in process memory. Listing follows first-insertion order.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Records>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        self.records
            .read()
            .map(|guard| guard.order.len())
            .map_err(|_| StoreError::StoragePoisoned)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|len| len == 0)
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, id: &MatchId) -> Result<Option<Match>, StoreError> {
        let guard = self
            .records
            .read()
            .map_err(|_| StoreError::StoragePoisoned)?;
        Ok(guard.by_id.get(id).cloned())
    }

    async fn put(&self, record: Match) -> Result<(), StoreError> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| StoreError::StoragePoisoned)?;
        let id = record.id.clone();
        if guard.by_id.insert(id.clone(), record).is_none() {
            guard.order.push(id);
        }
        Ok(())
    }

    async fn list_where(
        &self,
        filter: RecordFilter<'_>,
        limit: usize,
    ) -> Result<Vec<Match>, StoreError> {
        let guard = self
            .records
            .read()
            .map_err(|_| StoreError::StoragePoisoned)?;
        Ok(guard
            .order
            .iter()
            .filter_map(|id| guard.by_id.get(id))
            .filter(|record| filter(record))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noughts_engine::board::{Coord, Mark};

    fn record(id: &str) -> Match {
        Match::new(MatchId::new(id), "Blue Squid", Mark::X)
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = InMemoryRecordStore::new();
        assert_eq!(store.get(&MatchId::new("a")).await, Ok(None));

        store.put(record("a")).await.expect("put");
        let loaded = store.get(&MatchId::new("a")).await.expect("get");
        assert_eq!(loaded, Some(record("a")));
    }

    #[tokio::test]
    async fn upsert_keeps_original_position() {
        let store = InMemoryRecordStore::new();
        for id in ["a", "b", "c"] {
            store.put(record(id)).await.expect("put");
        }
        let updated = record("a")
            .apply_move(Coord::new(1, 1))
            .expect("move");
        store.put(updated.clone()).await.expect("put");

        let all = store.list_where(&|_: &Match| true, 10).await.expect("list");
        let ids: Vec<_> = all.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(all[0], updated);
        assert_eq!(store.len(), Ok(3));
    }

    #[tokio::test]
    async fn list_where_filters_and_limits() {
        let store = InMemoryRecordStore::new();
        for id in ["a", "b", "c", "d"] {
            store.put(record(id)).await.expect("put");
        }
        let picked = store
            .list_where(&|m: &Match| m.id.as_str() != "b", 2)
            .await
            .expect("list");
        let ids: Vec<_> = picked.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);

        assert!(store.list_where(&|_: &Match| true, 0).await.expect("list").is_empty());
    }
}
