//! In-Memory Session Store Adapter
//!
//! Used in tests and by the in-memory dependency set. Expired records are
//! never returned and are dropped whenever a record is written.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, ExpiredDeletion, SessionStore};

/// In-memory storage for sessions
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    records: Arc<RwLock<HashMap<Id, Record>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, expired ones not yet evicted included
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn is_live(record: &Record, now: OffsetDateTime) -> bool {
    record.expiry_date > now
}

fn evict_expired(records: &mut HashMap<Id, Record>) {
    let now = OffsetDateTime::now_utc();
    records.retain(|_, record| is_live(record, now));
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let mut records = self.records.write().await;
        evict_expired(&mut records);
        while records.contains_key(&record.id) {
            record.id = Id::default();
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let mut records = self.records.write().await;
        evict_expired(&mut records);
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, id: &Id) -> session_store::Result<Option<Record>> {
        let now = OffsetDateTime::now_utc();
        Ok(self
            .records
            .read()
            .await
            .get(id)
            .filter(|record| is_live(record, now))
            .cloned())
    }

    async fn delete(&self, id: &Id) -> session_store::Result<()> {
        self.records.write().await.remove(id);
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for InMemorySessionStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        evict_expired(&mut *self.records.write().await);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_sessions::cookie::time::Duration;

    fn record(ttl: Duration) -> Record {
        Record {
            id: Id::default(),
            data: Default::default(),
            expiry_date: OffsetDateTime::now_utc() + ttl,
        }
    }

    #[tokio::test]
    async fn save_then_load() {
        let store = InMemorySessionStore::new();
        let record = record(Duration::minutes(1));
        store.save(&record).await.unwrap();
        let loaded = store.load(&record.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, record.id);
        assert_eq!(loaded.expiry_date, record.expiry_date);
    }

    #[tokio::test]
    async fn expired_records_are_absent() {
        let store = InMemorySessionStore::new();
        let record = record(Duration::seconds(-1));
        store.save(&record).await.unwrap();
        assert!(store.load(&record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn writes_evict_expired_records() {
        let store = InMemorySessionStore::new();
        for _ in 0..3 {
            store.save(&record(Duration::seconds(-1))).await.unwrap();
        }
        assert_eq!(store.len().await, 1);

        let live = record(Duration::minutes(1));
        store.save(&live).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert!(store.load(&live.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_expired_keeps_live_records() {
        let store = InMemorySessionStore::new();
        let live = record(Duration::minutes(1));
        store.save(&live).await.unwrap();
        store.save(&record(Duration::seconds(-1))).await.unwrap();
        assert_eq!(store.len().await, 2);

        store.delete_expired().await.unwrap();
        assert_eq!(store.len().await, 1);
        assert!(store.load(&live.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn create_never_overwrites_an_existing_id() {
        let store = InMemorySessionStore::new();
        let existing = record(Duration::minutes(1));
        store.save(&existing).await.unwrap();

        let mut fresh = record(Duration::minutes(1));
        fresh.id = existing.id;
        store.create(&mut fresh).await.unwrap();

        assert_ne!(fresh.id, existing.id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let store = InMemorySessionStore::new();
        let record = record(Duration::minutes(1));
        store.save(&record).await.unwrap();
        store.delete(&record.id).await.unwrap();
        assert!(store.is_empty().await);
        store.delete(&record.id).await.unwrap();
    }
}
