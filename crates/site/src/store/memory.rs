//! In-process content store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{ContentStore, SectionRecord, StoreError, UserRecord};

/// A content store held in memory.
///
/// Backs the `memory` configuration and the test suites. Reads and writes
/// can be made to fail independently to simulate an unreachable store.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    sections: Mutex<BTreeMap<String, SectionRecord>>,
    users: Mutex<Vec<UserRecord>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    upserts: AtomicUsize,
}

impl MemoryContentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an editor account.
    #[must_use]
    pub fn with_user(self, user: UserRecord) -> Self {
        if let Ok(mut users) = self.users.lock() {
            users.push(user);
        }
        self
    }

    /// Make reads fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of upserts attempted, failed ones included.
    #[must_use]
    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    /// The stored row for a section, if any.
    #[must_use]
    pub fn record(&self, section: &str) -> Option<SectionRecord> {
        self.sections.lock().ok()?.get(section).cloned()
    }

    fn sections(&self) -> Result<MutexGuard<'_, BTreeMap<String, SectionRecord>>, StoreError> {
        self.sections
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn read_all_sections(&self) -> Result<Vec<SectionRecord>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        Ok(self.sections()?.values().cloned().collect())
    }

    async fn upsert_section(&self, record: &SectionRecord) -> Result<(), StoreError> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        self.sections()?
            .insert(record.section.clone(), record.clone());
        Ok(())
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        let users = self
            .users
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }
}
