//! Content sync engine.
//!
//! Holds the payload of every section and keeps three copies in step:
//!
//! - the in-memory state views read from (a `watch` channel),
//! - the remote content store (one upserted row per section),
//! - a local fallback snapshot of all sections, used when the store cannot
//!   be reached at startup.
//!
//! Edits are optimistic. The merged payload is visible immediately, the
//! remote write happens afterwards, and its outcome only changes the
//! section's [`SyncStatus`]. Overlapping edits are not serialized: the store
//! keeps whichever write lands last.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map as JsonMap, Value as JsonValue};
use thiserror::Error;
use tokio::sync::{OnceCell, watch};
use tracing::instrument;

use stagefront_core::SectionName;
use stagefront_core::content::{FallbackSnapshot, SectionContent, SectionPatch, SiteContent};

use crate::storage::{CONTENT_KEY, LocalStorage, load_json, save_json};
use crate::store::{ContentStore, SectionRecord, StoreError};

/// Where the content shown after startup came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Remote,
    LocalFallback,
    Defaults,
}

/// Startup progress. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Uninitialized,
    Loaded(ContentSource),
}

/// Outcome of the latest remote write for a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Pending,
    Synced,
    Failed,
}

/// Sync bookkeeping for one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSync {
    pub status: SyncStatus,
    /// Bumped by every edit; a write only reports back if it is still current.
    pub revision: u64,
}

/// Everything a content view renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentState {
    pub content: SiteContent,
    pub phase: LoadPhase,
    /// Sections edited since startup. Untouched sections have no entry.
    pub sync: BTreeMap<SectionName, SectionSync>,
}

/// Sections pushed by a successful seed, in push order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub sections: Vec<SectionName>,
}

/// A seed that stopped at a failing section.
#[derive(Debug, Error)]
#[error("seeding stopped at {section} after {seeded} section(s): {source}")]
pub struct SeedError {
    pub section: SectionName,
    /// Sections written before the failure.
    pub seeded: usize,
    #[source]
    pub source: SeedFailure,
}

/// Why a section could not be seeded.
#[derive(Debug, Error)]
pub enum SeedFailure {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("could not encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The content service.
pub struct ContentSync {
    store: Arc<dyn ContentStore>,
    storage: Arc<dyn LocalStorage>,
    state: watch::Sender<ContentState>,
    init: OnceCell<ContentSource>,
}

impl std::fmt::Debug for ContentSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentSync")
            .field("store", &self.store.backend())
            .field("phase", &self.state.borrow().phase)
            .finish_non_exhaustive()
    }
}

impl ContentSync {
    /// Create the engine holding the compiled-in defaults.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>, storage: Arc<dyn LocalStorage>) -> Self {
        let (state, _) = watch::channel(ContentState::default());
        Self {
            store,
            storage,
            state,
            init: OnceCell::new(),
        }
    }

    /// Load content from the store, or from the local fallback if the store
    /// cannot be read.
    ///
    /// Runs once; later calls return the first call's result.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> ContentSource {
        *self.init.get_or_init(|| self.load()).await
    }

    async fn load(&self) -> ContentSource {
        match self.store.read_all_sections().await {
            Ok(records) => {
                let mut content = self.content();
                for record in records {
                    if let Some(patch) = decode_record(record) {
                        content.apply(patch);
                    }
                }
                self.finish_load(content, ContentSource::Remote)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    backend = self.store.backend(),
                    "Failed to load content from store, trying local fallback"
                );
                let mut content = self.content();
                let source = self.restore_fallback(&mut content);
                self.finish_load(content, source)
            }
        }
    }

    /// Merge the local fallback blob over `content`, section by section.
    fn restore_fallback(&self, content: &mut SiteContent) -> ContentSource {
        let stored = load_json::<JsonMap<String, JsonValue>>(self.storage.as_ref(), CONTENT_KEY);
        let blob = match stored {
            Ok(Some(blob)) => blob,
            Ok(None) => return ContentSource::Defaults,
            Err(e) => {
                tracing::warn!(error = %e, "Local content fallback is unreadable");
                return ContentSource::Defaults;
            }
        };

        let report = FallbackSnapshot::restore_json(blob, content);
        for (section, e) in &report.skipped {
            tracing::warn!(section = %section, error = %e, "Skipping unparseable fallback section");
        }
        if report.restored.is_empty() {
            ContentSource::Defaults
        } else {
            tracing::info!(
                restored = report.restored.len(),
                "Restored content from local fallback"
            );
            ContentSource::LocalFallback
        }
    }

    fn finish_load(&self, content: SiteContent, source: ContentSource) -> ContentSource {
        self.state.send_modify(|state| {
            state.content = content;
            state.phase = LoadPhase::Loaded(source);
        });
        source
    }

    /// Apply an edit to one section.
    ///
    /// The merged payload is visible to readers as soon as this is called.
    /// The remote write follows; a failure there is logged and recorded as
    /// [`SyncStatus::Failed`] but not returned. The local fallback snapshot
    /// is written either way.
    ///
    /// Returns the section's payload after the merge.
    #[instrument(skip(self, patch), fields(section = %patch.section()))]
    pub async fn update_section(&self, patch: SectionPatch) -> SectionContent {
        let section = patch.section();

        let mut applied = None;
        self.state.send_modify(|state| {
            let merged = state.content.apply(patch);
            let revision = state.sync.get(&section).map_or(1, |s| s.revision + 1);
            state.sync.insert(
                section,
                SectionSync {
                    status: SyncStatus::Pending,
                    revision,
                },
            );
            applied = Some((merged, revision));
        });
        let (merged, revision) =
            applied.unwrap_or_else(|| unreachable!("send_modify runs its closure exactly once"));

        let status = match self.push(&merged).await {
            Ok(()) => SyncStatus::Synced,
            Err(e) => {
                tracing::error!(section = %section, error = %e, "Failed to save content to store");
                SyncStatus::Failed
            }
        };

        self.state.send_if_modified(|state| match state.sync.get_mut(&section) {
            Some(sync) if sync.revision == revision => {
                sync.status = status;
                true
            }
            _ => false,
        });

        self.save_fallback();
        merged
    }

    /// Push every section's current payload to the store, in page order.
    ///
    /// Stops at the first failure.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` naming the section that could not be written.
    #[instrument(skip(self))]
    pub async fn seed_remote(&self) -> Result<SeedReport, SeedError> {
        let content = self.content();
        let mut sections = Vec::with_capacity(SectionName::ALL.len());

        for section in SectionName::ALL {
            if let Err(source) = self.push(&content.section(section)).await {
                tracing::error!(section = %section, error = %source, "Seeding failed");
                return Err(SeedError {
                    section,
                    seeded: sections.len(),
                    source,
                });
            }
            sections.push(section);
        }

        tracing::info!(count = sections.len(), "Seeded content store");
        Ok(SeedReport { sections })
    }

    /// Restore the compiled-in defaults and drop the local fallback.
    ///
    /// The remote store is left as it is.
    #[instrument(skip(self))]
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            state.content = SiteContent::default();
            state.sync.clear();
        });
        if let Err(e) = self.storage.remove(CONTENT_KEY) {
            tracing::warn!(error = %e, "Failed to remove local content fallback");
        }
    }

    /// A copy of all current content.
    #[must_use]
    pub fn content(&self) -> SiteContent {
        self.state.borrow().content.clone()
    }

    /// A copy of one section's current payload.
    #[must_use]
    pub fn section(&self, name: SectionName) -> SectionContent {
        self.state.borrow().content.section(name)
    }

    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        self.state.borrow().phase
    }

    /// Sync status of a section's latest edit; `None` if it was never edited.
    #[must_use]
    pub fn sync_status(&self, name: SectionName) -> Option<SyncStatus> {
        self.state.borrow().sync.get(&name).map(|s| s.status)
    }

    /// Watch content for changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ContentState> {
        self.state.subscribe()
    }

    async fn push(&self, payload: &SectionContent) -> Result<(), SeedFailure> {
        let record = SectionRecord::now(payload.section(), payload.to_json()?);
        self.store.upsert_section(&record).await?;
        Ok(())
    }

    fn save_fallback(&self) {
        let snapshot = FallbackSnapshot::from(&self.state.borrow().content);
        if let Err(e) = save_json(self.storage.as_ref(), CONTENT_KEY, &snapshot) {
            tracing::warn!(error = %e, "Failed to save local content fallback");
        }
    }
}

/// Decode a stored row as a partial payload, logging and skipping rows this
/// build cannot use. Fields the row leaves out keep their current value.
fn decode_record(record: SectionRecord) -> Option<SectionPatch> {
    let section = match record.section.parse::<SectionName>() {
        Ok(section) => section,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping stored row");
            return None;
        }
    };
    match SectionPatch::from_json(section, record.data) {
        Ok(patch) => Some(patch),
        Err(e) => {
            tracing::warn!(section = %section, error = %e, "Skipping unparseable stored payload");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;
    use stagefront_core::content::{HeroPatch, MerchItem};
    use tokio::sync::Semaphore;

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::{MemoryContentStore, UserRecord};

    struct Fixture {
        store: Arc<MemoryContentStore>,
        storage: Arc<MemoryStorage>,
        sync: ContentSync,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryContentStore::new());
        let storage = Arc::new(MemoryStorage::new());
        let sync = ContentSync::new(
            Arc::clone(&store) as Arc<dyn ContentStore>,
            Arc::clone(&storage) as Arc<dyn LocalStorage>,
        );
        Fixture {
            store,
            storage,
            sync,
        }
    }

    fn hero_title(title: &str) -> SectionPatch {
        SectionPatch::Hero(HeroPatch {
            title: Some(title.to_string()),
            ..HeroPatch::default()
        })
    }

    #[tokio::test]
    async fn test_initialize_from_remote() {
        let f = fixture();
        f.store
            .upsert_section(&SectionRecord::now(
                SectionName::Contact,
                json!({"email": "x@y.co", "phone": "1", "location": "Accra"}),
            ))
            .await
            .unwrap();

        assert_eq!(f.sync.initialize().await, ContentSource::Remote);
        assert_eq!(f.sync.content().contact.location, "Accra");
        assert_eq!(f.sync.content().hero, SiteContent::default().hero);
        assert_eq!(f.sync.phase(), LoadPhase::Loaded(ContentSource::Remote));
    }

    #[tokio::test]
    async fn test_initialize_skips_bad_rows() {
        let f = fixture();
        f.store
            .upsert_section(&SectionRecord {
                section: "community".to_string(),
                data: json!({}),
                updated_at: chrono::Utc::now(),
            })
            .await
            .unwrap();
        f.store
            .upsert_section(&SectionRecord::now(SectionName::Merch, json!({"oops": true})))
            .await
            .unwrap();

        assert_eq!(f.sync.initialize().await, ContentSource::Remote);
        assert_eq!(f.sync.content(), SiteContent::default());
    }

    #[tokio::test]
    async fn test_initialize_falls_back_to_local_snapshot() {
        let f = fixture();
        f.store.set_fail_reads(true);
        f.storage
            .set(CONTENT_KEY, r#"{"heroContent": {"title": "X"}}"#)
            .unwrap();

        assert_eq!(f.sync.initialize().await, ContentSource::LocalFallback);
        let hero = f.sync.content().hero;
        assert_eq!(hero.title, "X");
        assert_eq!(hero.tagline, SiteContent::default().hero.tagline);
    }

    #[tokio::test]
    async fn test_fallback_keeps_good_sections_when_one_is_bad() {
        let f = fixture();
        f.store.set_fail_reads(true);
        let blob = json!({
            "heroContent": {"title": "Kept", "tagline": "t", "cta": "c"},
            "merchItems": [{"id": "m1"}]
        });
        f.storage.set(CONTENT_KEY, &blob.to_string()).unwrap();

        assert_eq!(f.sync.initialize().await, ContentSource::LocalFallback);
        assert_eq!(f.sync.content().hero.title, "Kept");
        assert_eq!(f.sync.content().merch, SiteContent::default().merch);
    }

    #[tokio::test]
    async fn test_fallback_with_no_usable_section_uses_defaults() {
        let f = fixture();
        f.store.set_fail_reads(true);
        f.storage
            .set(CONTENT_KEY, r#"{"merchItems": [{"id": "m1"}]}"#)
            .unwrap();

        assert_eq!(f.sync.initialize().await, ContentSource::Defaults);
        assert_eq!(f.sync.content(), SiteContent::default());
    }

    #[tokio::test]
    async fn test_partial_remote_row_merges_over_defaults() {
        let f = fixture();
        f.store
            .upsert_section(&SectionRecord::now(SectionName::Hero, json!({"title": "Remote"})))
            .await
            .unwrap();

        assert_eq!(f.sync.initialize().await, ContentSource::Remote);
        let hero = f.sync.content().hero;
        assert_eq!(hero.title, "Remote");
        assert_eq!(hero.cta, SiteContent::default().hero.cta);
    }

    #[tokio::test]
    async fn test_initialize_with_nothing_uses_defaults() {
        let f = fixture();
        f.store.set_fail_reads(true);
        f.storage.set(CONTENT_KEY, "not json").unwrap();

        assert_eq!(f.sync.initialize().await, ContentSource::Defaults);
        assert_eq!(f.sync.content(), SiteContent::default());
    }

    #[tokio::test]
    async fn test_initialize_runs_once() {
        let f = fixture();
        assert_eq!(f.sync.initialize().await, ContentSource::Remote);

        f.store.set_fail_reads(true);
        assert_eq!(f.sync.initialize().await, ContentSource::Remote);
    }

    #[tokio::test]
    async fn test_update_syncs_remote_and_fallback() {
        let f = fixture();
        f.sync.update_section(hero_title("New")).await;

        assert_eq!(f.sync.sync_status(SectionName::Hero), Some(SyncStatus::Synced));
        let stored = f.store.record("hero").unwrap();
        assert_eq!(stored.data["title"], json!("New"));
        assert_eq!(stored.data["cta"], json!("Listen Now"));

        let snapshot: FallbackSnapshot = load_json(f.storage.as_ref(), CONTENT_KEY)
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.hero_content.unwrap().title, "New");
    }

    #[tokio::test]
    async fn test_failed_upsert_keeps_optimistic_value() {
        let f = fixture();
        f.store.set_fail_writes(true);

        let merged = f.sync.update_section(hero_title("Offline")).await;

        let SectionContent::Hero(hero) = merged else {
            panic!("expected hero payload");
        };
        assert_eq!(hero.title, "Offline");
        assert_eq!(f.sync.content().hero.title, "Offline");
        assert_eq!(f.sync.sync_status(SectionName::Hero), Some(SyncStatus::Failed));

        let snapshot: FallbackSnapshot = load_json(f.storage.as_ref(), CONTENT_KEY)
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.hero_content.unwrap().title, "Offline");
    }

    /// A store whose writes wait until the test releases them.
    struct GatedStore {
        inner: MemoryContentStore,
        gate: Semaphore,
    }

    #[async_trait]
    impl ContentStore for GatedStore {
        fn backend(&self) -> &'static str {
            "gated"
        }

        async fn read_all_sections(&self) -> Result<Vec<SectionRecord>, StoreError> {
            self.inner.read_all_sections().await
        }

        async fn upsert_section(&self, record: &SectionRecord) -> Result<(), StoreError> {
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            permit.forget();
            self.inner.upsert_section(record).await
        }

        async fn find_user_by_username(
            &self,
            username: &str,
        ) -> Result<Option<UserRecord>, StoreError> {
            self.inner.find_user_by_username(username).await
        }
    }

    #[tokio::test]
    async fn test_merch_update_visible_before_confirmation() {
        let store = Arc::new(GatedStore {
            inner: MemoryContentStore::new(),
            gate: Semaphore::new(0),
        });
        let sync = Arc::new(ContentSync::new(
            Arc::clone(&store) as Arc<dyn ContentStore>,
            Arc::new(MemoryStorage::new()),
        ));
        let mut rx = sync.subscribe();
        rx.mark_unchanged();
        let items = vec![MerchItem::new_placeholder(42)];

        let task = tokio::spawn({
            let sync = Arc::clone(&sync);
            let patch = SectionPatch::Merch(items.clone());
            async move { sync.update_section(patch).await }
        });

        // The store write is still blocked here.
        rx.changed().await.unwrap();
        assert_eq!(sync.content().merch, items);
        assert_eq!(sync.sync_status(SectionName::Merch), Some(SyncStatus::Pending));
        assert!(store.inner.record("merch").is_none());

        store.gate.add_permits(1);
        task.await.unwrap();
        assert_eq!(sync.sync_status(SectionName::Merch), Some(SyncStatus::Synced));
        assert!(store.inner.record("merch").is_some());
    }

    #[tokio::test]
    async fn test_revisions_increase() {
        let f = fixture();
        f.sync.update_section(hero_title("A")).await;
        f.sync.update_section(hero_title("B")).await;

        let state = f.sync.subscribe().borrow().clone();
        assert_eq!(state.sync[&SectionName::Hero].revision, 2);
        assert_eq!(state.content.hero.title, "B");
    }

    #[tokio::test]
    async fn test_seed_pushes_every_section() {
        let f = fixture();
        let report = f.sync.seed_remote().await.unwrap();

        assert_eq!(report.sections, SectionName::ALL.to_vec());
        for section in SectionName::ALL {
            assert!(f.store.record(section.as_str()).is_some());
        }
    }

    #[tokio::test]
    async fn test_seed_stops_at_first_failure() {
        let f = fixture();
        f.store.set_fail_writes(true);

        let err = f.sync.seed_remote().await.unwrap_err();

        assert_eq!(err.section, SectionName::Hero);
        assert_eq!(err.seeded, 0);
        assert_eq!(f.store.upsert_count(), 1);
    }

    #[tokio::test]
    async fn test_reset_restores_defaults_and_drops_fallback() {
        let f = fixture();
        f.sync.update_section(hero_title("Edited")).await;
        assert!(f.storage.get(CONTENT_KEY).unwrap().is_some());

        f.sync.reset();

        assert_eq!(f.sync.content(), SiteContent::default());
        assert!(f.storage.get(CONTENT_KEY).unwrap().is_none());
        assert_eq!(f.sync.sync_status(SectionName::Hero), None);
    }
}
