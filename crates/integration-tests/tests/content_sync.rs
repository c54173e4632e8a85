//! Content loading, fallback and editing against a full site state.

#![allow(clippy::unwrap_used)]

use stagefront_core::SectionName;
use stagefront_core::content::{
    HeroPatch, MerchItem, SectionContent, SectionPatch, SiteContent, defaults,
};
use stagefront_integration_tests::{EDITOR, EDITOR_PASSWORD, TestSite};
use stagefront_site::services::{ContentSource, LoadPhase, SyncStatus};
use stagefront_site::storage::{CONTENT_KEY, LocalStorage};

fn retitle(title: &str) -> SectionPatch {
    SectionPatch::Hero(HeroPatch {
        title: Some(title.to_string()),
        ..HeroPatch::default()
    })
}

#[tokio::test]
async fn test_fresh_site_shows_defaults() {
    let site = TestSite::new();
    let state = site.start().await;

    assert_eq!(state.content().phase(), LoadPhase::Loaded(ContentSource::Remote));
    assert_eq!(state.content().content(), SiteContent::default());
}

#[tokio::test]
async fn test_unreachable_store_uses_local_fallback() {
    let site = TestSite::new();
    site.storage()
        .set(CONTENT_KEY, r#"{"heroContent": {"title": "X"}}"#)
        .unwrap();
    site.store.set_fail_reads(true);

    let state = site.start().await;
    let content = state.content().content();
    assert_eq!(
        state.content().phase(),
        LoadPhase::Loaded(ContentSource::LocalFallback)
    );
    assert_eq!(content.hero.title, "X");
    assert_eq!(content.hero.tagline, defaults::hero().tagline);
    assert_eq!(content.music, defaults::music());
}

#[tokio::test]
async fn test_unreachable_store_without_fallback_uses_defaults() {
    let site = TestSite::new();
    site.store.set_fail_reads(true);

    let state = site.start().await;
    assert_eq!(state.content().phase(), LoadPhase::Loaded(ContentSource::Defaults));
    assert_eq!(state.content().content(), SiteContent::default());
}

#[tokio::test]
async fn test_edit_is_visible_to_next_visitor() {
    let site = TestSite::new();
    let editor = site.start().await;
    assert!(editor.auth().login(EDITOR, EDITOR_PASSWORD).await);

    editor.edit_section(retitle("Live Tonight")).await.unwrap();
    assert_eq!(editor.content().sync_status(SectionName::Hero), Some(SyncStatus::Synced));

    let visitor = site.start().await;
    assert_eq!(visitor.content().content().hero.title, "Live Tonight");
}

#[tokio::test]
async fn test_failed_write_keeps_local_edit() {
    let site = TestSite::new();
    let state = site.start().await;
    assert!(state.auth().login(EDITOR, EDITOR_PASSWORD).await);
    site.store.set_fail_writes(true);

    state.edit_section(retitle("Offline Edit")).await.unwrap();
    assert_eq!(state.content().content().hero.title, "Offline Edit");
    assert_eq!(state.content().sync_status(SectionName::Hero), Some(SyncStatus::Failed));
    assert!(site.store.record("hero").is_none());

    // The fallback was still written, so a reload with the store down
    // keeps the edit.
    site.store.set_fail_reads(true);
    let reloaded = site.start().await;
    assert_eq!(reloaded.content().content().hero.title, "Offline Edit");
}

#[tokio::test]
async fn test_merch_list_replaces_catalog() {
    let site = TestSite::new();
    let state = site.start().await;
    assert!(state.auth().login(EDITOR, EDITOR_PASSWORD).await);

    let mut merch = defaults::merch();
    merch.truncate(2);
    merch.push(MerchItem::new_placeholder(1_767_225_600_000));

    let updated = state
        .edit_section(SectionPatch::Merch(merch.clone()))
        .await
        .unwrap();
    assert_eq!(updated, SectionContent::Merch(merch.clone()));
    assert_eq!(state.content().content().merch, merch);

    let stored = site.store.record("merch").unwrap();
    assert_eq!(stored.data.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_seed_then_reset() {
    let site = TestSite::new();
    let state = site.start().await;
    assert!(state.auth().login(EDITOR, EDITOR_PASSWORD).await);
    state.edit_section(retitle("Seeded")).await.unwrap();

    let report = state.seed().await.unwrap();
    assert_eq!(report.sections, SectionName::ALL.to_vec());
    for section in SectionName::ALL {
        assert!(site.store.record(section.as_str()).is_some());
    }

    state.content().reset();
    assert_eq!(state.content().content(), SiteContent::default());
    assert!(site.storage().get(CONTENT_KEY).unwrap().is_none());

    // Reset is local only.
    let visitor = site.start().await;
    assert_eq!(visitor.content().content().hero.title, "Seeded");
}
