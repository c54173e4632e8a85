//! The combined local fallback blob.
//!
//! After every edit the whole site content is written locally under one key
//! so it can stand in when the remote store is unreachable at startup. On
//! read every section is optional and may be partial: a blob written by an
//! older build, or trimmed by hand, only overrides the fields it contains.

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::{
    AboutContent, ContactContent, EventsContent, HeroContent, MediaContent, MerchItem,
    MusicContent, SectionPatch, SiteContent,
};
use crate::types::SectionName;

/// Local fallback snapshot of all sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_content: Option<HeroContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_content: Option<MusicContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_content: Option<AboutContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merch_items: Option<Vec<MerchItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_content: Option<MediaContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_content: Option<ContactContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_content: Option<EventsContent>,
}

/// Outcome of merging a stored fallback blob into the current content.
#[derive(Debug, Default)]
pub struct RestoreReport {
    /// Sections merged from the blob, in blob key order.
    pub restored: Vec<SectionName>,
    /// Sections present in the blob that could not be decoded.
    pub skipped: Vec<(SectionName, serde_json::Error)>,
}

impl FallbackSnapshot {
    /// Blob key for each section.
    pub const KEYS: [(&'static str, SectionName); 7] = [
        ("heroContent", SectionName::Hero),
        ("musicContent", SectionName::Music),
        ("aboutContent", SectionName::About),
        ("merchItems", SectionName::Merch),
        ("mediaContent", SectionName::Media),
        ("contactContent", SectionName::Contact),
        ("eventsContent", SectionName::Events),
    ];

    /// Merge each section found in a stored blob over `content`.
    ///
    /// Sections are decoded one at a time as partial payloads: a value with
    /// only some fields overrides just those fields, and a value that cannot
    /// be decoded is reported in [`RestoreReport::skipped`] without affecting
    /// the others. Missing and `null` values are ignored.
    pub fn restore_json(
        mut blob: JsonMap<String, JsonValue>,
        content: &mut SiteContent,
    ) -> RestoreReport {
        let mut report = RestoreReport::default();
        for (key, section) in Self::KEYS {
            let Some(value) = blob.remove(key).filter(|v| !v.is_null()) else {
                continue;
            };
            match SectionPatch::from_json(section, value) {
                Ok(patch) => {
                    content.apply(patch);
                    report.restored.push(section);
                }
                Err(e) => report.skipped.push((section, e)),
            }
        }
        report
    }
}

impl From<&SiteContent> for FallbackSnapshot {
    fn from(content: &SiteContent) -> Self {
        Self {
            hero_content: Some(content.hero.clone()),
            music_content: Some(content.music.clone()),
            about_content: Some(content.about.clone()),
            merch_items: Some(content.merch.clone()),
            media_content: Some(content.media.clone()),
            contact_content: Some(content.contact.clone()),
            events_content: Some(content.events.clone()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_snapshot_uses_wire_keys() {
        let snapshot = FallbackSnapshot::from(&SiteContent::default());
        let value = serde_json::to_value(&snapshot).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "heroContent",
            "musicContent",
            "aboutContent",
            "merchItems",
            "mediaContent",
            "contactContent",
            "eventsContent",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert!(object["musicContent"].get("featuredTrack").is_some());
    }

    fn blob(value: JsonValue) -> JsonMap<String, JsonValue> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_partial_section_overrides_only_given_fields() {
        let mut content = SiteContent::default();
        let report = FallbackSnapshot::restore_json(
            blob(json!({"heroContent": {"title": "X"}})),
            &mut content,
        );

        assert_eq!(report.restored, [SectionName::Hero]);
        assert_eq!(content.hero.title, "X");
        assert_eq!(content.hero.cta, SiteContent::default().hero.cta);
        assert_eq!(content.music, SiteContent::default().music);
    }

    #[test]
    fn test_bad_section_does_not_drop_good_ones() {
        let mut content = SiteContent::default();
        let report = FallbackSnapshot::restore_json(
            blob(json!({
                "contactContent": {"email": "a@b.co", "phone": "1", "location": "Lagos"},
                "merchItems": [{"id": "m1"}],
                "eventsContent": null
            })),
            &mut content,
        );

        assert_eq!(report.restored, [SectionName::Contact]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, SectionName::Merch);
        assert_eq!(content.contact.location, "Lagos");
        assert_eq!(content.merch, SiteContent::default().merch);
    }

    #[test]
    fn test_written_snapshot_restores_in_full() {
        let mut edited = SiteContent::default();
        edited.hero.title = "Edited".to_string();
        edited.merch.truncate(1);
        let written = serde_json::to_value(FallbackSnapshot::from(&edited)).unwrap();

        let mut content = SiteContent::default();
        let report = FallbackSnapshot::restore_json(blob(written), &mut content);

        assert_eq!(report.restored.len(), 7);
        assert!(report.skipped.is_empty());
        assert_eq!(content, edited);
    }
}
