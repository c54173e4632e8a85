//! Typed section payloads.
//!
//! Each section of the page has its own payload struct. [`SectionContent`]
//! is the tagged union over all of them and [`SectionPatch`] the matching
//! union of partial updates. [`SiteContent`] holds one payload per section
//! and implements the merge rules:
//!
//! - object-shaped payloads are shallow-merged (only provided fields change)
//! - list-shaped payloads (the merch catalog) are replaced wholesale
//!
//! JSON field names follow the camelCase wire format shared by the remote
//! `content` table and the local fallback snapshot.

mod about;
mod contact;
pub mod defaults;
mod draft;
mod events;
mod hero;
mod media;
mod merch;
mod music;
mod snapshot;

pub use about::{AboutContent, AboutPatch, PressQuote};
pub use contact::{ContactContent, ContactPatch};
pub use draft::EditDraft;
pub use events::{Event, EventsContent, EventsPatch, TourInfo};
pub use hero::{HeroContent, HeroPatch};
pub use media::{MediaContent, MediaPatch, Photo, Video};
pub use merch::{MerchItem, find_item, parse_sizes};
pub use music::{MusicContent, MusicPatch, Platforms, Track};
pub use snapshot::{FallbackSnapshot, RestoreReport};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::types::SectionName;

/// The payload of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionContent {
    Hero(HeroContent),
    Music(MusicContent),
    About(AboutContent),
    Merch(Vec<MerchItem>),
    Media(MediaContent),
    Contact(ContactContent),
    Events(EventsContent),
}

impl SectionContent {
    /// Which section this payload belongs to.
    #[must_use]
    pub const fn section(&self) -> SectionName {
        match self {
            Self::Hero(_) => SectionName::Hero,
            Self::Music(_) => SectionName::Music,
            Self::About(_) => SectionName::About,
            Self::Merch(_) => SectionName::Merch,
            Self::Media(_) => SectionName::Media,
            Self::Contact(_) => SectionName::Contact,
            Self::Events(_) => SectionName::Events,
        }
    }

    /// Decode a stored payload for the named section.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if the document does not have the
    /// section's shape.
    pub fn from_json(section: SectionName, data: JsonValue) -> Result<Self, serde_json::Error> {
        Ok(match section {
            SectionName::Hero => Self::Hero(serde_json::from_value(data)?),
            SectionName::Music => Self::Music(serde_json::from_value(data)?),
            SectionName::About => Self::About(serde_json::from_value(data)?),
            SectionName::Merch => Self::Merch(serde_json::from_value(data)?),
            SectionName::Media => Self::Media(serde_json::from_value(data)?),
            SectionName::Contact => Self::Contact(serde_json::from_value(data)?),
            SectionName::Events => Self::Events(serde_json::from_value(data)?),
        })
    }

    /// Encode the payload as the document stored remotely.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<JsonValue, serde_json::Error> {
        match self {
            Self::Hero(c) => serde_json::to_value(c),
            Self::Music(c) => serde_json::to_value(c),
            Self::About(c) => serde_json::to_value(c),
            Self::Merch(c) => serde_json::to_value(c),
            Self::Media(c) => serde_json::to_value(c),
            Self::Contact(c) => serde_json::to_value(c),
            Self::Events(c) => serde_json::to_value(c),
        }
    }
}

macro_rules! section_content_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for SectionContent {
                fn from(content: $ty) -> Self {
                    Self::$variant(content)
                }
            }
        )*
    };
}

section_content_from! {
    Hero(HeroContent),
    Music(MusicContent),
    About(AboutContent),
    Merch(Vec<MerchItem>),
    Media(MediaContent),
    Contact(ContactContent),
    Events(EventsContent),
}

/// A full or partial update to one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionPatch {
    Hero(HeroPatch),
    Music(MusicPatch),
    About(AboutPatch),
    /// The merch catalog is list-shaped and always replaced in full.
    Merch(Vec<MerchItem>),
    Media(MediaPatch),
    Contact(ContactPatch),
    Events(EventsPatch),
    /// Replace the whole payload of a section.
    Replace(SectionContent),
}

impl SectionPatch {
    /// Which section this patch targets.
    #[must_use]
    pub const fn section(&self) -> SectionName {
        match self {
            Self::Hero(_) => SectionName::Hero,
            Self::Music(_) => SectionName::Music,
            Self::About(_) => SectionName::About,
            Self::Merch(_) => SectionName::Merch,
            Self::Media(_) => SectionName::Media,
            Self::Contact(_) => SectionName::Contact,
            Self::Events(_) => SectionName::Events,
            Self::Replace(content) => content.section(),
        }
    }

    /// Decode a partial update for the named section from JSON.
    ///
    /// Unknown fields are rejected so a typo never silently does nothing.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if the document is not a valid patch.
    pub fn from_json(section: SectionName, data: JsonValue) -> Result<Self, serde_json::Error> {
        Ok(match section {
            SectionName::Hero => Self::Hero(serde_json::from_value(data)?),
            SectionName::Music => Self::Music(serde_json::from_value(data)?),
            SectionName::About => Self::About(serde_json::from_value(data)?),
            SectionName::Merch => Self::Merch(serde_json::from_value(data)?),
            SectionName::Media => Self::Media(serde_json::from_value(data)?),
            SectionName::Contact => Self::Contact(serde_json::from_value(data)?),
            SectionName::Events => Self::Events(serde_json::from_value(data)?),
        })
    }
}

impl From<SectionContent> for SectionPatch {
    fn from(content: SectionContent) -> Self {
        Self::Replace(content)
    }
}

/// One payload per section: the whole editable content of the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContent {
    pub hero: HeroContent,
    pub music: MusicContent,
    pub about: AboutContent,
    pub merch: Vec<MerchItem>,
    pub media: MediaContent,
    pub contact: ContactContent,
    pub events: EventsContent,
}

impl Default for SiteContent {
    fn default() -> Self {
        defaults::site_content()
    }
}

impl SiteContent {
    /// A copy of one section's payload.
    #[must_use]
    pub fn section(&self, name: SectionName) -> SectionContent {
        match name {
            SectionName::Hero => SectionContent::Hero(self.hero.clone()),
            SectionName::Music => SectionContent::Music(self.music.clone()),
            SectionName::About => SectionContent::About(self.about.clone()),
            SectionName::Merch => SectionContent::Merch(self.merch.clone()),
            SectionName::Media => SectionContent::Media(self.media.clone()),
            SectionName::Contact => SectionContent::Contact(self.contact.clone()),
            SectionName::Events => SectionContent::Events(self.events.clone()),
        }
    }

    /// Overwrite one section's payload.
    pub fn set_section(&mut self, content: SectionContent) {
        match content {
            SectionContent::Hero(c) => self.hero = c,
            SectionContent::Music(c) => self.music = c,
            SectionContent::About(c) => self.about = c,
            SectionContent::Merch(c) => self.merch = c,
            SectionContent::Media(c) => self.media = c,
            SectionContent::Contact(c) => self.contact = c,
            SectionContent::Events(c) => self.events = c,
        }
    }

    /// Merge a patch into the targeted section and return its new payload.
    pub fn apply(&mut self, patch: SectionPatch) -> SectionContent {
        let section = patch.section();
        match patch {
            SectionPatch::Hero(p) => self.hero.apply(p),
            SectionPatch::Music(p) => self.music.apply(p),
            SectionPatch::About(p) => self.about.apply(p),
            SectionPatch::Merch(items) => self.merch = items,
            SectionPatch::Media(p) => self.media.apply(p),
            SectionPatch::Contact(p) => self.contact.apply(p),
            SectionPatch::Events(p) => self.events.apply(p),
            SectionPatch::Replace(content) => self.set_section(content),
        }
        self.section(section)
    }
}

/// Deserialize an optional `YYYY-MM-DD` date, treating `""` as absent.
fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
