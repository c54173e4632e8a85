//! Music section payload: the featured release and the rest of the catalog.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::optional_date;

/// Streaming links for a track. Absent platforms are not rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platforms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apple: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audiomack: Option<String>,
}

/// A released track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub title: String,
    pub artists: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producers: Option<Vec<String>>,
    /// Cover art URI.
    pub cover: String,
    #[serde(default)]
    pub platforms: Platforms,
    #[serde(
        default,
        deserialize_with = "optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub release_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics_excerpt: Option<String>,
}

impl Track {
    /// Artists joined for display ("TMJ, OG Mage").
    #[must_use]
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }
}

/// The music section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicContent {
    pub featured_track: Track,
    pub other_tracks: Vec<Track>,
}

/// Partial update for [`MusicContent`].
///
/// The featured track and the track list are edited by separate forms, so
/// each can be replaced without touching the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct MusicPatch {
    pub featured_track: Option<Track>,
    pub other_tracks: Option<Vec<Track>>,
}

impl MusicContent {
    /// Shallow-merge a patch into this payload.
    pub fn apply(&mut self, patch: MusicPatch) {
        if let Some(track) = patch.featured_track {
            self.featured_track = track;
        }
        if let Some(tracks) = patch.other_tracks {
            self.other_tracks = tracks;
        }
    }
}
