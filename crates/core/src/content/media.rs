//! Media gallery payload.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub src: String,
    pub alt: String,
}

/// An embeddable video (YouTube embed URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub embed_url: String,
    pub title: String,
}

/// The media section: photo gallery plus videos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaContent {
    pub photos: Vec<Photo>,
    pub videos: Vec<Video>,
}

/// Partial update for [`MediaContent`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaPatch {
    pub photos: Option<Vec<Photo>>,
    pub videos: Option<Vec<Video>>,
}

impl MediaContent {
    /// Shallow-merge a patch into this payload.
    pub fn apply(&mut self, patch: MediaPatch) {
        if let Some(photos) = patch.photos {
            self.photos = photos;
        }
        if let Some(videos) = patch.videos {
            self.videos = videos;
        }
    }
}
