//! Biography payload.

use serde::{Deserialize, Serialize};

/// A quote from the press, attributed to its outlet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressQuote {
    pub quote: String,
    pub source: String,
}

/// The about section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutContent {
    /// Stage name.
    pub name: String,
    pub full_name: String,
    pub origin: String,
    /// Portrait URI.
    pub image: String,
    /// Biography; paragraphs are separated by a blank line.
    pub bio: String,
    pub mission: String,
    pub press_quotes: Vec<PressQuote>,
}

impl AboutContent {
    /// Biography split into paragraphs.
    pub fn bio_paragraphs(&self) -> impl Iterator<Item = &str> {
        self.bio
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Shallow-merge a patch into this payload.
    pub fn apply(&mut self, patch: AboutPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(full_name) = patch.full_name {
            self.full_name = full_name;
        }
        if let Some(origin) = patch.origin {
            self.origin = origin;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(bio) = patch.bio {
            self.bio = bio;
        }
        if let Some(mission) = patch.mission {
            self.mission = mission;
        }
        if let Some(quotes) = patch.press_quotes {
            self.press_quotes = quotes;
        }
    }
}

/// Partial update for [`AboutContent`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AboutPatch {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub origin: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub mission: Option<String>,
    pub press_quotes: Option<Vec<PressQuote>>,
}
