//! Hero banner payload.

use serde::{Deserialize, Serialize};

/// Title card shown at the top of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroContent {
    pub title: String,
    pub tagline: String,
    /// Call-to-action button label.
    pub cta: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

/// Partial update for [`HeroContent`]; only the provided fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct HeroPatch {
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub cta: Option<String>,
    pub background_image: Option<String>,
}

impl HeroContent {
    /// Shallow-merge a patch into this payload.
    pub fn apply(&mut self, patch: HeroPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(tagline) = patch.tagline {
            self.tagline = tagline;
        }
        if let Some(cta) = patch.cta {
            self.cta = cta;
        }
        if let Some(image) = patch.background_image {
            self.background_image = Some(image);
        }
    }
}
