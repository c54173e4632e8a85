//! Section names.
//!
//! Every editable region of the page is a named section. The name is the
//! primary key of the remote `content` table.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known section.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown section: {0}")]
pub struct UnknownSection(pub String);

/// A named content domain of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionName {
    Hero,
    Music,
    About,
    Merch,
    Media,
    Contact,
    Events,
}

impl SectionName {
    /// All sections, in page order.
    pub const ALL: [Self; 7] = [
        Self::Hero,
        Self::Music,
        Self::About,
        Self::Events,
        Self::Merch,
        Self::Media,
        Self::Contact,
    ];

    /// The key used for this section in the content store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Music => "music",
            Self::About => "about",
            Self::Merch => "merch",
            Self::Media => "media",
            Self::Contact => "contact",
            Self::Events => "events",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionName {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_str() {
        for name in SectionName::ALL {
            assert_eq!(name.as_str().parse::<SectionName>().unwrap(), name);
        }
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(
            "community".parse::<SectionName>(),
            Err(UnknownSection("community".to_owned()))
        );
    }
}
