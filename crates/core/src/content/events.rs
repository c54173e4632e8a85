//! Events and tour dates payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::EventId;

/// A single show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub venue: String,
    pub location: String,
    pub date: NaiveDate,
    /// Door time as shown on the poster ("8:00 PM").
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,
    #[serde(
        rename = "sold_out",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sold_out: Option<bool>,
}

impl Event {
    /// Whether the show is marked sold out.
    #[must_use]
    pub fn is_sold_out(&self) -> bool {
        self.sold_out.unwrap_or(false)
    }

    /// Whether tickets can be bought: a link exists and the show is not sold out.
    #[must_use]
    pub fn tickets_available(&self) -> bool {
        self.ticket_url.is_some() && !self.is_sold_out()
    }
}

/// Tour banner shown above the event list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourInfo {
    pub title: String,
    pub locations: String,
    pub map_image: String,
}

/// The events section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsContent {
    pub upcoming_events: Vec<Event>,
    pub past_events: Vec<Event>,
    pub tour_info: TourInfo,
}

/// Partial update for [`EventsContent`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EventsPatch {
    pub upcoming_events: Option<Vec<Event>>,
    pub past_events: Option<Vec<Event>>,
    pub tour_info: Option<TourInfo>,
}

impl EventsContent {
    /// Shallow-merge a patch into this payload.
    pub fn apply(&mut self, patch: EventsPatch) {
        if let Some(events) = patch.upcoming_events {
            self.upcoming_events = events;
        }
        if let Some(events) = patch.past_events {
            self.past_events = events;
        }
        if let Some(info) = patch.tour_info {
            self.tour_info = info;
        }
    }
}
