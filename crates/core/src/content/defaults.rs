//! Compiled-in default content.
//!
//! Shown before any remote or local content is loaded, restored by a reset,
//! and pushed to the remote store by the seeder.

use chrono::NaiveDate;

use super::{
    AboutContent, ContactContent, Event, EventsContent, HeroContent, MediaContent, MerchItem,
    MusicContent, Photo, Platforms, PressQuote, SiteContent, TourInfo, Track, Video,
};
use crate::types::{EventId, Price, ProductId};

const SPOTIFY: &str = "https://spotify.com";
const APPLE_MUSIC: &str = "https://music.apple.com";
const AUDIOMACK: &str = "https://audiomack.com";

const YAWA_COVER: &str = "/assets/yawa.jpeg";

/// The full default site content.
#[must_use]
pub fn site_content() -> SiteContent {
    SiteContent {
        hero: hero(),
        music: music(),
        about: about(),
        merch: merch(),
        media: media(),
        contact: contact(),
        events: events(),
    }
}

#[must_use]
pub fn hero() -> HeroContent {
    HeroContent {
        title: "TMJ".to_owned(),
        tagline: "Nigerian singer-songwriter blending Afropop, R&B, and traditional Juju with \
                  socially conscious storytelling and activism."
            .to_owned(),
        cta: "Listen Now".to_owned(),
        background_image: None,
    }
}

#[must_use]
pub fn music() -> MusicContent {
    MusicContent {
        featured_track: Track {
            title: "Yawa".to_owned(),
            artists: strings(&["TMJ", "OG Mage"]),
            producers: Some(strings(&["Danny Drey", "David Acekeyz"])),
            cover: YAWA_COVER.to_owned(),
            platforms: platforms(Some(SPOTIFY), Some(APPLE_MUSIC), Some(AUDIOMACK)),
            release_date: Some(date(2025, 3, 14)),
            featured: Some(true),
            lyrics_excerpt: Some(
                "This is where the lyrics would go... In a real app, this would be a \
                 sanitized excerpt of the song lyrics."
                    .to_owned(),
            ),
        },
        other_tracks: vec![
            Track {
                title: "Storyteller".to_owned(),
                artists: strings(&["TMJ"]),
                producers: None,
                cover: "https://images.unsplash.com/photo-1511671782779-c97d3d27a1d4?ixlib=rb-1.2.1&auto=format&fit=crop&w=800&q=80".to_owned(),
                platforms: platforms(Some(SPOTIFY), Some(APPLE_MUSIC), None),
                release_date: Some(date(2024, 11, 20)),
                featured: None,
                lyrics_excerpt: None,
            },
            Track {
                title: "My Woman".to_owned(),
                artists: strings(&["TMJ", "Afrobeats Collective"]),
                producers: None,
                cover: YAWA_COVER.to_owned(),
                platforms: platforms(Some(SPOTIFY), None, None),
                release_date: Some(date(2025, 6, 15)),
                featured: None,
                lyrics_excerpt: None,
            },
            Track {
                title: "Yawa".to_owned(),
                artists: strings(&["TMJ"]),
                producers: None,
                cover: YAWA_COVER.to_owned(),
                platforms: platforms(Some(SPOTIFY), Some(APPLE_MUSIC), None),
                release_date: None,
                featured: None,
                lyrics_excerpt: None,
            },
        ],
    }
}

#[must_use]
pub fn about() -> AboutContent {
    AboutContent {
        name: "TMJ".to_owned(),
        full_name: "Tomide Joseph".to_owned(),
        origin: "Osun State, Nigeria".to_owned(),
        image: "/assets/tm.png".to_owned(),
        bio: "Tomide Joseph, known professionally as TMJ, is a Nigerian singer-songwriter from \
              Osun State whose music transcends conventional genres. Blending the rhythmic pulse \
              of Afropop with the soulful depth of R&B and the cultural richness of traditional \
              Juju music, TMJ creates a sound that is both innovative and deeply rooted in \
              Nigerian heritage.\n\nRaised in a community where music was both celebration and \
              commentary, TMJ developed an early understanding of music's power to inspire \
              change. This perspective shapes his approach to songwriting, where catchy melodies \
              serve as vehicles for messages of unity, resilience, and social awareness."
            .to_owned(),
        mission: "Through my music, I aim to bridge cultural divides while addressing the social \
                  issues that affect my community and beyond. Every song is an opportunity to \
                  celebrate our shared humanity while pushing for positive change."
            .to_owned(),
        press_quotes: vec![
            PressQuote {
                quote: "TMJ represents the exciting new wave of African artists who refuse to be \
                        boxed into a single genre, creating music that resonates globally while \
                        staying true to their roots."
                    .to_owned(),
                source: "African Music Today".to_owned(),
            },
            PressQuote {
                quote: "With thoughtful lyrics and infectious rhythms, TMJ's music invites \
                        listeners to both dance and reflect\u{2014}a powerful combination that \
                        sets him apart."
                    .to_owned(),
                source: "Global Beats Magazine".to_owned(),
            },
            PressQuote {
                quote: "Few emerging artists balance entertainment and activism as seamlessly as \
                        TMJ, whose work serves as both a celebration of Nigerian culture and a \
                        call to action."
                    .to_owned(),
                source: "Culture Critic".to_owned(),
            },
        ],
    }
}

#[must_use]
pub fn merch() -> Vec<MerchItem> {
    vec![
        merch_item(
            "m1",
            "TMJ Logo T-Shirt",
            2999,
            "photo-1521572163474-6864f9cf17ab",
            "Classic black tee with TMJ logo.",
            Some(&["S", "M", "L", "XL"]),
            true,
        ),
        merch_item(
            "m2",
            "Afrobeat Hoodie",
            4999,
            "photo-1556821840-3a63f95609a7",
            "Comfortable hoodie with Afrobeat design.",
            Some(&["S", "M", "L", "XL", "XXL"]),
            true,
        ),
        merch_item(
            "m3",
            "TMJ Cap",
            2499,
            "photo-1588850561407-ed78c282e89b",
            "Adjustable cap with embroidered logo.",
            None,
            true,
        ),
        merch_item(
            "m4",
            "Unity Tour Poster",
            1999,
            "photo-1614018453562-77f6180ce036",
            "Limited edition tour poster, signed.",
            None,
            true,
        ),
        merch_item(
            "m5",
            "TMJ Vinyl Record",
            3499,
            "photo-1603048588665-791ca8aea617",
            "Limited edition vinyl with exclusive tracks.",
            None,
            false,
        ),
        merch_item(
            "m6",
            "Storyteller Beanie",
            2299,
            "photo-1576871337632-b9aef4c17ab9",
            "Warm beanie with embroidered 'Storyteller' text.",
            None,
            true,
        ),
    ]
}

#[must_use]
pub fn media() -> MediaContent {
    let photos = [
        ("tmj6.jpeg", 1),
        ("tmj9.jpeg", 2),
        ("tmj11.jpeg", 3),
        ("tmj13.jpeg", 5),
        ("tmj14.jpeg", 6),
        ("tmj16.jpeg", 7),
        ("tmj17.jpeg", 8),
        ("tmj20.png", 9),
    ]
    .into_iter()
    .map(|(file, n)| Photo {
        src: format!("/assets/{file}"),
        alt: format!("Live performance {n}"),
    })
    .collect();

    MediaContent {
        photos,
        videos: vec![
            Video {
                embed_url: "https://www.youtube.com/embed/hA1cn5QV4Tc?si=SDhJD3EOsdrt50Ck"
                    .to_owned(),
                title: "Yawa".to_owned(),
            },
            Video {
                embed_url: "https://www.youtube.com/embed/9KTmcqSpL9M?si=lJNyN8ZweCUdqN99"
                    .to_owned(),
                title: "Yawa LIve Performance".to_owned(),
            },
        ],
    }
}

#[must_use]
pub fn contact() -> ContactContent {
    ContactContent {
        email: "management@tmjmusic.com".to_owned(),
        phone: "+234 123 456 7890".to_owned(),
        location: "Lagos / Osun State, Nigeria".to_owned(),
    }
}

#[must_use]
pub fn events() -> EventsContent {
    EventsContent {
        upcoming_events: vec![
            event("e1", "Afrobeats Night", "The Shrine", "Lagos, Nigeria", date(2025, 4, 15), "8:00 PM")
                .with_tickets("https://tickets.example.com/e1"),
            event("e2", "Unity Festival", "National Stadium", "Abuja, Nigeria", date(2025, 5, 22), "7:30 PM")
                .with_tickets("https://tickets.example.com/e2"),
            event("e3", "Summer Jam", "O2 Academy", "London, UK", date(2025, 6, 10), "9:00 PM")
                .with_tickets("https://tickets.example.com/e3"),
            event("e4", "Global Beats Tour", "Apollo Theater", "New York, USA", date(2025, 7, 5), "8:00 PM"),
            event("e5", "African Heritage Festival", "Rogers Centre", "Toronto, Canada", date(2025, 7, 18), "6:30 PM"),
            Event {
                sold_out: Some(true),
                ..event("e6", "Homecoming Concert", "Freedom Park", "Osun State, Nigeria", date(2025, 8, 30), "7:00 PM")
            },
        ],
        past_events: vec![
            event("p1", "Album Preview", "Jazz Caf\u{e9}", "Lagos, Nigeria", date(2024, 11, 20), "8:00 PM"),
            event("p2", "Charity Concert", "Community Center", "Osun State, Nigeria", date(2024, 10, 5), "6:30 PM"),
            event("p3", "University Tour", "University of Lagos", "Lagos, Nigeria", date(2024, 9, 15), "7:00 PM"),
            event("p4", "Radio Showcase", "Beat FM Studios", "Lagos, Nigeria", date(2024, 8, 22), "5:30 PM"),
        ],
        tour_info: TourInfo {
            title: "2025 World Tour".to_owned(),
            locations: "Nigeria \u{b7} Ghana \u{b7} UK \u{b7} USA \u{b7} Canada".to_owned(),
            map_image: "https://images.unsplash.com/photo-1569336415962-a4bd9f69cd83?ixlib=rb-1.2.1&auto=format&fit=crop&w=1200&q=80".to_owned(),
        },
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_owned()).collect()
}

fn platforms(spotify: Option<&str>, apple: Option<&str>, audiomack: Option<&str>) -> Platforms {
    Platforms {
        spotify: spotify.map(str::to_owned),
        apple: apple.map(str::to_owned),
        audiomack: audiomack.map(str::to_owned),
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn merch_item(
    id: &str,
    name: &str,
    cents: u32,
    unsplash_photo: &str,
    description: &str,
    sizes: Option<&[&str]>,
    in_stock: bool,
) -> MerchItem {
    MerchItem {
        id: ProductId::new(id),
        name: name.to_owned(),
        price: Price::from_cents(cents),
        image: format!(
            "https://images.unsplash.com/{unsplash_photo}?ixlib=rb-1.2.1&auto=format&fit=crop&w=800&q=80"
        ),
        description: description.to_owned(),
        sizes: sizes.map(strings),
        in_stock,
    }
}

fn event(id: &str, title: &str, venue: &str, location: &str, date: NaiveDate, time: &str) -> Event {
    Event {
        id: EventId::new(id),
        title: title.to_owned(),
        venue: venue.to_owned(),
        location: location.to_owned(),
        date,
        time: time.to_owned(),
        ticket_url: None,
        sold_out: None,
    }
}

impl Event {
    fn with_tickets(mut self, url: &str) -> Self {
        self.ticket_url = Some(url.to_owned());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merch_defaults() {
        let items = merch();
        assert_eq!(items.len(), 6);
        assert_eq!(items[0].price, Price::from_cents(2999));
        assert!(!items[4].in_stock);
        assert!(items[2].sizes.is_none());
    }

    #[test]
    fn test_event_defaults() {
        let events = events();
        assert_eq!(events.upcoming_events.len(), 6);
        assert_eq!(events.past_events.len(), 4);
        assert!(events.upcoming_events[0].tickets_available());
        assert!(events.upcoming_events[5].is_sold_out());
        assert!(!events.upcoming_events[3].tickets_available());
    }

    #[test]
    fn test_dates_are_valid() {
        assert_eq!(music().featured_track.release_date, NaiveDate::from_ymd_opt(2025, 3, 14));
    }
}
