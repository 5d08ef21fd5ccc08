//! Keyword intent detection for visitor questions.

/// What a visitor is asking about a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    History,
    Timing,
    Ticket,
    Location,
    Hotels,
    Nearby,
    Unknown,
}

const HISTORY_WORDS: &[&str] = &["history", "origin", "built", "construction", "established"];
const TIMING_WORDS: &[&str] = &[
    "timing",
    "open",
    "close",
    "opening hours",
    "hours",
    "time to visit",
    "best time",
];
const TICKET_WORDS: &[&str] = &["ticket", "entry", "fee", "cost to visit"];
const LOCATION_WORDS: &[&str] = &["location", "where is", "where located", "which place"];
const HOTEL_WORDS: &[&str] = &[
    "hotel",
    "stay",
    "lodging",
    "accommodation",
    "rooms nearby",
];
const NEARBY_WORDS: &[&str] = &["nearby", "around", "near", "attractions", "what to see"];

impl Intent {
    /// Classify a question, checking intents in priority order.
    pub fn detect(question: &str) -> Intent {
        let normalized = question
            .to_lowercase()
            .replace("entry fee", "ticket")
            .replace("price", "ticket");

        let priority = [
            (Intent::History, HISTORY_WORDS),
            (Intent::Timing, TIMING_WORDS),
            (Intent::Ticket, TICKET_WORDS),
            (Intent::Location, LOCATION_WORDS),
            (Intent::Hotels, HOTEL_WORDS),
            (Intent::Nearby, NEARBY_WORDS),
        ];

        priority
            .into_iter()
            .find(|(_, words)| words.iter().any(|word| normalized.contains(word)))
            .map(|(intent, _)| intent)
            .unwrap_or(Intent::Unknown)
    }

    /// Canned reply used when no chat backend is reachable.
    pub fn canned_reply(self, site_name: &str) -> String {
        match self {
            Intent::History => format!(
                "{} has a rich history dating back many centuries. It was built by ancient rulers and has been preserved as an important cultural heritage site.",
                site_name
            ),
            Intent::Timing => format!(
                "{} is open from 9:00 AM to 6:00 PM on weekdays, and 10:00 AM to 4:00 PM on weekends and holidays.",
                site_name
            ),
            Intent::Ticket => format!(
                "The entry fee for {} is ₹50 for Indian nationals and ₹200 for foreign tourists. Children under 12 can enter for free.",
                site_name
            ),
            Intent::Location => format!(
                "{} is in Tamil Nadu, India. Use the map view to see its exact location and directions.",
                site_name
            ),
            Intent::Hotels => format!(
                "There are several hotels and guest houses within a short drive of {}. Booking ahead is recommended during festival season.",
                site_name
            ),
            Intent::Nearby => format!(
                "Around {} you can visit other temples, museums and markets. The search screen lists heritage sites in the same city.",
                site_name
            ),
            Intent::Unknown => format!(
                "{} is a famous heritage site known for its architectural beauty and cultural significance. Is there anything specific you'd like to know about it?",
                site_name
            ),
        }
    }
}
