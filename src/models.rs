use serde::{Deserialize, Serialize};

/// Base id of the stock photo used for generated listings
const LISTING_PHOTO_BASE: u64 = 1470071459604;

/// A heritage site as rendered by the search and detail screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeritageSite {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default)]
    pub audio_available: bool,
}

impl HeritageSite {
    /// Build a record from a free-text listing of the form
    /// "Title, Street, Area, City – PIN".
    ///
    /// Everything before the first comma is the title, the rest is the
    /// location. Ids are `site-{scope}-{index}` so the same listing always
    /// yields the same record, and the first two listings are popular.
    pub fn from_listing(scope: &str, index: usize, listing: &str) -> Option<Self> {
        let (title, location) = match listing.split_once(',') {
            Some((title, location)) => (title.trim(), location.trim()),
            None => (listing.trim(), ""),
        };
        if title.is_empty() {
            return None;
        }

        Some(Self {
            id: format!("site-{}-{}", slug(scope), index),
            title: title.to_string(),
            location: location.to_string(),
            description: format!("Learn more about {}", title),
            image: format!(
                "https://images.unsplash.com/photo-{}-3b5ec3a7fe05",
                LISTING_PHOTO_BASE + index as u64 * 10
            ),
            is_popular: index < 2,
            audio_available: true,
        })
    }
}

/// Latitude/longitude in floating-point degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Returns `None` unless both values are finite and in range.
    pub fn validated(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }

    /// Whether two points agree within `tolerance` degrees on both axes.
    pub fn approx_eq(&self, other: &Coordinates, tolerance: f64) -> bool {
        (self.latitude - other.latitude).abs() <= tolerance
            && (self.longitude - other.longitude).abs() <= tolerance
    }
}

/// A site search: free-text place plus an optional district filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteQuery {
    pub place: String,
    pub district: Option<String>,
}

impl SiteQuery {
    pub fn new(place: impl Into<String>) -> Self {
        Self {
            place: place.into(),
            district: None,
        }
    }

    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        let district = district.into();
        self.district = (!district.trim().is_empty()).then_some(district);
        self
    }

    /// Normalized place key: trimmed and lowercased.
    pub fn place_key(&self) -> String {
        self.place.trim().to_lowercase()
    }
}

/// Lowercase, dash-separated form of a free-text name.
pub fn slug(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
