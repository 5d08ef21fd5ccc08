//! Deterministic local data used whenever the remote backend is unavailable.
//!
//! Every lookup is a pure function of its input: the same request always
//! produces the same records, ids included.

use crate::gateway::intent::Intent;
use crate::models::{Coordinates, HeritageSite, SiteQuery};

/// Listings per city in "Title, Location" form
const SITES_BY_PLACE: &[(&str, &[&str])] = &[
    (
        "chennai",
        &[
            "Fort St. George, Rajaji Road, Chennai – 600009",
            "Government Museum, Pantheon Road, Egmore, Chennai – 600008",
            "Vivekananda House, Kamarajar Salai, Triplicane, Chennai – 600005",
            "Kalakshetra Foundation, Kalakshetra Road, Thiruvanmiyur, Chennai – 600041",
            "Madras High Court, Parry's Corner, Chennai – 600104",
            "Kapaleeshwarar Temple, Mylapore, Chennai – 600004",
            "Parthasarathy Temple, Triplicane, Chennai – 600005",
        ],
    ),
    (
        "madurai",
        &[
            "Meenakshi Amman Temple, Madurai Main, Madurai – 625001",
            "Thirumalai Nayakkar Mahal, Panthadi 1st Street, Madurai – 625001",
            "Gandhi Memorial Museum, Tamukkam, Madurai – 625020",
            "Alagar Kovil, Alagarkoil Road, Madurai – 625301",
            "Vandiyur Mariamman Teppakulam, Vandiyur, Madurai – 625020",
        ],
    ),
    (
        "coimbatore",
        &[
            "Adiyogi Shiva Statue, Isha Yoga Center, Velliangiri Foothills, Coimbatore – 641114",
            "Dhyanalinga Temple, Isha Yoga Center, Velliangiri Foothills, Coimbatore – 641114",
            "Marudhamalai Murugan Temple, Marudhamalai, Coimbatore – 641046",
            "Perur Pateeswarar Temple, Perur, Coimbatore – 641010",
            "Eachanari Vinayagar Temple, Eachanari, Coimbatore – 641021",
        ],
    ),
    (
        "salem",
        &[
            "Yercaud Hill Station, Yercaud, Salem – 636601",
            "Mettur Dam, Mettur, Salem – 636401",
            "1008 Lingam Temple, Ariyanoor, Salem – 636308",
            "Kalangi Siddhar Temple, Kanja Malai, Salem – 636305",
            "Kottai Mariamman Temple, Fort, Salem – 636001",
        ],
    ),
    (
        "trichy",
        &[
            "Sri Ranganathaswamy Temple, Srirangam, Tiruchirapalli – 620006",
            "Rockfort Temple, Rockfort Road, Tiruchirapalli – 620002",
            "Kallanai Dam, Kallanai, Tiruchirapalli – 620105",
            "St. Lourdes Church, Tiruchirapalli – 620001",
            "Jambukeswarar Temple, Thiruvanaikaval, Tiruchirapalli – 620005",
        ],
    ),
];

/// (id, title, location, description, image, popular, audio)
type FeaturedRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    bool,
    bool,
);

const FEATURED_SITES: &[FeaturedRow] = &[
    (
        "1",
        "Fort St. George",
        "Rajaji Road, Chennai",
        "Built in 1644, Fort St. George was the first English fortress in India, founded by the British East India Company. Today, it houses the Tamil Nadu Legislative Assembly and other official buildings. The fort museum contains many relics of the Raj era, including portraits, weapons, coins, and medals.",
        "https://images.unsplash.com/photo-1470071459604-3b5ec3a7fe05",
        true,
        true,
    ),
    (
        "2",
        "Mahabalipuram",
        "East Coast Road",
        "Mahabalipuram, also known as Mamallapuram, is a UNESCO World Heritage site famous for its 7th and 8th-century rock-cut temples and monuments built during the Pallava dynasty. The Shore Temple, standing on the shores of the Bay of Bengal, is one of the oldest structural stone temples of South India.",
        "https://images.unsplash.com/photo-1494891848038-7bd202a2afeb",
        true,
        true,
    ),
    (
        "3",
        "Kapaleeshwarar Temple",
        "Mylapore, Chennai",
        "Kapaleeshwarar Temple is a Hindu temple dedicated to Lord Shiva located in Mylapore, Chennai. The temple was built around the 7th century CE in the Dravidian architectural style, with its gopuram rising to a height of 40 meters.",
        "https://images.unsplash.com/photo-1466442929976-97f336a657be",
        false,
        true,
    ),
    (
        "4",
        "Government Museum",
        "Pantheon Road, Egmore",
        "The Government Museum, Chennai, is the second oldest museum in India, established in 1851. It houses archaeological items, numismatic collections, sculptures, palm-leaf manuscripts, and Mughal and Rajput paintings.",
        "https://images.unsplash.com/photo-1426604966848-d7adac402bff",
        false,
        false,
    ),
    (
        "5",
        "Santhome Cathedral",
        "Santhome High Road",
        "Santhome Cathedral Basilica is a Roman Catholic minor basilica in Santhome, Chennai. It was built in the 16th century by Portuguese explorers and rebuilt with the status of a cathedral by the British in 1893.",
        "https://images.unsplash.com/photo-1461749280684-dccba630e2f6",
        false,
        true,
    ),
];

const SITE_COORDINATES: &[(&str, f64, f64)] = &[
    ("Fort St. George", 13.0801, 80.2838),
    ("Kapaleeshwarar Temple", 13.0337, 80.2693),
    ("Mahabalipuram", 12.6269, 80.1927),
    ("Government Museum", 13.0628, 80.2826),
    ("Santhome Cathedral", 13.0334, 80.2787),
];

/// The local fallback generator for every gateway operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCatalog;

impl LocalCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Sites for a place: exact city match first, then a partial match in
    /// either direction ("chen" finds Chennai, "trichy fort" finds Trichy).
    pub fn search_sites(&self, query: &SiteQuery) -> Result<Vec<HeritageSite>, String> {
        let key = query.place_key();
        if key.is_empty() {
            return Err("Please enter a place to search".to_string());
        }

        let listings = SITES_BY_PLACE
            .iter()
            .find(|(city, _)| *city == key)
            .or_else(|| {
                SITES_BY_PLACE
                    .iter()
                    .find(|(city, _)| city.contains(key.as_str()) || key.contains(*city))
            });

        let Some((city, listings)) = listings else {
            return Err(format!("No heritage sites found for \"{}\"", query.place.trim()));
        };

        let mut sites: Vec<HeritageSite> = listings
            .iter()
            .enumerate()
            .filter_map(|(index, listing)| HeritageSite::from_listing(city, index, listing))
            .collect();

        if let Some(district) = &query.district {
            let district = district.trim().to_lowercase();
            sites.retain(|site| site.location.to_lowercase().contains(&district));
            if sites.is_empty() {
                return Err(format!(
                    "No heritage sites found for \"{}\" in {}",
                    query.place.trim(),
                    query.district.as_deref().unwrap_or_default().trim()
                ));
            }
        }

        Ok(sites)
    }

    pub fn site_details(&self, site_id: &str) -> Result<HeritageSite, String> {
        FEATURED_SITES
            .iter()
            .find(|row| row.0 == site_id.trim())
            .map(featured_site)
            .ok_or_else(|| "Heritage site not found".to_string())
    }

    /// The curated sites shown on the home screen.
    pub fn featured_sites(&self) -> Vec<HeritageSite> {
        FEATURED_SITES.iter().map(featured_site).collect()
    }

    pub fn coordinates(&self, site_name: &str) -> Result<Coordinates, String> {
        let name = site_name.trim();
        SITE_COORDINATES
            .iter()
            .find(|(site, _, _)| site.eq_ignore_ascii_case(name))
            .and_then(|(_, lat, lon)| Coordinates::validated(*lat, *lon))
            .ok_or_else(|| format!("Could not find location for \"{}\"", name))
    }

    pub fn chat(&self, question: &str, site_name: &str) -> Result<String, String> {
        if question.trim().is_empty() {
            return Err("Please enter a question".to_string());
        }
        let site_name = match site_name.trim() {
            "" => "this heritage site",
            name => name,
        };
        Ok(Intent::detect(question).canned_reply(site_name))
    }
}

fn featured_site(row: &FeaturedRow) -> HeritageSite {
    let (id, title, location, description, image, is_popular, audio_available) = *row;
    HeritageSite {
        id: id.to_string(),
        title: title.to_string(),
        location: location.to_string(),
        description: description.to_string(),
        image: image.to_string(),
        is_popular,
        audio_available,
    }
}
