use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Whether the business was open when the results page was scraped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenStatus {
    #[serde(rename = "Buka", alias = "Open")]
    Open,
    #[serde(rename = "Tutup", alias = "Closed")]
    Closed,
}

impl OpenStatus {
    pub fn label(self) -> &'static str {
        match self {
            OpenStatus::Open => "Buka",
            OpenStatus::Closed => "Tutup",
        }
    }
}

impl fmt::Display for OpenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One scraped business, one row of the data file.
///
/// Anything the scraper could not extract stays `None` and is written as an
/// empty cell. Rows from older files with a different column set still load:
/// missing columns default, unparsable numbers read as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(rename = "Nama")]
    pub name: String,

    #[serde(rename = "Kota", default)]
    pub city: String,

    #[serde(rename = "Kategori", default)]
    pub category: String,

    #[serde(rename = "Rating", default, deserialize_with = "csv::invalid_option")]
    pub rating: Option<f64>,

    #[serde(rename = "Harga", default)]
    pub price: Option<String>,

    #[serde(rename = "Jam", default)]
    pub hours: Option<String>,

    #[serde(rename = "Status", default, deserialize_with = "csv::invalid_option")]
    pub status: Option<OpenStatus>,

    #[serde(rename = "lat", default, deserialize_with = "csv::invalid_option")]
    pub lat: Option<f64>,

    #[serde(rename = "lng", default, deserialize_with = "csv::invalid_option")]
    pub lng: Option<f64>,
}

impl Listing {
    pub fn new(name: impl Into<String>, city: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            city: city.into(),
            category: category.into(),
            rating: None,
            price: None,
            hours: None,
            status: None,
            lat: None,
            lng: None,
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// Listings accumulated during one scrape run, unique by name.
#[derive(Debug, Default)]
pub struct ListingSet {
    listings: Vec<Listing>,
    names: HashSet<String>,
}

impl ListingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `listing` unless a listing with the same name is already present.
    /// Returns whether the set grew.
    pub fn push(&mut self, listing: Listing) -> bool {
        if self.names.contains(&listing.name) {
            return false;
        }
        self.names.insert(listing.name.clone());
        self.listings.push(listing);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn into_vec(self) -> Vec<Listing> {
        self.listings
    }
}
