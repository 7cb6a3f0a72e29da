use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

mod neighborhood;

pub use neighborhood::{Neighborhood, Slope};

/// Site a listing was found on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Bienici,
    Seloger,
    Leboncoin,
    Pap,
    Figaro,
    Barnes,
    Other,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Bienici => "bienici",
            Source::Seloger => "seloger",
            Source::Leboncoin => "leboncoin",
            Source::Pap => "pap",
            Source::Figaro => "figaro",
            Source::Barnes => "barnes",
            Source::Other => "other",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a listing stands in our search workflow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    New,
    Interesting,
    ToVisit,
    Visited,
    OfferMade,
    Discarded,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::New,
        Status::Interesting,
        Status::ToVisit,
        Status::Visited,
        Status::OfferMade,
        Status::Discarded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "new",
            Status::Interesting => "interesting",
            Status::ToVisit => "to_visit",
            Status::Visited => "visited",
            Status::OfferMade => "offer_made",
            Status::Discarded => "discarded",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    Apartment,
    House,
    Duplex,
    Loft,
    Other,
}

/// A price observed before a re-ingestion changed it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceChange {
    pub price: i64,
    pub timestamp: DateTime<Utc>,
}

/// Core listing data model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: u64,
    pub url: String,
    pub source: Source,
    pub title: String,
    pub description: Option<String>,

    // Price
    pub price: i64,
    pub price_per_area: Option<i64>,
    #[serde(default)]
    pub price_history: Vec<PriceChange>,

    // Layout
    pub area: f64,
    pub room_count: u32,
    pub bedroom_count: Option<u32>,
    pub property_type: PropertyType,
    pub floor: Option<i32>,
    pub total_floors: Option<i32>,
    pub elevator: Option<bool>,
    pub dual_exposure: Option<bool>,
    pub exposure: Option<String>,

    // Outside
    pub terrace: Option<bool>,
    pub terrace_area: Option<f64>,
    pub balcony: Option<bool>,
    pub garden: Option<bool>,

    // Storage / parking
    pub cellar: Option<bool>,
    pub parking: Option<bool>,
    pub bike_storage: Option<bool>,

    // Energy
    pub energy_rating: Option<String>,
    pub ghg_rating: Option<String>,

    // Location
    pub district: Option<String>,
    pub borough: Option<String>,
    pub address: Option<String>,

    // Agency
    pub agency: Option<String>,
    pub phone: Option<String>,

    // Media
    #[serde(default)]
    pub photo_urls: Vec<String>,
    pub photo_count: Option<u32>,

    // Scoring & workflow
    pub score: u8,
    pub status: Status,
    pub notes: Option<String>,
    pub discard_reason: Option<String>,

    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// `trunc(price / area)`, or `None` when the area is unknown
    pub fn derive_price_per_area(price: i64, area: f64) -> Option<i64> {
        if area > 0.0 {
            Some((price as f64 / area) as i64)
        } else {
            None
        }
    }
}

/// Payload accepted when ingesting a listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingCreate {
    pub url: String,
    pub source: Option<Source>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: i64,
    pub area: f64,
    pub room_count: u32,
    pub bedroom_count: Option<u32>,
    #[serde(default)]
    pub property_type: PropertyType,
    pub floor: Option<i32>,
    pub total_floors: Option<i32>,
    pub elevator: Option<bool>,
    pub dual_exposure: Option<bool>,
    pub exposure: Option<String>,
    pub terrace: Option<bool>,
    pub terrace_area: Option<f64>,
    pub balcony: Option<bool>,
    pub garden: Option<bool>,
    pub cellar: Option<bool>,
    pub parking: Option<bool>,
    pub bike_storage: Option<bool>,
    pub energy_rating: Option<String>,
    pub ghg_rating: Option<String>,
    pub district: Option<String>,
    pub borough: Option<String>,
    pub address: Option<String>,
    pub agency: Option<String>,
    pub phone: Option<String>,
    pub photo_urls: Option<Vec<String>>,
    pub photo_count: Option<u32>,
    pub notes: Option<String>,
}

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub area: Option<f64>,
    pub room_count: Option<u32>,
    pub bedroom_count: Option<u32>,
    pub property_type: Option<PropertyType>,
    pub floor: Option<i32>,
    pub total_floors: Option<i32>,
    pub elevator: Option<bool>,
    pub dual_exposure: Option<bool>,
    pub exposure: Option<String>,
    pub terrace: Option<bool>,
    pub terrace_area: Option<f64>,
    pub balcony: Option<bool>,
    pub garden: Option<bool>,
    pub cellar: Option<bool>,
    pub parking: Option<bool>,
    pub bike_storage: Option<bool>,
    pub energy_rating: Option<String>,
    pub ghg_rating: Option<String>,
    pub district: Option<String>,
    pub borough: Option<String>,
    pub address: Option<String>,
    pub photo_urls: Option<Vec<String>>,
    pub status: Option<Status>,
    pub notes: Option<String>,
    pub discard_reason: Option<String>,
}
