use crate::models::{ListingCreate, PropertyType, Source};
use serde::{Deserialize, Serialize};

/// Best-effort guesses pulled out of a listing page.
///
/// Every field is optional and omitted from JSON when nothing was found, so
/// "not extracted" never looks like "extracted as zero".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedroom_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borough: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terrace: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balcony: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cellar: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevator: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dual_exposure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bike_storage: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_urls: Option<Vec<String>>,
}

impl ExtractedFields {
    /// Turn a scrape into an ingestion payload.
    ///
    /// Price, area and room count default to 0 here, not in the extractor.
    pub fn into_create(self, url: &str) -> ListingCreate {
        ListingCreate {
            url: self.url.unwrap_or_else(|| url.to_string()),
            source: self.source,
            title: self.title,
            description: self.description,
            price: self.price.unwrap_or(0),
            area: self.area.unwrap_or(0.0),
            room_count: self.room_count.unwrap_or(0),
            bedroom_count: self.bedroom_count,
            property_type: self.property_type.unwrap_or_default(),
            elevator: self.elevator,
            dual_exposure: self.dual_exposure,
            terrace: self.terrace,
            balcony: self.balcony,
            garden: self.garden,
            cellar: self.cellar,
            parking: self.parking,
            bike_storage: self.bike_storage,
            energy_rating: self.energy_rating,
            borough: self.borough,
            photo_urls: self.photo_urls,
            photo_count: self.photo_count,
            ..ListingCreate::default()
        }
    }
}
