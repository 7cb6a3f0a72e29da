use crate::models::{Listing, PropertyType, Source, Status};
use crate::store::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Score,
    Price,
    Area,
    PricePerArea,
    FirstSeenAt,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filters, sort and page for listing searches
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    pub status: Option<Status>,
    pub source: Option<Source>,
    /// Exact match
    pub borough: Option<String>,
    /// Case-insensitive substring
    pub district: Option<String>,
    pub property_type: Option<PropertyType>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub area_min: Option<f64>,
    pub area_max: Option<f64>,
    pub score_min: Option<u8>,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub sort_order: SortOrder,
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    pub listings: Vec<Listing>,
    /// Listings in this page
    pub count: usize,
    /// Listings matching the filters
    pub total: usize,
}

impl ListingQuery {
    pub fn limit(&self) -> Result<usize> {
        match self.limit {
            Some(limit) if limit > MAX_LIMIT => Err(StoreError::Invalid(format!(
                "limit must be at most {MAX_LIMIT}"
            ))),
            Some(limit) => Ok(limit),
            None => Ok(DEFAULT_LIMIT),
        }
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        let district_needle = self.district.as_deref().map(str::to_lowercase);

        self.status.map_or(true, |s| listing.status == s)
            && self.source.map_or(true, |s| listing.source == s)
            && self
                .borough
                .as_deref()
                .map_or(true, |b| listing.borough.as_deref() == Some(b))
            && district_needle.map_or(true, |needle| {
                listing
                    .district
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            && self.property_type.map_or(true, |t| listing.property_type == t)
            && self.price_min.map_or(true, |min| listing.price >= min)
            && self.price_max.map_or(true, |max| listing.price <= max)
            && self.area_min.map_or(true, |min| listing.area >= min)
            && self.area_max.map_or(true, |max| listing.area <= max)
            && self.score_min.map_or(true, |min| listing.score >= min)
    }

    fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        let ordering = match self.sort_by {
            SortField::Score => a.score.cmp(&b.score),
            SortField::Price => a.price.cmp(&b.price),
            SortField::Area => a.area.total_cmp(&b.area),
            // unknown values sort as the smallest
            SortField::PricePerArea => a.price_per_area.cmp(&b.price_per_area),
            SortField::FirstSeenAt => a.first_seen_at.cmp(&b.first_seen_at),
        };
        match self.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Filter, sort and slice. Ties keep the input order.
    pub fn apply<'a>(&self, listings: impl Iterator<Item = &'a Listing>) -> Result<ListingPage> {
        let limit = self.limit()?;

        let mut matching: Vec<&Listing> = listings.filter(|l| self.matches(l)).collect();
        matching.sort_by(|a, b| self.compare(a, b));

        let total = matching.len();
        let page: Vec<Listing> = matching
            .into_iter()
            .skip(self.offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(ListingPage {
            count: page.len(),
            listings: page,
            total,
        })
    }
}
