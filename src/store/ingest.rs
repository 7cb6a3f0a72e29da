//! Pure merge rules applied by the store under its write lock.

use crate::models::{Listing, ListingCreate, ListingUpdate, PriceChange, Status};
use crate::scoring;
use crate::scrapers::classify;
use crate::store::error::{Result, StoreError};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestStatus {
    Created,
    Updated,
}

pub fn validate(input: &ListingCreate) -> Result<()> {
    if input.url.trim().is_empty() {
        return Err(StoreError::Invalid("url must not be empty".to_string()));
    }
    if input.price < 0 {
        return Err(StoreError::Invalid("price must not be negative".to_string()));
    }
    if !(input.area >= 0.0) {
        return Err(StoreError::Invalid("area must not be negative".to_string()));
    }
    Ok(())
}

/// First sighting of a URL
pub fn new_listing(id: u64, input: ListingCreate, now: DateTime<Utc>) -> Listing {
    let source = input.source.unwrap_or_else(|| classify(&input.url));
    let title = input
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| format!("Annonce {source}"));

    let mut listing = Listing {
        id,
        url: input.url,
        source,
        title,
        description: input.description,
        price: input.price,
        price_per_area: Listing::derive_price_per_area(input.price, input.area),
        price_history: Vec::new(),
        area: input.area,
        room_count: input.room_count,
        bedroom_count: input.bedroom_count,
        property_type: input.property_type,
        floor: input.floor,
        total_floors: input.total_floors,
        elevator: input.elevator,
        dual_exposure: input.dual_exposure,
        exposure: input.exposure,
        terrace: input.terrace,
        terrace_area: input.terrace_area,
        balcony: input.balcony,
        garden: input.garden,
        cellar: input.cellar,
        parking: input.parking,
        bike_storage: input.bike_storage,
        energy_rating: input.energy_rating,
        ghg_rating: input.ghg_rating,
        district: input.district,
        borough: input.borough,
        address: input.address,
        agency: input.agency,
        phone: input.phone,
        photo_urls: input.photo_urls.unwrap_or_default(),
        photo_count: input.photo_count,
        score: 0,
        status: Status::New,
        notes: input.notes,
        discard_reason: None,
        first_seen_at: now,
        last_seen_at: now,
        created_at: now,
        updated_at: now,
    };
    listing.score = scoring::score(&listing);
    listing
}

/// The same URL was ingested again.
///
/// Only the sighting time and the price move; a price change records the
/// old price stamped with the previous sighting.
pub fn reingest(existing: &mut Listing, input: &ListingCreate, now: DateTime<Utc>) {
    let previous_seen = existing.last_seen_at;
    existing.last_seen_at = now;

    if input.price != existing.price {
        existing.price_history.push(PriceChange {
            price: existing.price,
            timestamp: previous_seen,
        });
        existing.price = input.price;
        existing.price_per_area = Listing::derive_price_per_area(input.price, input.area);
    }

    existing.updated_at = now;
    existing.score = scoring::score(existing);
}

/// Apply a partial update. Nothing changes when the result would be invalid.
pub fn apply_update(listing: &mut Listing, update: ListingUpdate, now: DateTime<Utc>) -> Result<()> {
    let mut next = listing.clone();
    let reprice = update.price.is_some() || update.area.is_some();

    macro_rules! set {
        ($($field:ident),* $(,)?) => {
            $(if let Some(value) = update.$field {
                next.$field = value;
            })*
        };
    }
    macro_rules! set_opt {
        ($($field:ident),* $(,)?) => {
            $(if let Some(value) = update.$field {
                next.$field = Some(value);
            })*
        };
    }

    set!(title, price, area, room_count, property_type, photo_urls, status);
    set_opt!(
        description,
        bedroom_count,
        floor,
        total_floors,
        elevator,
        dual_exposure,
        exposure,
        terrace,
        terrace_area,
        balcony,
        garden,
        cellar,
        parking,
        bike_storage,
        energy_rating,
        ghg_rating,
        district,
        borough,
        address,
        notes,
        discard_reason,
    );

    if next.price < 0 {
        return Err(StoreError::Invalid("price must not be negative".to_string()));
    }
    if !(next.area >= 0.0) {
        return Err(StoreError::Invalid("area must not be negative".to_string()));
    }
    require_discard_reason(&next)?;

    if reprice {
        next.price_per_area = Listing::derive_price_per_area(next.price, next.area);
    }
    next.updated_at = now;
    next.score = scoring::score(&next);

    *listing = next;
    Ok(())
}

pub fn discard(listing: &mut Listing, reason: &str, now: DateTime<Utc>) -> Result<()> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(StoreError::Invalid(
            "a reason is required to discard a listing".to_string(),
        ));
    }

    listing.status = Status::Discarded;
    listing.discard_reason = Some(reason.to_string());
    listing.updated_at = now;
    listing.score = scoring::score(listing);
    Ok(())
}

fn require_discard_reason(listing: &Listing) -> Result<()> {
    let has_reason = listing
        .discard_reason
        .as_deref()
        .is_some_and(|r| !r.trim().is_empty());
    if listing.status == Status::Discarded && !has_reason {
        return Err(StoreError::Invalid(
            "status 'discarded' requires a discard_reason".to_string(),
        ));
    }
    Ok(())
}
